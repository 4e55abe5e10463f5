use anchor_lang::prelude::*;

#[error_code]
pub enum FeeHookError {
    #[msg("Extra account meta list is already initialized for this mint.")]
    AlreadyInitialized,
    #[msg("Extra account meta list is not initialized for this mint.")]
    NotInitialized,
    #[msg("Signer is not the mint authority.")]
    Unauthorized,
    #[msg("Hook was not invoked by the token program during a transfer.")]
    UntrustedCaller,
    #[msg("Supplied account does not match its derived address.")]
    AccountMismatch,
    #[msg("Token account mint does not match the expected mint.")]
    MintMismatch,
    #[msg("Delegate allowance is lower than the required fee.")]
    InsufficientAllowance,
    #[msg("Wrapped SOL balance is lower than the required fee.")]
    InsufficientFeeBalance,
    #[msg("No valid program address found for the given seeds.")]
    AddressDerivationExhausted,
    #[msg("Mint transfer hook does not point at this program.")]
    HookProgramMismatch,
    #[msg("Fee policy is invalid.")]
    InvalidFeePolicy,
    #[msg("Math Overflow")]
    MathOverflow,
    #[msg("Fees cannot be paid through the token program that invokes the hook.")]
    ReentrantTokenProgram,
}
