use anchor_lang::prelude::*;
use anchor_spl::associated_token;

use crate::{
    constants::{DELEGATE_SEED, EXTRA_ACCOUNT_METAS_SEED},
    error::FeeHookError,
};

/// `find_program_address` that reports exhausted bumps as an error instead of panicking
pub fn find_program_address_checked(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    Pubkey::try_find_program_address(seeds, program_id)
        .ok_or_else(|| error!(FeeHookError::AddressDerivationExhausted))
}

/// Registry (ExtraAccountMetaList) address for `mint`
pub fn extra_account_meta_list_address(mint: &Pubkey) -> Result<(Pubkey, u8)> {
    find_program_address_checked(&[EXTRA_ACCOUNT_METAS_SEED, mint.as_ref()], &crate::ID)
}

/// The delegate PDA is shared by every mint
pub fn delegate_address() -> Result<(Pubkey, u8)> {
    find_program_address_checked(&[DELEGATE_SEED], &crate::ID)
}

/// Associated token account of `owner` for the wrapped SOL mint
pub fn wsol_token_account_address(
    owner: &Pubkey,
    wsol_mint: &Pubkey,
    token_program: &Pubkey,
) -> Result<Pubkey> {
    let (address, _) = find_program_address_checked(
        &[owner.as_ref(), token_program.as_ref(), wsol_mint.as_ref()],
        &associated_token::ID,
    )?;
    Ok(address)
}

/// Fee collection account: the delegate's wrapped SOL ATA
pub fn fee_collection_address(wsol_mint: &Pubkey, token_program: &Pubkey) -> Result<Pubkey> {
    let (delegate, _) = delegate_address()?;
    wsol_token_account_address(&delegate, wsol_mint, token_program)
}

/// Compare a caller supplied key against a freshly derived one
pub fn verify_derived(supplied: &Pubkey, expected: &Pubkey) -> Result<()> {
    require_keys_eq!(*supplied, *expected, FeeHookError::AccountMismatch);
    Ok(())
}
