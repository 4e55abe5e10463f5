use anchor_lang::{prelude::*, solana_program::program_option::COption};

use crate::error::FeeHookError;

/// Checks that `delegate` may move `fee` out of the sender's wrapped SOL account.
///
/// `token_delegate`, `delegated_amount` and `balance` are the sender account's
/// current delegate, allowance and amount. Returns the allowance left once the fee is spent.
pub fn check_allowance(
    delegate: &Pubkey,
    token_delegate: COption<Pubkey>,
    delegated_amount: u64,
    balance: u64,
    fee: u64,
) -> Result<u64> {
    // Delegated to someone else (or nobody): this program has no allowance at all
    let allowance = match token_delegate {
        COption::Some(approved) if approved == *delegate => delegated_amount,
        _ => 0,
    };

    require!(allowance >= fee, FeeHookError::InsufficientAllowance);
    require!(balance >= fee, FeeHookError::InsufficientFeeBalance);

    allowance
        .checked_sub(fee)
        .ok_or(FeeHookError::MathOverflow.into())
}
