use anchor_lang::prelude::*;

use crate::state::FeePolicy;

#[event]
pub struct RegistryInitialized {
    pub mint: Pubkey,
    pub extra_account_meta_list: Pubkey,
    pub wsol_mint: Pubkey,
    pub fee_policy: FeePolicy,
}

#[event]
pub struct FeeCollected {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub sender_wsol_token_account: Pubkey,
    pub amount: u64,
    pub fee: u64,
    pub remaining_allowance: u64,
}
