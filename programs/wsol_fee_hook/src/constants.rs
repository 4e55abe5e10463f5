use anchor_lang::prelude::*;

#[constant]
pub const EXTRA_ACCOUNT_METAS_SEED: &[u8] = b"extra-account-metas";

#[constant]
pub const DELEGATE_SEED: &[u8] = b"delegate";

/// Upper bound for `FeePolicy::Proportional` (100%)
pub const MAX_FEE_BASIS_POINTS: u16 = 10_000;

// Positions of the accounts in the Execute instruction.
// 0..=4 are fixed by the transfer hook interface, the rest come from the registry.
pub const SOURCE_TOKEN_INDEX: u8 = 0;
pub const MINT_INDEX: u8 = 1;
pub const DESTINATION_TOKEN_INDEX: u8 = 2;
pub const OWNER_INDEX: u8 = 3;
pub const EXTRA_ACCOUNT_META_LIST_INDEX: u8 = 4;
pub const WSOL_MINT_INDEX: u8 = 5;
pub const TOKEN_PROGRAM_INDEX: u8 = 6;
pub const ASSOCIATED_TOKEN_PROGRAM_INDEX: u8 = 7;
pub const DELEGATE_INDEX: u8 = 8;
pub const DELEGATE_WSOL_TOKEN_ACCOUNT_INDEX: u8 = 9;
pub const SENDER_WSOL_TOKEN_ACCOUNT_INDEX: u8 = 10;

/// Number of accounts the registry appends after the five interface accounts
pub const EXTRA_ACCOUNT_COUNT: usize = 6;
