pub mod allowance;
pub mod pda;
pub mod token_utils;
