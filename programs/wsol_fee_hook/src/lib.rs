#![allow(unexpected_cfgs)]

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod services;
pub mod state;
pub mod utils;

use anchor_lang::prelude::*;
use spl_discriminator::SplDiscriminate;
use spl_transfer_hook_interface::instruction::ExecuteInstruction;

pub use constants::*;
pub use instructions::*;
pub use state::*;

//  WRAPPED SOL FEE TRANSFER HOOK
// Every transfer of a hooked mint costs the sender a wSOL fee, pulled through
// an allowance the sender granted to the program's delegate PDA.
declare_id!("8mP3iGJ3sxyh9nUagbq21zHRBt9rM2VBvdVY9CiUxurM");

#[program]
pub mod wsol_fee_hook {
    use super::*;

    /// Create the ExtraAccountMetaList account for a mint
    ///
    /// # Arguments
    /// * `fee_policy` - Fee charged in wrapped SOL on every transfer of the mint
    ///
    /// Must be signed by the mint authority. Can only succeed once per mint.
    pub fn initialize_extra_account_meta_list(
        ctx: Context<InitializeExtraAccountMetaList>,
        fee_policy: FeePolicy,
    ) -> Result<()> {
        ctx.accounts.initialize_extra_account_meta_list(fee_policy)
    }

    /// Transfer hook Execute, invoked by Token-2022 on every transfer
    ///
    /// # Arguments
    /// * `amount` - Amount of the hooked mint being transferred
    #[instruction(discriminator = ExecuteInstruction::SPL_DISCRIMINATOR_SLICE)]
    pub fn transfer_hook(ctx: Context<TransferHook>, amount: u64) -> Result<()> {
        ctx.accounts.transfer_hook(amount)
    }
}
