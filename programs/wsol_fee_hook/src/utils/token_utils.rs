use anchor_lang::prelude::*;
use anchor_spl::token_2022::spl_token_2022::{
    extension::{
        transfer_hook::{TransferHook, TransferHookAccount},
        BaseStateWithExtensions, PodStateWithExtensions, StateWithExtensions,
    },
    pod::PodAccount,
    state::Mint,
};

use crate::error::FeeHookError;

/// Check if an account is owned by Token-2022
pub fn is_token_2022_account(account: &AccountInfo) -> bool {
    account.owner == &anchor_spl::token_2022::ID
}

/// Get the transfer hook program ID from a Token-2022 mint, if any
pub fn get_transfer_hook_program_id(mint_account: &AccountInfo) -> Result<Option<Pubkey>> {
    if !is_token_2022_account(mint_account) {
        return Ok(None);
    }

    let mint_data = mint_account.try_borrow_data()?;
    let mint_state = StateWithExtensions::<Mint>::unpack(&mint_data)?;

    let Ok(transfer_hook) = mint_state.get_extension::<TransferHook>() else {
        return Ok(None);
    };

    let program_id = Pubkey::try_from(transfer_hook.program_id.0.as_ref()).unwrap_or_default();
    if program_id == Pubkey::default() {
        return Ok(None);
    }

    Ok(Some(program_id))
}

/// True while Token-2022 is in the middle of a transfer out of `source_account`.
/// The flag is only ever set by the token program itself, right before it invokes the hook.
pub fn is_transferring(source_account: &AccountInfo) -> Result<bool> {
    if !is_token_2022_account(source_account) {
        return Ok(false);
    }

    let account_data = source_account.try_borrow_data()?;
    let account = PodStateWithExtensions::<PodAccount>::unpack(&account_data)
        .map_err(|_| error!(FeeHookError::UntrustedCaller))?;
    let account_extension = account
        .get_extension::<TransferHookAccount>()
        .map_err(|_| error!(FeeHookError::UntrustedCaller))?;

    Ok(bool::from(account_extension.transferring))
}
