use anchor_lang::prelude::*;
use spl_tlv_account_resolution::{account::ExtraAccountMeta, state::ExtraAccountMetaList};
use spl_transfer_hook_interface::{
    get_extra_account_metas_address,
    instruction::{ExecuteInstruction, TransferHookInstruction},
};
use spl_type_length_value::state::TlvStateBorrowed;

use crate::{error::FeeHookError, state::is_registry_initialized};

/// Registry address clients look up for `mint`
pub fn registry_address(mint: &Pubkey) -> Pubkey {
    get_extra_account_metas_address(mint, &crate::ID)
}

/// Parse the ordered extra account metas out of a registry account's data
pub fn resolve_extra_account_metas(data: &[u8]) -> Result<Vec<ExtraAccountMeta>> {
    require!(is_registry_initialized(data), FeeHookError::NotInitialized);

    let state = TlvStateBorrowed::unpack(data).map_err(|_| error!(FeeHookError::NotInitialized))?;
    let extra_metas = ExtraAccountMetaList::unpack_with_tlv_state::<ExecuteInstruction>(&state)
        .map_err(|_| error!(FeeHookError::NotInitialized))?;

    Ok(extra_metas.data().to_vec())
}

/// Full account list of an Execute instruction for a transfer of `amount`,
/// resolved the same way Token-2022 does before invoking the hook.
pub fn resolve_execute_accounts(
    source: &Pubkey,
    mint: &Pubkey,
    destination: &Pubkey,
    owner: &Pubkey,
    amount: u64,
    registry_data: &[u8],
) -> Result<Vec<AccountMeta>> {
    let extra_metas = resolve_extra_account_metas(registry_data)?;
    let instruction_data = TransferHookInstruction::Execute { amount }.pack();

    let mut accounts = vec![
        AccountMeta::new_readonly(*source, false),
        AccountMeta::new_readonly(*mint, false),
        AccountMeta::new_readonly(*destination, false),
        AccountMeta::new_readonly(*owner, false),
        AccountMeta::new_readonly(registry_address(mint), false),
    ];

    for extra_meta in extra_metas.iter() {
        let meta = extra_meta
            .resolve(&instruction_data, &crate::ID, |index| {
                accounts.get(index).map(|account| (&account.pubkey, None))
            })
            .map_err(|_| error!(FeeHookError::AccountMismatch))?;
        accounts.push(meta);
    }

    Ok(accounts)
}
