use anchor_lang::prelude::*;
use spl_tlv_account_resolution::{account::ExtraAccountMeta, seeds::Seed, state::ExtraAccountMetaList};
use spl_transfer_hook_interface::instruction::{ExecuteInstruction, TransferHookInstruction};
use spl_type_length_value::state::{TlvState, TlvStateBorrowed, TlvStateMut};

use crate::{
    constants::*,
    error::FeeHookError,
    state::{FeePolicy, FeePolicyRecord},
};

/// The fee is moved while Token-2022 is still executing the transfer, and the
/// runtime only lets a program be re-entered by itself. A wrapped SOL mint owned
/// by Token-2022 would make every transfer of the hooked mint fail.
pub fn check_fee_token_program(token_program: &Pubkey) -> Result<()> {
    require_keys_neq!(
        *token_program,
        anchor_spl::token_2022::ID,
        FeeHookError::ReentrantTokenProgram
    );
    Ok(())
}

/// Accounts Token-2022 must append to every Execute for a hooked mint.
/// Indices 0-3 are source, mint, destination and owner, index 4 is the list itself.
pub fn extra_account_metas(wsol_mint: &Pubkey, token_program: &Pubkey) -> Result<Vec<ExtraAccountMeta>> {
    check_fee_token_program(token_program)?;

    Ok(vec![
        // index 5, wrapped SOL mint
        ExtraAccountMeta::new_with_pubkey(wsol_mint, false, false)?,
        // index 6, token program owning the wrapped SOL mint
        ExtraAccountMeta::new_with_pubkey(token_program, false, false)?,
        // index 7, associated token program
        ExtraAccountMeta::new_with_pubkey(&anchor_spl::associated_token::ID, false, false)?,
        // index 8, delegate PDA
        ExtraAccountMeta::new_with_seeds(
            &[Seed::Literal {
                bytes: DELEGATE_SEED.to_vec(),
            }],
            false, // is_signer
            false, // is_writable
        )?,
        // index 9, fee collection account (delegate wrapped SOL ATA)
        ExtraAccountMeta::new_external_pda_with_seeds(
            ASSOCIATED_TOKEN_PROGRAM_INDEX,
            &[
                Seed::AccountKey { index: DELEGATE_INDEX },
                Seed::AccountKey { index: TOKEN_PROGRAM_INDEX },
                Seed::AccountKey { index: WSOL_MINT_INDEX },
            ],
            false, // is_signer
            true,  // is_writable
        )?,
        // index 10, sender wrapped SOL ATA
        ExtraAccountMeta::new_external_pda_with_seeds(
            ASSOCIATED_TOKEN_PROGRAM_INDEX,
            &[
                Seed::AccountKey { index: OWNER_INDEX },
                Seed::AccountKey { index: TOKEN_PROGRAM_INDEX },
                Seed::AccountKey { index: WSOL_MINT_INDEX },
            ],
            false, // is_signer
            true,  // is_writable
        )?,
    ])
}

/// Size of the registry account: the meta list entry plus the fee policy entry
pub fn registry_size() -> Result<usize> {
    let metas_size = ExtraAccountMetaList::size_of(EXTRA_ACCOUNT_COUNT)?;
    let policy_size = TlvStateBorrowed::get_base_len()
        .checked_add(std::mem::size_of::<FeePolicyRecord>())
        .ok_or(FeeHookError::MathOverflow)?;

    metas_size
        .checked_add(policy_size)
        .ok_or(FeeHookError::MathOverflow.into())
}

/// Anything written to the account means a previous initialization went through
pub fn is_registry_initialized(data: &[u8]) -> bool {
    data.iter().any(|&b| b != 0)
}

/// Writes the meta list and the fee policy into a freshly allocated registry.
/// Never overwrites: an already written registry fails with `AlreadyInitialized`.
pub fn write_registry(
    data: &mut [u8],
    extra_account_metas: &[ExtraAccountMeta],
    fee_policy: &FeePolicy,
) -> Result<()> {
    require!(
        !is_registry_initialized(data),
        FeeHookError::AlreadyInitialized
    );
    fee_policy.validate()?;

    ExtraAccountMetaList::init::<ExecuteInstruction>(data, extra_account_metas)?;

    let mut state = TlvStateMut::unpack(data)?;
    let (record, _) = state.init_value::<FeePolicyRecord>(false)?;
    *record = FeePolicyRecord::from(*fee_policy);

    Ok(())
}

/// Fee policy stored next to the meta list
pub fn read_fee_policy(data: &[u8]) -> Result<FeePolicy> {
    require!(is_registry_initialized(data), FeeHookError::NotInitialized);

    let state = TlvStateBorrowed::unpack(data)?;
    let record = state
        .get_first_value::<FeePolicyRecord>()
        .map_err(|_| error!(FeeHookError::NotInitialized))?;

    FeePolicy::try_from(record)
}

/// Re-derives every extra account of an Execute from the registry and compares it
/// with what was supplied. Any substitution is reported as `AccountMismatch`.
pub fn check_execute_accounts(account_infos: &[AccountInfo], amount: u64, data: &[u8]) -> Result<()> {
    require!(is_registry_initialized(data), FeeHookError::NotInitialized);
    require!(
        account_infos.len() == EXTRA_ACCOUNT_META_LIST_INDEX as usize + 1 + EXTRA_ACCOUNT_COUNT,
        FeeHookError::AccountMismatch
    );

    let instruction_data = TransferHookInstruction::Execute { amount }.pack();
    ExtraAccountMetaList::check_account_infos::<ExecuteInstruction>(
        account_infos,
        &instruction_data,
        &crate::ID,
        data,
    )
    .map_err(|_| error!(FeeHookError::AccountMismatch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{services::account_resolver::resolve_execute_accounts, utils::pda};
    use anchor_spl::token::{self, spl_token::native_mint};

    fn code(err: anchor_lang::error::Error) -> u32 {
        match err {
            anchor_lang::error::Error::AnchorError(e) => e.error_code_number,
            anchor_lang::error::Error::ProgramError(e) => panic!("unexpected program error {e:?}"),
        }
    }

    fn written_registry(policy: FeePolicy) -> Vec<u8> {
        let metas = extra_account_metas(&native_mint::ID, &token::ID).unwrap();
        let mut data = vec![0u8; registry_size().unwrap()];
        write_registry(&mut data, &metas, &policy).unwrap();
        data
    }

    #[test]
    fn test_registry_size_fits_both_entries() {
        let data = written_registry(FeePolicy::Fixed { amount: 10 });

        assert_eq!(data.len(), registry_size().unwrap());
        assert_eq!(
            read_fee_policy(&data).unwrap(),
            FeePolicy::Fixed { amount: 10 }
        );
    }

    #[test]
    fn test_token_2022_cannot_collect_fees() {
        let err = check_fee_token_program(&anchor_spl::token_2022::ID).unwrap_err();
        assert_eq!(code(err), u32::from(FeeHookError::ReentrantTokenProgram));

        let err = extra_account_metas(
            &anchor_spl::token_2022::spl_token_2022::native_mint::ID,
            &anchor_spl::token_2022::ID,
        )
        .unwrap_err();
        assert_eq!(code(err), u32::from(FeeHookError::ReentrantTokenProgram));

        assert!(check_fee_token_program(&token::ID).is_ok());
    }

    #[test]
    fn test_registry_is_write_once() {
        let mut data = written_registry(FeePolicy::Fixed { amount: 10 });
        let before = data.clone();
        let metas = extra_account_metas(&native_mint::ID, &token::ID).unwrap();

        let err = write_registry(&mut data, &metas, &FeePolicy::Fixed { amount: 0 }).unwrap_err();

        assert_eq!(code(err), u32::from(FeeHookError::AlreadyInitialized));
        assert_eq!(data, before);
    }

    #[test]
    fn test_invalid_policy_leaves_registry_empty() {
        let metas = extra_account_metas(&native_mint::ID, &token::ID).unwrap();
        let mut data = vec![0u8; registry_size().unwrap()];
        let policy = FeePolicy::Proportional {
            basis_points: MAX_FEE_BASIS_POINTS + 1,
            maximum_fee: 0,
        };

        assert!(write_registry(&mut data, &metas, &policy).is_err());
        assert!(!is_registry_initialized(&data));
    }

    #[test]
    fn test_empty_registry_has_no_policy() {
        let data = vec![0u8; registry_size().unwrap()];

        let err = read_fee_policy(&data).unwrap_err();
        assert_eq!(code(err), u32::from(FeeHookError::NotInitialized));
    }

    struct ExecuteFixture {
        keys: Vec<Pubkey>,
        signer: Vec<bool>,
        writable: Vec<bool>,
        lamports: Vec<u64>,
        data: Vec<Vec<u8>>,
        owner: Pubkey,
    }

    impl ExecuteFixture {
        fn new(registry: &[u8], amount: u64) -> Self {
            let mint = Pubkey::new_unique();
            let metas = resolve_execute_accounts(
                &Pubkey::new_unique(),
                &mint,
                &Pubkey::new_unique(),
                &Pubkey::new_unique(),
                amount,
                registry,
            )
            .unwrap();
            let count = metas.len();

            Self {
                keys: metas.iter().map(|m| m.pubkey).collect(),
                signer: metas.iter().map(|m| m.is_signer).collect(),
                writable: metas.iter().map(|m| m.is_writable).collect(),
                lamports: vec![0; count],
                data: vec![vec![]; count],
                owner: Pubkey::default(),
            }
        }

        fn check(&mut self, amount: u64, registry: &[u8]) -> Result<()> {
            let infos: Vec<AccountInfo> = self
                .keys
                .iter()
                .zip(self.signer.iter())
                .zip(self.writable.iter())
                .zip(self.lamports.iter_mut())
                .zip(self.data.iter_mut())
                .map(|((((key, signer), writable), lamports), data)| {
                    AccountInfo::new(
                        key,
                        *signer,
                        *writable,
                        lamports,
                        data.as_mut_slice(),
                        &self.owner,
                        false,
                        0,
                    )
                })
                .collect();

            check_execute_accounts(&infos, amount, registry)
        }
    }

    #[test]
    fn test_resolved_accounts_pass_check() {
        let registry = written_registry(FeePolicy::Fixed { amount: 10 });
        let mut fixture = ExecuteFixture::new(&registry, 1);

        assert!(fixture.check(1, &registry).is_ok());
    }

    #[test]
    fn test_substituted_account_is_rejected() {
        let registry = written_registry(FeePolicy::Fixed { amount: 10 });

        for index in WSOL_MINT_INDEX..=SENDER_WSOL_TOKEN_ACCOUNT_INDEX {
            let mut fixture = ExecuteFixture::new(&registry, 1);
            fixture.keys[index as usize] = Pubkey::new_unique();

            let err = fixture.check(1, &registry).unwrap_err();
            assert_eq!(code(err), u32::from(FeeHookError::AccountMismatch));
        }
    }

    #[test]
    fn test_someone_elses_wsol_account_is_rejected() {
        let registry = written_registry(FeePolicy::Fixed { amount: 10 });
        let mut fixture = ExecuteFixture::new(&registry, 1);

        // A real, funded ATA, just not the one derived from the owner
        fixture.keys[SENDER_WSOL_TOKEN_ACCOUNT_INDEX as usize] =
            pda::wsol_token_account_address(&Pubkey::new_unique(), &native_mint::ID, &token::ID)
                .unwrap();

        let err = fixture.check(1, &registry).unwrap_err();
        assert_eq!(code(err), u32::from(FeeHookError::AccountMismatch));
    }

    #[test]
    fn test_missing_accounts_are_rejected() {
        let registry = written_registry(FeePolicy::Fixed { amount: 10 });
        let mut fixture = ExecuteFixture::new(&registry, 1);
        fixture.keys.pop();
        fixture.signer.pop();
        fixture.writable.pop();
        fixture.lamports.pop();
        fixture.data.pop();

        let err = fixture.check(1, &registry).unwrap_err();
        assert_eq!(code(err), u32::from(FeeHookError::AccountMismatch));
    }
}
