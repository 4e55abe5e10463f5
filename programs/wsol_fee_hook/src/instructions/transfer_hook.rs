use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked},
};

use crate::{
    constants::DELEGATE_SEED,
    error::FeeHookError,
    events::FeeCollected,
    state::{check_execute_accounts, read_fee_policy},
    utils::{allowance::check_allowance, pda, token_utils::is_transferring},
};

/// Accounts of the transfer hook Execute instruction, in interface order.
/// Everything after `extra_account_meta_list` is declared by the registry.
#[derive(Accounts)]
pub struct TransferHook<'info> {
    pub source_token: InterfaceAccount<'info, TokenAccount>,
    pub mint: InterfaceAccount<'info, Mint>,
    pub destination_token: InterfaceAccount<'info, TokenAccount>,
    /// CHECK: source token account owner, can be SystemAccount or PDA owned by another program
    pub owner: UncheckedAccount<'info>,
    /// CHECK: ExtraAccountMetaList Account, checked against its derived address
    pub extra_account_meta_list: UncheckedAccount<'info>,
    pub wsol_mint: InterfaceAccount<'info, Mint>,
    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// CHECK: delegate PDA, checked against the registry
    pub delegate: UncheckedAccount<'info>,
    #[account(mut)]
    pub delegate_wsol_token_account: InterfaceAccount<'info, TokenAccount>,
    /// CHECK: sender wrapped SOL ATA, address checked against the registry.
    /// Only read when a fee is due, so senders without one can still make free transfers.
    #[account(mut)]
    pub sender_wsol_token_account: UncheckedAccount<'info>,
}

impl<'info> TransferHook<'info> {
    pub fn transfer_hook(&mut self, amount: u64) -> Result<()> {
        self.check_transfer_state()?;
        self.check_registry_accounts(amount)?;
        self.check_token_accounts()?;

        let fee_policy = {
            let data = self.extra_account_meta_list.try_borrow_data()?;
            read_fee_policy(&data)?
        };
        let fee = fee_policy.compute(amount)?;

        if fee == 0 {
            msg!("Transfer of {} tokens, no fee due", amount);
            return Ok(());
        }

        let sender_wsol = self.load_sender_wsol_account()?;
        let (delegate, bump) = pda::delegate_address()?;
        let remaining_allowance = check_allowance(
            &delegate,
            sender_wsol.delegate,
            sender_wsol.delegated_amount,
            sender_wsol.amount,
            fee,
        )?;

        self.collect_fee(fee, bump)?;

        emit!(FeeCollected {
            mint: self.mint.key(),
            owner: self.owner.key(),
            sender_wsol_token_account: self.sender_wsol_token_account.key(),
            amount,
            fee,
            remaining_allowance,
        });

        msg!(
            "Transfer of {} tokens, collected fee {} (allowance left {})",
            amount,
            fee,
            remaining_allowance
        );

        Ok(())
    }

    /// Only Token-2022 sets `transferring` on the source account, and only
    /// for the duration of the transfer that invokes the hook.
    fn check_transfer_state(&self) -> Result<()> {
        require!(
            is_transferring(&self.source_token.to_account_info())?,
            FeeHookError::UntrustedCaller
        );
        Ok(())
    }

    fn check_registry_accounts(&self, amount: u64) -> Result<()> {
        let (registry, _) = pda::extra_account_meta_list_address(&self.mint.key())?;
        pda::verify_derived(&self.extra_account_meta_list.key(), &registry)?;

        require!(
            self.extra_account_meta_list.owner == &crate::ID,
            FeeHookError::NotInitialized
        );

        let account_infos = self.to_account_infos();
        let data = self.extra_account_meta_list.try_borrow_data()?;
        check_execute_accounts(&account_infos, amount, &data)
    }

    fn check_token_accounts(&self) -> Result<()> {
        let mint = self.mint.key();
        require_keys_eq!(self.source_token.mint, mint, FeeHookError::MintMismatch);
        require_keys_eq!(self.destination_token.mint, mint, FeeHookError::MintMismatch);
        require_keys_eq!(
            self.source_token.owner,
            self.owner.key(),
            FeeHookError::AccountMismatch
        );

        // ATA addresses are fixed by the registry, but their owner can be reassigned
        require_keys_eq!(
            self.delegate_wsol_token_account.mint,
            self.wsol_mint.key(),
            FeeHookError::MintMismatch
        );
        require_keys_eq!(
            self.delegate_wsol_token_account.owner,
            self.delegate.key(),
            FeeHookError::AccountMismatch
        );

        Ok(())
    }

    /// Sender wrapped SOL account, which must exist and belong to the owner once a fee is due
    fn load_sender_wsol_account(&self) -> Result<TokenAccount> {
        let info = self.sender_wsol_token_account.to_account_info();
        // No account, nothing was ever approved to the delegate
        require!(!info.data_is_empty(), FeeHookError::InsufficientAllowance);
        require_keys_eq!(
            *info.owner,
            self.token_program.key(),
            FeeHookError::AccountMismatch
        );

        let data = info.try_borrow_data()?;
        let account = TokenAccount::try_deserialize(&mut &data[..])?;

        require_keys_eq!(account.mint, self.wsol_mint.key(), FeeHookError::MintMismatch);
        require_keys_eq!(account.owner, self.owner.key(), FeeHookError::AccountMismatch);

        Ok(account)
    }

    /// Move `fee` from the sender's wrapped SOL account, signing as the delegate PDA
    fn collect_fee(&self, fee: u64, bump: u8) -> Result<()> {
        let signer_seeds: &[&[&[u8]]] = &[&[DELEGATE_SEED, &[bump]]];

        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.sender_wsol_token_account.to_account_info(),
                    mint: self.wsol_mint.to_account_info(),
                    to: self.delegate_wsol_token_account.to_account_info(),
                    authority: self.delegate.to_account_info(),
                },
                signer_seeds,
            ),
            fee,
            self.wsol_mint.decimals,
        )
    }
}
