use anchor_lang::{
    prelude::*,
    solana_program::program_option::COption,
    system_program::{
        allocate, assign, create_account, transfer, Allocate, Assign, CreateAccount, Transfer,
    },
};
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::{
    constants::EXTRA_ACCOUNT_METAS_SEED,
    error::FeeHookError,
    events::RegistryInitialized,
    state::{check_fee_token_program, extra_account_metas, registry_size, write_registry, FeePolicy},
    utils::{pda, token_utils::get_transfer_hook_program_id},
};

#[derive(Accounts)]
pub struct InitializeExtraAccountMetaList<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    /// Mint authority of `mint`, the only one allowed to pick its fee policy
    pub authority: Signer<'info>,

    /// CHECK: ExtraAccountMetaList Account, address checked and created in the handler
    #[account(mut)]
    pub extra_account_meta_list: UncheckedAccount<'info>,

    /// The Token-2022 mint whose transfer hook points at this program
    pub mint: InterfaceAccount<'info, Mint>,

    /// Wrapped SOL mint fees are paid in
    #[account(mint::token_program = token_program)]
    pub wsol_mint: InterfaceAccount<'info, Mint>,

    /// CHECK: key-less PDA, only ever used as token authority
    #[account(seeds = [crate::constants::DELEGATE_SEED], bump)]
    pub delegate: UncheckedAccount<'info>,

    /// Fee collection account, shared by every mint using the same wrapped SOL mint
    #[account(
        init_if_needed,
        payer = payer,
        associated_token::mint = wsol_mint,
        associated_token::authority = delegate,
        associated_token::token_program = token_program
    )]
    pub delegate_wsol_token_account: InterfaceAccount<'info, TokenAccount>,

    /// Token program of the wrapped SOL mint, never Token-2022 itself
    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> InitializeExtraAccountMetaList<'info> {
    pub fn initialize_extra_account_meta_list(&mut self, fee_policy: FeePolicy) -> Result<()> {
        fee_policy.validate()?;
        check_fee_token_program(&self.token_program.key())?;
        self.validate_mint()?;

        let (registry, bump) = pda::extra_account_meta_list_address(&self.mint.key())?;
        pda::verify_derived(&self.extra_account_meta_list.key(), &registry)?;

        let account_metas = extra_account_metas(&self.wsol_mint.key(), &self.token_program.key())?;
        let account_size = registry_size()?;

        self.create_registry_account(account_size, bump)?;

        {
            let registry_info = self.extra_account_meta_list.to_account_info();
            let mut data = registry_info.try_borrow_mut_data()?;
            write_registry(&mut data, &account_metas, &fee_policy)?;
        }

        emit!(RegistryInitialized {
            mint: self.mint.key(),
            extra_account_meta_list: registry,
            wsol_mint: self.wsol_mint.key(),
            fee_policy,
        });

        msg!("Wrapped SOL fee hook initialized:");
        msg!("  Mint: {}", self.mint.key());
        msg!("  Extra account meta list: {}", registry);
        msg!("  Wrapped SOL mint: {}", self.wsol_mint.key());
        msg!("  Fee collection account: {}", self.delegate_wsol_token_account.key());
        msg!("  Fee policy: {:?}", fee_policy);

        Ok(())
    }

    fn validate_mint(&self) -> Result<()> {
        require!(
            self.mint.mint_authority == COption::Some(self.authority.key()),
            FeeHookError::Unauthorized
        );

        let hook_program_id = get_transfer_hook_program_id(&self.mint.to_account_info())?;
        require!(
            hook_program_id == Some(crate::ID),
            FeeHookError::HookProgramMismatch
        );

        Ok(())
    }

    /// Allocate the registry PDA, failing if this program already owns it.
    /// Lamports sent to the address ahead of time are kept and topped up to rent exemption.
    fn create_registry_account(&self, space: usize, bump: u8) -> Result<()> {
        let registry = self.extra_account_meta_list.to_account_info();
        require!(
            registry.owner != &crate::ID,
            FeeHookError::AlreadyInitialized
        );

        let mint = self.mint.key();
        let signer_seeds: &[&[&[u8]]] = &[&[EXTRA_ACCOUNT_METAS_SEED, mint.as_ref(), &[bump]]];
        let lamports = Rent::get()?.minimum_balance(space);
        let current_lamports = registry.lamports();

        if current_lamports == 0 {
            create_account(
                CpiContext::new(
                    self.system_program.to_account_info(),
                    CreateAccount {
                        from: self.payer.to_account_info(),
                        to: registry,
                    },
                )
                .with_signer(signer_seeds),
                lamports,
                space as u64,
                &crate::ID,
            )?;
            return Ok(());
        }

        let top_up = lamports.saturating_sub(current_lamports);
        if top_up > 0 {
            transfer(
                CpiContext::new(
                    self.system_program.to_account_info(),
                    Transfer {
                        from: self.payer.to_account_info(),
                        to: registry.clone(),
                    },
                ),
                top_up,
            )?;
        }

        allocate(
            CpiContext::new_with_signer(
                self.system_program.to_account_info(),
                Allocate {
                    account_to_allocate: registry.clone(),
                },
                signer_seeds,
            ),
            space as u64,
        )?;

        assign(
            CpiContext::new_with_signer(
                self.system_program.to_account_info(),
                Assign {
                    account_to_assign: registry,
                },
                signer_seeds,
            ),
            &crate::ID,
        )?;

        Ok(())
    }
}
