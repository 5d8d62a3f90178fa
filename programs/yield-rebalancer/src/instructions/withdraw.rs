use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    constants::*,
    custody::{vault_token_address, AnchorCustody, DepositorAccounts, VaultSigner},
    engine::{self, WithdrawOutcome},
    errors::*,
    events::*,
    providers::{load_providers, TokenReserveProvider},
    state::*,
};

/// Withdraw or redeem from the active provider
///
/// The withdraw fee stays in the vault token account until the fee collector
/// sweeps it to the treasury.
///
/// Remaining accounts: one reserve per registered provider, in registry order.
#[derive(Accounts)]
pub struct Withdraw<'info> {
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Box<Account<'info, VaultState>>,

    #[account(
        seeds = [PROVIDER_REGISTRY_SEED, vault_state.key().as_ref()],
        bump = provider_registry.bump,
    )]
    pub provider_registry: Box<Account<'info, ProviderRegistry>>,

    #[account(
        mut,
        address = vault_state.share_mint,
    )]
    pub share_mint: Box<Account<'info, Mint>>,

    /// CHECK: PDA used as authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// User's asset token account (destination)
    #[account(
        mut,
        constraint = user_asset_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = user_asset_account.owner == user.key() @ VaultError::InvalidOwner,
    )]
    pub user_asset_account: Box<Account<'info, TokenAccount>>,

    /// User's share token account (burned from)
    #[account(
        mut,
        constraint = user_share_account.mint == vault_state.share_mint @ VaultError::InvalidMint,
        constraint = user_share_account.owner == user.key() @ VaultError::InvalidOwner,
    )]
    pub user_share_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = vault_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_token_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
        address = vault_token_address(&vault_authority.key(), &vault_state.asset_mint) @ VaultError::InvalidVaultTokenAccount,
    )]
    pub vault_token_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

#[derive(Clone, Copy)]
enum Exit {
    Assets(u64),
    Shares(u64),
}

pub fn withdraw_handler<'info>(ctx: Context<'_, '_, 'info, 'info, Withdraw<'info>>, assets: u64) -> Result<()> {
    process(ctx, Exit::Assets(assets))
}

pub fn redeem_handler<'info>(ctx: Context<'_, '_, 'info, 'info, Withdraw<'info>>, shares: u64) -> Result<()> {
    process(ctx, Exit::Shares(shares))
}

fn process<'info>(ctx: Context<'_, '_, 'info, 'info, Withdraw<'info>>, exit: Exit) -> Result<()> {
    let vault_key = ctx.accounts.vault_state.key();
    let owner_shares = ctx.accounts.user_share_account.amount;
    let asset_mint = ctx.accounts.vault_state.asset_mint;
    let authority_bump = [ctx.accounts.vault_state.authority_bump];
    let authority_seeds: &[&[u8]] = &[VAULT_AUTHORITY_SEED, asset_mint.as_ref(), &authority_bump];
    let signer_seeds = &[authority_seeds];

    let signer = VaultSigner {
        token_program: ctx.accounts.token_program.to_account_info(),
        vault_token_account: ctx.accounts.vault_token_account.to_account_info(),
        vault_authority: ctx.accounts.vault_authority.to_account_info(),
        signer_seeds,
    };
    let mut providers: Vec<TokenReserveProvider> = load_providers(
        &ctx.accounts.provider_registry,
        ctx.remaining_accounts,
        &asset_mint,
        &signer,
    )?;
    let mut custody = AnchorCustody {
        signer,
        share_mint: ctx.accounts.share_mint.to_account_info(),
        vault_share_account: None,
        treasury_token_account: None,
        depositor: Some(DepositorAccounts {
            owner: ctx.accounts.user.to_account_info(),
            asset_account: ctx.accounts.user_asset_account.to_account_info(),
            share_account: Some(ctx.accounts.user_share_account.to_account_info()),
        }),
    };

    let vault_state: &mut VaultState = &mut ctx.accounts.vault_state;
    let outcome: WithdrawOutcome = match exit {
        Exit::Assets(assets) => engine::withdraw(
            vault_state,
            providers.as_mut_slice(),
            &mut custody,
            assets,
            owner_shares,
        )?,
        Exit::Shares(shares) => engine::redeem(
            vault_state,
            providers.as_mut_slice(),
            &mut custody,
            shares,
            owner_shares,
        )?,
    };

    emit!(Withdrawn {
        vault: vault_key,
        user: ctx.accounts.user.key(),
        asset_amount: outcome.assets,
        shares_burned: outcome.shares,
        withdraw_fee: outcome.fee,
        total_shares: ctx.accounts.vault_state.total_shares,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
