use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    access::Role,
    constants::*,
    custody::{vault_token_address, AnchorCustody, DepositorAccounts, VaultSigner},
    engine,
    errors::*,
    events::*,
    providers::load_providers,
    state::*,
};

/// Seed deposit that makes the vault usable
///
/// Remaining accounts: one reserve per registered provider, in registry order.
#[derive(Accounts)]
pub struct SetupVault<'info> {
    /// Vault admin funding the seed deposit
    pub authority: Signer<'info>,

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

    #[account(
        mut,
        constraint = vault_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_token_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
        address = vault_token_address(&vault_authority.key(), &vault_state.asset_mint) @ VaultError::InvalidVaultTokenAccount,
    )]
    pub vault_token_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = vault_share_account.mint == vault_state.share_mint @ VaultError::InvalidMint,
        constraint = vault_share_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_share_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = authority_asset_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = authority_asset_account.owner == authority.key() @ VaultError::InvalidOwner,
    )]
    pub authority_asset_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

pub fn handler<'info>(ctx: Context<'_, '_, 'info, 'info, SetupVault<'info>>, assets: u64) -> Result<()> {
    ctx.accounts
        .vault_state
        .require_role(&ctx.accounts.authority.key(), Role::Admin)?;

    let vault_key = ctx.accounts.vault_state.key();
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
    let mut providers = load_providers(
        &ctx.accounts.provider_registry,
        ctx.remaining_accounts,
        &asset_mint,
        &signer,
    )?;
    let mut custody = AnchorCustody {
        signer,
        share_mint: ctx.accounts.share_mint.to_account_info(),
        vault_share_account: Some(ctx.accounts.vault_share_account.to_account_info()),
        treasury_token_account: None,
        depositor: Some(DepositorAccounts {
            owner: ctx.accounts.authority.to_account_info(),
            asset_account: ctx.accounts.authority_asset_account.to_account_info(),
            share_account: None,
        }),
    };

    let outcome = engine::setup(
        &mut ctx.accounts.vault_state,
        providers.as_mut_slice(),
        &mut custody,
        assets,
    )?;

    emit!(SetupCompleted {
        vault: vault_key,
        assets: outcome.assets,
        shares: outcome.shares,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
