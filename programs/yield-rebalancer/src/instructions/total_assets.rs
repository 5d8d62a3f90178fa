use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{
    constants::*,
    custody::{vault_token_address, VaultSigner},
    engine,
    errors::*,
    providers::load_providers,
    state::*,
};

/// Read-only view over the vault's provider positions
///
/// Remaining accounts: one reserve per registered provider, in registry order.
#[derive(Accounts)]
pub struct ViewVault<'info> {
    #[account(
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Box<Account<'info, VaultState>>,

    #[account(
        seeds = [PROVIDER_REGISTRY_SEED, vault_state.key().as_ref()],
        bump = provider_registry.bump,
    )]
    pub provider_registry: Box<Account<'info, ProviderRegistry>>,

    /// CHECK: PDA used as authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    #[account(
        constraint = vault_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_token_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
        address = vault_token_address(&vault_authority.key(), &vault_state.asset_mint) @ VaultError::InvalidVaultTokenAccount,
    )]
    pub vault_token_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

pub fn handler<'info>(ctx: Context<'_, '_, 'info, 'info, ViewVault<'info>>) -> Result<u64> {
    let asset_mint = ctx.accounts.vault_state.asset_mint;
    // Views never sign
    let signer = VaultSigner {
        token_program: ctx.accounts.token_program.to_account_info(),
        vault_token_account: ctx.accounts.vault_token_account.to_account_info(),
        vault_authority: ctx.accounts.vault_authority.to_account_info(),
        signer_seeds: &[],
    };
    let providers = load_providers(
        &ctx.accounts.provider_registry,
        ctx.remaining_accounts,
        &asset_mint,
        &signer,
    )?;

    let total = engine::total_assets(providers.as_slice())?;
    ctx.accounts.vault_state.check_solvency(total)?;
    Ok(total)
}
