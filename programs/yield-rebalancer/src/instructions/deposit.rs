use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};

use crate::{
    constants::*,
    custody::{vault_token_address, AnchorCustody, DepositorAccounts, VaultSigner},
    engine,
    errors::*,
    events::*,
    providers::load_providers,
    state::*,
};

/// Deposit assets into the vault and receive shares
///
/// Security checklist:
/// ✅ 1. SIGNER VALIDATION: User must be signer
/// ✅ 2. ACCOUNT OWNERSHIP: Vault state PDA validated with seeds
/// ✅ 6. MATH SAFETY: Shares rounded down against the live provider total
/// ✅ 7. TOKEN ACCOUNT VALIDATION: Validates mint and owner
/// ✅ 8. BUSINESS LOGIC: Provider deposit staged before shares are minted
/// ✅ 10. EVENTS: Emits Deposited event
///
/// Remaining accounts: one reserve per registered provider, in registry order.
#[derive(Accounts)]
pub struct Deposit<'info> {
    /// User depositing assets
    /// Security: Must be signer
    #[account(mut)]
    pub user: Signer<'info>,

    /// Vault state PDA
    /// Security: Validated by seeds
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

    /// Share mint
    /// Security: Must match vault_state.share_mint
    #[account(
        mut,
        address = vault_state.share_mint,
    )]
    pub share_mint: Box<Account<'info, Mint>>,

    /// Vault authority PDA
    /// CHECK: PDA used as authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// User's asset token account (source)
    /// Security: Must be owned by user and correct mint
    #[account(
        mut,
        constraint = user_asset_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = user_asset_account.owner == user.key() @ VaultError::InvalidOwner,
    )]
    pub user_asset_account: Box<Account<'info, TokenAccount>>,

    /// User's share token account (destination)
    #[account(
        init_if_needed,
        payer = user,
        associated_token::mint = share_mint,
        associated_token::authority = user,
    )]
    pub user_share_account: Box<Account<'info, TokenAccount>>,

    /// Vault's token account (staging balance)
    /// Security: Must be correct mint and owned by vault_authority
    #[account(
        mut,
        constraint = vault_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_token_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
        address = vault_token_address(&vault_authority.key(), &vault_state.asset_mint) @ VaultError::InvalidVaultTokenAccount,
    )]
    pub vault_token_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(ctx: Context<'_, '_, 'info, 'info, Deposit<'info>>, amount: u64) -> Result<()> {
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
        vault_share_account: None,
        treasury_token_account: None,
        depositor: Some(DepositorAccounts {
            owner: ctx.accounts.user.to_account_info(),
            asset_account: ctx.accounts.user_asset_account.to_account_info(),
            share_account: Some(ctx.accounts.user_share_account.to_account_info()),
        }),
    };

    let outcome = engine::deposit(
        &mut ctx.accounts.vault_state,
        providers.as_mut_slice(),
        &mut custody,
        amount,
    )?;

    emit!(Deposited {
        vault: vault_key,
        user: ctx.accounts.user.key(),
        asset_amount: outcome.assets,
        shares_minted: outcome.shares,
        total_assets: outcome.total_assets,
        total_shares: ctx.accounts.vault_state.total_shares,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
