use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};

use crate::{constants::*, errors::*, events::*, providers::ReserveRules, state::*};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct InitializeParams {
    pub variant: VaultVariant,
    pub withdraw_fee_percent: u64,
    pub profit_fee_percent: u16,
    pub min_amount: u64,
    pub operator: Pubkey,
    pub timelock: Pubkey,
    pub treasury: Pubkey,
    /// Initial provider set; the first entry becomes the active provider
    pub providers: Vec<ProviderConfig>,
}

/// Initialize a new vault for a given asset token
///
/// Remaining accounts: one reserve per entry of `params.providers`, in order.
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Vault admin
    /// Security: Must be signer, stored in state
    #[account(mut)]
    pub authority: Signer<'info>,

    /// Vault state PDA
    /// Security: Initialized with proper space and padding for upgrades
    #[account(
        init,
        payer = authority,
        space = VaultState::SPACE,
        seeds = [VAULT_SEED, asset_mint.key().as_ref()],
        bump
    )]
    pub vault_state: Box<Account<'info, VaultState>>,

    /// Asset token mint (the underlying token users deposit)
    pub asset_mint: Box<Account<'info, Mint>>,

    /// Share token mint PDA (vault shares)
    /// Security: Mint authority is vault_authority PDA
    #[account(
        init,
        payer = authority,
        seeds = [SHARE_MINT_SEED, asset_mint.key().as_ref()],
        bump,
        mint::decimals = asset_mint.decimals,
        mint::authority = vault_authority,
    )]
    pub share_mint: Box<Account<'info, Mint>>,

    /// Vault authority PDA - mint authority for shares and owner of provider reserves
    /// CHECK: PDA used as authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, asset_mint.key().as_ref()],
        bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// Vault's idle asset balance
    #[account(
        init,
        payer = authority,
        associated_token::mint = asset_mint,
        associated_token::authority = vault_authority,
    )]
    pub vault_token_account: Box<Account<'info, TokenAccount>>,

    /// Vault's own share balance (setup shares)
    #[account(
        init,
        payer = authority,
        associated_token::mint = share_mint,
        associated_token::authority = vault_authority,
    )]
    pub vault_share_account: Box<Account<'info, TokenAccount>>,

    #[account(
        init,
        payer = authority,
        space = ProviderRegistry::SPACE,
        seeds = [PROVIDER_REGISTRY_SEED, vault_state.key().as_ref()],
        bump
    )]
    pub provider_registry: Box<Account<'info, ProviderRegistry>>,

    #[account(
        init,
        payer = authority,
        space = Timelock::SPACE,
        seeds = [TIMELOCK_SEED, vault_state.key().as_ref()],
        bump
    )]
    pub timelock: Box<Account<'info, Timelock>>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, Initialize<'info>>,
    params: InitializeParams,
) -> Result<()> {
    // CHECKS: Validate configuration
    require!(!params.providers.is_empty(), VaultError::EmptyProviderSet);
    for key in [params.operator, params.timelock, params.treasury] {
        require!(key != Pubkey::default(), VaultError::ZeroAddress);
    }

    // CHECKS: Every initial market must be a usable reserve
    require!(
        ctx.remaining_accounts.len() >= params.providers.len(),
        VaultError::MissingProviderAccounts
    );
    let rules = ReserveRules {
        asset_mint: ctx.accounts.asset_mint.key(),
        vault_authority: ctx.accounts.vault_authority.key(),
    };
    for (config, reserve) in params.providers.iter().zip(ctx.remaining_accounts) {
        rules.check_account(&config.market, reserve)?;
    }

    let vault_key = ctx.accounts.vault_state.key();

    // EFFECTS: Provider registry
    let registry = &mut ctx.accounts.provider_registry;
    registry.vault = vault_key;
    registry.bump = ctx.bumps.provider_registry;
    registry.providers = Vec::new();
    for config in params.providers {
        registry.add_provider(config)?;
    }
    let markets = registry.markets();

    let timelock = &mut ctx.accounts.timelock;
    timelock.vault = vault_key;
    timelock.next_id = 0;
    timelock.queue = Vec::new();
    timelock.bump = ctx.bumps.timelock;

    // EFFECTS: Vault state
    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.authority = ctx.accounts.authority.key();
    vault_state.operator = params.operator;
    vault_state.timelock = params.timelock;
    vault_state.set_treasury(params.treasury)?;
    vault_state.asset_mint = ctx.accounts.asset_mint.key();
    vault_state.share_mint = ctx.accounts.share_mint.key();
    vault_state.active_provider = markets[0];
    vault_state.variant = params.variant;
    vault_state.setup_complete = false;
    vault_state.total_shares = 0;
    vault_state.vault_owned_shares = 0;
    vault_state.set_withdraw_fee_percent(params.withdraw_fee_percent)?;
    vault_state.set_profit_fee_percent(params.profit_fee_percent)?;
    vault_state.set_min_amount(params.min_amount)?;
    vault_state.last_total_assets = 0;
    vault_state.bump = ctx.bumps.vault_state;
    vault_state.share_bump = ctx.bumps.share_mint;
    vault_state.authority_bump = ctx.bumps.vault_authority;
    vault_state._reserved = [0; 64];

    // INTERACTIONS: Emit events
    let timestamp = Clock::get()?.unix_timestamp;
    emit!(VaultInitialized {
        vault: vault_key,
        authority: vault_state.authority,
        asset_mint: vault_state.asset_mint,
        share_mint: vault_state.share_mint,
        profit_fees: vault_state.profit_fees_enabled(),
        timestamp,
    });
    emit!(ProvidersUpdated {
        vault: vault_key,
        providers: markets,
        timestamp,
    });

    Ok(())
}
