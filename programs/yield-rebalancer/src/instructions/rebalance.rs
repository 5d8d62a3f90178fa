use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    access::Role,
    constants::*,
    custody::{vault_token_address, AnchorCustody, VaultSigner},
    engine::{self, RebalanceAmount, RebalanceBatch, RebalanceOutcome},
    errors::*,
    events::*,
    instructions::collect_profit_fees::emit_profit_fee,
    providers::{load_providers, TokenReserveProvider},
    state::*,
};

/// Accounts for moving funds between providers and charging fees
///
/// Shared by rebalance, rebalance_batch and collect_profit_fees.
/// Remaining accounts: one reserve per registered provider, in registry order.
#[derive(Accounts)]
pub struct VaultFunds<'info> {
    /// Operator for rebalances, anyone for profit fee collection
    pub caller: Signer<'info>,

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

    /// Security: Must belong to the treasury recorded in vault state
    #[account(
        mut,
        constraint = treasury_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = treasury_token_account.owner == vault_state.treasury @ VaultError::InvalidOwner,
    )]
    pub treasury_token_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

/// Signer seeds, adapters and custody for a `VaultFunds` context, then `f`
pub(crate) fn with_vault_funds<'info, T>(
    ctx: Context<'_, '_, 'info, 'info, VaultFunds<'info>>,
    f: impl FnOnce(
        &mut VaultState,
        &mut [TokenReserveProvider<'_, 'info>],
        &mut AnchorCustody<'_, 'info>,
    ) -> Result<T>,
) -> Result<T> {
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
        treasury_token_account: Some(ctx.accounts.treasury_token_account.to_account_info()),
        depositor: None,
    };

    let vault_state: &mut VaultState = &mut ctx.accounts.vault_state;
    f(vault_state, providers.as_mut_slice(), &mut custody)
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, VaultFunds<'info>>,
    amount: RebalanceAmount,
    from: Pubkey,
    to: Pubkey,
    fee: u64,
    activate_to_provider: bool,
) -> Result<()> {
    ctx.accounts
        .vault_state
        .require_role(&ctx.accounts.caller.key(), Role::Operator)?;
    let vault_key = ctx.accounts.vault_state.key();
    let treasury = ctx.accounts.vault_state.treasury;

    let outcome = with_vault_funds(ctx, |vault, providers, custody| {
        engine::rebalance_amount(
            vault,
            providers,
            custody,
            amount,
            from,
            to,
            fee,
            activate_to_provider,
        )
    })?;

    emit_rebalance(vault_key, treasury, &outcome, Clock::get()?.unix_timestamp);
    Ok(())
}

pub fn batch_handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, VaultFunds<'info>>,
    amounts: Vec<u64>,
    from: Vec<Pubkey>,
    to: Vec<Pubkey>,
    fees: Vec<u64>,
    activate_to_provider: bool,
) -> Result<()> {
    ctx.accounts
        .vault_state
        .require_role(&ctx.accounts.caller.key(), Role::Operator)?;
    let vault_key = ctx.accounts.vault_state.key();
    let treasury = ctx.accounts.vault_state.treasury;

    let batch = RebalanceBatch {
        amounts,
        from,
        to,
        fees,
        activate_to_provider,
    };
    let outcomes = with_vault_funds(ctx, |vault, providers, custody| {
        engine::rebalance_batch(vault, providers, custody, &batch)
    })?;

    let timestamp = Clock::get()?.unix_timestamp;
    for outcome in &outcomes {
        emit_rebalance(vault_key, treasury, outcome, timestamp);
    }
    Ok(())
}

fn emit_rebalance(vault: Pubkey, treasury: Pubkey, outcome: &RebalanceOutcome, timestamp: i64) {
    if let Some(profit_fee) = &outcome.profit_fee {
        emit_profit_fee(vault, treasury, profit_fee, timestamp);
    }
    if outcome.fee > 0 {
        emit!(FeeCharged {
            vault,
            treasury,
            assets: outcome.assets_withdrawn,
            fee: outcome.fee,
            timestamp,
        });
    }
    if outcome.activated {
        emit!(ActiveProviderUpdated {
            vault,
            provider: outcome.to,
            timestamp,
        });
    }
    emit!(RebalanceExecuted {
        vault,
        assets_withdrawn: outcome.assets_withdrawn,
        assets_deposited: outcome.assets_deposited,
        from: outcome.from,
        to: outcome.to,
        timestamp,
    });
}
