use anchor_lang::prelude::*;

use crate::{
    access::Role,
    constants::*,
    errors::*,
    events::*,
    providers::ReserveRules,
    state::*,
};

/// Delay-gated reconfiguration: provider set and treasury
///
/// Remaining accounts (execute of `AddProvider` / `RemoveProvider` only): the
/// provider reserve. An added reserve must be a vault-owned account of the asset;
/// a removed one must not still hold vault funds.
#[derive(Accounts)]
pub struct TimelockGate<'info> {
    /// Timelock authority recorded in vault state
    pub timelock_authority: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Box<Account<'info, VaultState>>,

    #[account(
        mut,
        seeds = [PROVIDER_REGISTRY_SEED, vault_state.key().as_ref()],
        bump = provider_registry.bump,
    )]
    pub provider_registry: Box<Account<'info, ProviderRegistry>>,

    #[account(
        mut,
        seeds = [TIMELOCK_SEED, vault_state.key().as_ref()],
        bump = timelock.bump,
    )]
    pub timelock: Box<Account<'info, Timelock>>,
}

impl<'info> TimelockGate<'info> {
    fn authorize(&self) -> Result<()> {
        self.vault_state
            .require_role(&self.timelock_authority.key(), Role::Timelock)
    }
}

pub fn queue_handler(ctx: Context<TimelockGate>, action: TimelockAction, delay: i64) -> Result<()> {
    ctx.accounts.authorize()?;
    let now = Clock::get()?.unix_timestamp;

    let queued = ctx.accounts.timelock.queue_action(action, delay, now)?;

    emit!(TimelockActionQueued {
        vault: ctx.accounts.vault_state.key(),
        id: queued.id,
        eta: queued.eta,
        timestamp: now,
    });
    Ok(())
}

pub fn execute_handler<'info>(ctx: Context<'_, '_, 'info, 'info, TimelockGate<'info>>, id: u64) -> Result<()> {
    ctx.accounts.authorize()?;
    let now = Clock::get()?.unix_timestamp;
    let vault_key = ctx.accounts.vault_state.key();

    let queued = match ctx.accounts.timelock.release(id, now)? {
        Release::Ready(queued) => queued,
        Release::Expired(queued) => {
            // Dropped from the queue; it has to be queued again
            emit!(TimelockActionExpired {
                vault: vault_key,
                id: queued.id,
                eta: queued.eta,
                timestamp: now,
            });
            return Ok(());
        }
    };

    let rules = ReserveRules {
        asset_mint: ctx.accounts.vault_state.asset_mint,
        vault_authority: ctx.accounts.vault_state.vault_authority()?,
    };

    match queued.action {
        TimelockAction::AddProvider { identifier, market } => {
            let reserve = ctx
                .remaining_accounts
                .first()
                .ok_or(error!(VaultError::MissingProviderAccounts))?;
            rules.check_account(&market, reserve)?;

            ctx.accounts
                .provider_registry
                .add_provider(ProviderConfig { identifier, market })?;
            emit_providers(vault_key, &ctx.accounts.provider_registry, now);
        }
        TimelockAction::RemoveProvider { market } => {
            require!(
                ctx.accounts.vault_state.active_provider != market,
                VaultError::ActiveProviderRemoval
            );
            require!(
                ctx.accounts.provider_registry.contains(&market),
                VaultError::ProviderNotFound
            );

            let reserve = ctx
                .remaining_accounts
                .first()
                .ok_or(error!(VaultError::MissingProviderAccounts))?;
            require_keys_eq!(*reserve.key, market, VaultError::ProviderAccountMismatch);
            require!(
                !rules.account_holds_funds(reserve),
                VaultError::ProviderNotEmpty
            );

            ctx.accounts.provider_registry.remove_provider(&market)?;
            emit_providers(vault_key, &ctx.accounts.provider_registry, now);
        }
        TimelockAction::SetTreasury { treasury } => {
            ctx.accounts.vault_state.set_treasury(treasury)?;
            emit!(TreasuryUpdated {
                vault: vault_key,
                treasury,
                timestamp: now,
            });
        }
    }

    emit!(TimelockActionExecuted {
        vault: vault_key,
        id,
        timestamp: now,
    });
    Ok(())
}

pub fn cancel_handler(ctx: Context<TimelockGate>, id: u64) -> Result<()> {
    ctx.accounts.authorize()?;
    let cancelled = ctx.accounts.timelock.cancel(id)?;

    emit!(TimelockActionCancelled {
        vault: ctx.accounts.vault_state.key(),
        id: cancelled.id,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

fn emit_providers(vault: Pubkey, registry: &ProviderRegistry, timestamp: i64) {
    emit!(ProvidersUpdated {
        vault,
        providers: registry.markets(),
        timestamp,
    });
}
