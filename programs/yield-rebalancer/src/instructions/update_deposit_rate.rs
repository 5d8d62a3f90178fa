use anchor_lang::prelude::*;

use crate::{access::Role, constants::*, events::*, state::*};

/// Record the informational rate a provider currently pays
#[derive(Accounts)]
pub struct UpdateDepositRate<'info> {
    pub operator: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Account<'info, VaultState>,

    #[account(
        mut,
        seeds = [PROVIDER_REGISTRY_SEED, vault_state.key().as_ref()],
        bump = provider_registry.bump,
    )]
    pub provider_registry: Account<'info, ProviderRegistry>,
}

pub fn handler(ctx: Context<UpdateDepositRate>, market: Pubkey, deposit_rate: u64) -> Result<()> {
    ctx.accounts
        .vault_state
        .require_role(&ctx.accounts.operator.key(), Role::Operator)?;

    ctx.accounts
        .provider_registry
        .set_deposit_rate(&market, deposit_rate)?;

    emit!(DepositRateUpdated {
        vault: ctx.accounts.vault_state.key(),
        market,
        deposit_rate,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
