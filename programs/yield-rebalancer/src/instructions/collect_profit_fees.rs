use anchor_lang::prelude::*;

use crate::{
    engine::{self, ProfitFeeOutcome},
    errors::*,
    events::*,
    instructions::rebalance::{with_vault_funds, VaultFunds},
};

/// Permissionless: keepers may trigger collection at any time
pub fn handler<'info>(ctx: Context<'_, '_, 'info, 'info, VaultFunds<'info>>) -> Result<()> {
    require!(
        ctx.accounts.vault_state.profit_fees_enabled(),
        VaultError::ProfitFeesDisabled
    );
    let vault_key = ctx.accounts.vault_state.key();
    let treasury = ctx.accounts.vault_state.treasury;

    let outcome = with_vault_funds(ctx, |vault, providers, custody| {
        engine::collect_profit_fees(vault, providers, custody)
    })?;

    if let Some(profit_fee) = outcome {
        emit_profit_fee(vault_key, treasury, &profit_fee, Clock::get()?.unix_timestamp);
    }
    Ok(())
}

pub(crate) fn emit_profit_fee(vault: Pubkey, treasury: Pubkey, outcome: &ProfitFeeOutcome, timestamp: i64) {
    emit!(ProfitFeeCharged {
        vault,
        profit: outcome.profit,
        fee: outcome.fee,
        shares_burned: outcome.shares_burned,
        last_total_assets: outcome.last_total_assets,
        timestamp,
    });
    emit!(FeeCharged {
        vault,
        treasury,
        assets: outcome.profit,
        fee: outcome.fee,
        timestamp,
    });
}
