use anchor_lang::prelude::*;

use crate::{access::Role, constants::*, events::*, state::*};

/// Admin-only fee and minimum amount updates, always within hard bounds
#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Account<'info, VaultState>,
}

impl<'info> UpdateConfig<'info> {
    fn authorize(&self) -> Result<()> {
        self.vault_state
            .require_role(&self.authority.key(), Role::Admin)
    }
}

pub fn set_withdraw_fee_percent(ctx: Context<UpdateConfig>, withdraw_fee_percent: u64) -> Result<()> {
    ctx.accounts.authorize()?;
    ctx.accounts
        .vault_state
        .set_withdraw_fee_percent(withdraw_fee_percent)?;

    emit!(WithdrawFeePercentUpdated {
        vault: ctx.accounts.vault_state.key(),
        withdraw_fee_percent,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn set_profit_fee_percent(ctx: Context<UpdateConfig>, profit_fee_percent: u16) -> Result<()> {
    ctx.accounts.authorize()?;
    ctx.accounts
        .vault_state
        .set_profit_fee_percent(profit_fee_percent)?;

    emit!(ProfitFeePercentUpdated {
        vault: ctx.accounts.vault_state.key(),
        profit_fee_percent,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn set_min_amount(ctx: Context<UpdateConfig>, min_amount: u64) -> Result<()> {
    ctx.accounts.authorize()?;
    ctx.accounts.vault_state.set_min_amount(min_amount)?;

    emit!(MinAmountUpdated {
        vault: ctx.accounts.vault_state.key(),
        min_amount,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}
