use anchor_lang::prelude::*;

use super::accounting::total_assets;
use crate::{
    constants::*,
    custody::{ShareHolder, VaultCustody},
    errors::VaultError,
    math::{mul_div_u64, Rounding},
    providers::{provider_index, ProviderAdapter},
    state::VaultState,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProfitFeeOutcome {
    pub profit: u64,
    pub fee: u64,
    pub shares_burned: u64,
    /// New checkpoint (total assets before the fee left)
    pub last_total_assets: u64,
}

/// Largest spread fee allowed when moving `assets`
pub fn max_rebalance_fee(assets: u64) -> Result<u64> {
    mul_div_u64(assets, MAX_REBALANCE_FEE_PERCENT, PRECISION, Rounding::Floor)
}

pub fn validate_rebalance_fee(assets: u64, fee: u64) -> Result<()> {
    require!(fee <= max_rebalance_fee(assets)?, VaultError::RebalanceFeeTooHigh);
    Ok(())
}

/// Profit fee owed on growth from `last_total_assets` to `current_total_assets`
pub fn profit_fee(vault: &VaultState, current_total_assets: u64) -> Result<(u64, u64)> {
    let profit = current_total_assets.saturating_sub(vault.last_total_assets);
    let fee = mul_div_u64(
        profit,
        vault.profit_fee_percent as u128,
        BASIS_POINTS,
        Rounding::Floor,
    )?;
    Ok((profit, fee))
}

/// Fee `collect_profit_fees` would take right now, without moving anything
pub fn pending_profit_fee<P: ProviderAdapter>(vault: &VaultState, providers: &[P]) -> Result<u64> {
    if !vault.profit_fees_enabled() || vault.total_shares == 0 {
        return Ok(0);
    }
    let current = total_assets(providers)?;
    if current <= vault.last_total_assets {
        return Ok(0);
    }
    Ok(profit_fee(vault, current)?.1)
}

/// Skims the profit fee accrued since the last checkpoint
///
/// Profit is measured for the whole vault, not per depositor. The fee is
/// taken in assets from the active provider and paid to the treasury; the
/// matching shares, rounded up, are burned from the vault's own balance.
///
/// Returns `None` when nothing was charged. The checkpoint still moves to the
/// current total in that case, so losses reset the baseline.
pub fn collect_profit_fees<P, C>(
    vault: &mut VaultState,
    providers: &mut [P],
    custody: &mut C,
) -> Result<Option<ProfitFeeOutcome>>
where
    P: ProviderAdapter,
    C: VaultCustody,
{
    if !vault.profit_fees_enabled() || vault.total_shares == 0 {
        return Ok(None);
    }

    let current = total_assets(providers)?;
    if current <= vault.last_total_assets {
        vault.last_total_assets = current;
        return Ok(None);
    }

    let (profit, fee) = profit_fee(vault, current)?;
    if fee == 0 {
        vault.last_total_assets = current;
        return Ok(None);
    }

    let fee_shares = vault.convert_to_shares(fee, current, Rounding::Ceil)?;
    let shares_burned = fee_shares.min(vault.vault_owned_shares);

    let active = provider_index(providers, &vault.active_provider)?;
    require!(
        providers[active].deposit_balance()? >= fee,
        VaultError::InsufficientProviderBalance
    );

    // EFFECTS
    vault.total_shares = vault
        .total_shares
        .checked_sub(shares_burned)
        .ok_or(error!(VaultError::InvariantViolation))?;
    vault.vault_owned_shares = vault
        .vault_owned_shares
        .checked_sub(shares_burned)
        .ok_or(error!(VaultError::InvariantViolation))?;
    vault.last_total_assets = current;

    // INTERACTIONS
    if shares_burned > 0 {
        custody.burn_shares(ShareHolder::Vault, shares_burned)?;
    }
    providers[active].withdraw(fee)?;
    custody.pay_treasury(fee)?;

    Ok(Some(ProfitFeeOutcome {
        profit,
        fee,
        shares_burned,
        last_total_assets: current,
    }))
}
