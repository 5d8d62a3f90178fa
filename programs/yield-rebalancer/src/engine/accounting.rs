use anchor_lang::prelude::*;

use crate::{
    custody::{ShareHolder, VaultCustody},
    errors::VaultError,
    math::Rounding,
    providers::{provider_index, ProviderAdapter},
    state::VaultState,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepositOutcome {
    pub assets: u64,
    pub shares: u64,
    /// Provider total after the deposit
    pub total_assets: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WithdrawOutcome {
    /// Gross assets taken out of the active provider
    pub assets: u64,
    pub shares: u64,
    /// Part of `assets` retained in the vault's idle balance
    pub fee: u64,
}

/// Sum of the vault's deposit balance across all registered providers
pub fn total_assets<P: ProviderAdapter>(providers: &[P]) -> Result<u64> {
    providers.iter().try_fold(0u64, |total, provider| {
        total
            .checked_add(provider.deposit_balance()?)
            .ok_or(error!(VaultError::MathOverflow))
    })
}

pub fn preview_deposit<P: ProviderAdapter>(vault: &VaultState, providers: &[P], assets: u64) -> Result<u64> {
    vault.convert_to_shares(assets, total_assets(providers)?, Rounding::Floor)
}

pub fn preview_withdraw<P: ProviderAdapter>(vault: &VaultState, providers: &[P], assets: u64) -> Result<u64> {
    vault.convert_to_shares(assets, total_assets(providers)?, Rounding::Ceil)
}

pub fn preview_redeem<P: ProviderAdapter>(vault: &VaultState, providers: &[P], shares: u64) -> Result<u64> {
    vault.convert_to_assets(shares, total_assets(providers)?, Rounding::Floor)
}

/// Gross assets `owner_shares` can withdraw, before the withdraw fee
pub fn max_withdraw<P: ProviderAdapter>(vault: &VaultState, providers: &[P], owner_shares: u64) -> Result<u64> {
    preview_redeem(vault, providers, owner_shares)
}

/// Seed deposit: must meet `min_amount`, runs once, and mints to the vault itself
///
/// Assets already sitting in the providers are folded into the seed at 1:1,
/// so a donation before setup cannot move the opening share price.
pub fn setup<P, C>(
    vault: &mut VaultState,
    providers: &mut [P],
    custody: &mut C,
    assets: u64,
) -> Result<DepositOutcome>
where
    P: ProviderAdapter,
    C: VaultCustody,
{
    // CHECKS
    require!(!vault.setup_complete, VaultError::AlreadySetup);
    require!(assets >= vault.min_amount, VaultError::BelowMinAmount);
    require!(vault.total_shares == 0, VaultError::InvariantViolation);

    let total_before = total_assets(providers)?;
    let shares = checked_add(total_before, assets)?;
    require!(shares > 0, VaultError::ZeroShares);

    // INTERACTIONS: stage and commit into the active provider
    staged_deposit(vault, providers, custody, assets)?;
    custody.mint_shares(ShareHolder::Vault, shares)?;

    // EFFECTS
    let total_after = checked_add(total_before, assets)?;
    vault.total_shares = shares;
    vault.vault_owned_shares = shares;
    vault.last_total_assets = total_after;
    vault.setup_complete = true;

    Ok(DepositOutcome {
        assets,
        shares,
        total_assets: total_after,
    })
}

/// Deposit `assets` for the depositor, minting shares rounded down
pub fn deposit<P, C>(
    vault: &mut VaultState,
    providers: &mut [P],
    custody: &mut C,
    assets: u64,
) -> Result<DepositOutcome>
where
    P: ProviderAdapter,
    C: VaultCustody,
{
    require!(vault.setup_complete, VaultError::VaultNotSetup);
    require!(assets > 0, VaultError::ZeroAmount);

    let total_before = total_assets(providers)?;
    let shares = vault.convert_to_shares(assets, total_before, Rounding::Floor)?;
    require!(shares > 0, VaultError::ZeroShares);

    staged_deposit(vault, providers, custody, assets)?;
    custody.mint_shares(ShareHolder::Depositor, shares)?;

    // Deposits move the profit checkpoint with them; only yield counts as profit
    vault.total_shares = checked_add(vault.total_shares, shares)?;
    vault.last_total_assets = checked_add(vault.last_total_assets, assets)?;

    Ok(DepositOutcome {
        assets,
        shares,
        total_assets: checked_add(total_before, assets)?,
    })
}

/// Withdraw `assets` gross, burning shares rounded up
pub fn withdraw<P, C>(
    vault: &mut VaultState,
    providers: &mut [P],
    custody: &mut C,
    assets: u64,
    owner_shares: u64,
) -> Result<WithdrawOutcome>
where
    P: ProviderAdapter,
    C: VaultCustody,
{
    require!(vault.setup_complete, VaultError::VaultNotSetup);
    require!(assets > 0, VaultError::ZeroAmount);

    let shares = preview_withdraw(vault, providers, assets)?;
    require!(shares <= owner_shares, VaultError::InsufficientShares);

    exit(vault, providers, custody, assets, shares)
}

/// Redeem `shares` for assets rounded down
pub fn redeem<P, C>(
    vault: &mut VaultState,
    providers: &mut [P],
    custody: &mut C,
    shares: u64,
    owner_shares: u64,
) -> Result<WithdrawOutcome>
where
    P: ProviderAdapter,
    C: VaultCustody,
{
    require!(vault.setup_complete, VaultError::VaultNotSetup);
    require!(shares > 0, VaultError::ZeroShares);
    require!(shares <= owner_shares, VaultError::InsufficientShares);

    let assets = preview_redeem(vault, providers, shares)?;
    require!(assets > 0, VaultError::ZeroAmount);

    exit(vault, providers, custody, assets, shares)
}

/// Pull the depositor's assets in, then commit them to the active provider.
/// If the provider refuses, the staged assets go back before the error propagates.
fn staged_deposit<P, C>(
    vault: &VaultState,
    providers: &mut [P],
    custody: &mut C,
    assets: u64,
) -> Result<()>
where
    P: ProviderAdapter,
    C: VaultCustody,
{
    let active = provider_index(providers, &vault.active_provider)?;

    custody.pull_from_depositor(assets)?;
    if let Err(err) = providers[active].deposit(assets) {
        custody.push_to_depositor(assets)?;
        return Err(err);
    }
    Ok(())
}

fn exit<P, C>(
    vault: &mut VaultState,
    providers: &mut [P],
    custody: &mut C,
    assets: u64,
    shares: u64,
) -> Result<WithdrawOutcome>
where
    P: ProviderAdapter,
    C: VaultCustody,
{
    let fee = vault.withdraw_fee(assets)?;
    let active = provider_index(providers, &vault.active_provider)?;
    require!(
        providers[active].deposit_balance()? >= assets,
        VaultError::InsufficientProviderBalance
    );
    let remaining_shares = vault
        .total_shares
        .checked_sub(shares)
        .ok_or(error!(VaultError::InsufficientShares))?;

    // EFFECTS
    vault.total_shares = remaining_shares;
    vault.last_total_assets = vault.last_total_assets.saturating_sub(assets);

    // INTERACTIONS: the fee stays idle in the vault until the collector sweeps it
    custody.burn_shares(ShareHolder::Depositor, shares)?;
    providers[active].withdraw(assets)?;
    custody.push_to_depositor(assets - fee)?;

    Ok(WithdrawOutcome { assets, shares, fee })
}

fn checked_add(a: u64, b: u64) -> Result<u64> {
    a.checked_add(b).ok_or(error!(VaultError::MathOverflow))
}
