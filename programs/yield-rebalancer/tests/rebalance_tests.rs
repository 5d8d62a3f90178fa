/// Rebalance tests: single moves, the `Max` sentinel and batches
///
/// Coverage:
///  Asset conservation across providers and treasury
///  Rebalance fee ceiling
///  Provider membership checks
///  Batch shape and pre-validation before any funds move
///  Profit fee settlement ahead of a rebalance, single and batched
mod common;

use anchor_lang::prelude::Pubkey;
use common::*;
use yield_rebalancer::{
    engine::{self, RebalanceAmount, RebalanceBatch, RebalanceRequest},
    errors::VaultError,
    state::{VaultState, VaultVariant},
};

fn seeded(variant: VaultVariant) -> (VaultState, Vec<MockProvider>, MockCustody) {
    let mut providers = two_providers();
    let mut vault = vault_state(variant, providers[0].market);
    let mut custody = MockCustody::default();
    engine::setup(&mut vault, &mut providers, &mut custody, 1_000 * USDC).unwrap();
    (vault, providers, custody)
}

fn request(providers: &[MockProvider], assets: u64, fee: u64) -> RebalanceRequest {
    RebalanceRequest {
        assets,
        from: providers[0].market,
        to: providers[1].market,
        fee,
        activate_to_provider: false,
    }
}

fn total_moves(providers: &[MockProvider]) -> u32 {
    providers.iter().map(|p| p.moves).sum()
}

// =============================================================================
// SINGLE REBALANCE
// =============================================================================

#[test]
fn test_rebalance_conserves_assets() {
    let (mut vault, mut providers, mut custody) = seeded(VaultVariant::Standard);
    let req = request(&providers, 400 * USDC, 10 * USDC);

    let outcome = engine::rebalance(&mut vault, &mut providers, &mut custody, req).unwrap();

    assert_eq!(outcome.assets_withdrawn, 400 * USDC);
    assert_eq!(outcome.assets_deposited, 390 * USDC);
    assert_eq!(providers[0].balance, 600 * USDC);
    assert_eq!(providers[1].balance, 390 * USDC);
    assert_eq!(custody.treasury, 10 * USDC);
    assert_eq!(
        engine::total_assets(&providers).unwrap() + custody.treasury,
        1_000 * USDC,
        "Nothing is created or lost by a rebalance"
    );
    assert!(!outcome.activated);
    assert_eq!(vault.active_provider, providers[0].market);
    assert_eq!(vault.total_shares, 1_000 * USDC, "Shares are untouched");
}

#[test]
fn test_rebalance_fee_ceiling_boundary() {
    let (mut vault, mut providers, mut custody) = seeded(VaultVariant::Standard);

    // 20% of 400 is exactly allowed
    let req = request(&providers, 400 * USDC, 80 * USDC + 1);
    assert_vault_error(
        engine::rebalance(&mut vault, &mut providers, &mut custody, req),
        VaultError::RebalanceFeeTooHigh,
    );
    assert_eq!(total_moves(&providers), 1, "Only the seed deposit touched a provider");

    let req = request(&providers, 400 * USDC, 80 * USDC);
    engine::rebalance(&mut vault, &mut providers, &mut custody, req).unwrap();
    assert_eq!(custody.treasury, 80 * USDC);
}

#[test]
fn test_rebalance_rejects_unknown_provider() {
    let (mut vault, mut providers, mut custody) = seeded(VaultVariant::Standard);
    let mut req = request(&providers, 10 * USDC, 0);
    req.to = Pubkey::new_unique();

    assert_vault_error(
        engine::rebalance(&mut vault, &mut providers, &mut custody, req),
        VaultError::InvalidProvider,
    );
}

#[test]
fn test_rebalance_rejects_same_provider() {
    let (mut vault, mut providers, mut custody) = seeded(VaultVariant::Standard);
    let mut req = request(&providers, 10 * USDC, 0);
    req.to = req.from;

    assert_vault_error(
        engine::rebalance(&mut vault, &mut providers, &mut custody, req),
        VaultError::SameProvider,
    );
}

#[test]
fn test_rebalance_rejects_zero_and_excess_amounts() {
    let (mut vault, mut providers, mut custody) = seeded(VaultVariant::Standard);

    let req = request(&providers, 0, 0);
    assert_vault_error(
        engine::rebalance(&mut vault, &mut providers, &mut custody, req),
        VaultError::ZeroAmount,
    );

    let req = request(&providers, 1_000 * USDC + 1, 0);
    assert_vault_error(
        engine::rebalance(&mut vault, &mut providers, &mut custody, req),
        VaultError::InsufficientProviderBalance,
    );
}

#[test]
fn test_rebalance_activates_destination() {
    let (mut vault, mut providers, mut custody) = seeded(VaultVariant::Standard);
    let mut req = request(&providers, 1_000 * USDC, 0);
    req.activate_to_provider = true;

    let outcome = engine::rebalance(&mut vault, &mut providers, &mut custody, req).unwrap();

    assert!(outcome.activated);
    assert_eq!(vault.active_provider, providers[1].market);

    // New deposits now land in the second provider
    engine::deposit(&mut vault, &mut providers, &mut custody, 5 * USDC).unwrap();
    assert_eq!(providers[1].balance, 1_005 * USDC);
    assert_eq!(providers[0].balance, 0);
}

#[test]
fn test_rebalance_max_moves_entire_balance() {
    let (mut vault, mut providers, mut custody) = seeded(VaultVariant::Standard);
    providers[0].accrue(17);
    let (from, to) = (providers[0].market, providers[1].market);

    let outcome = engine::rebalance_amount(
        &mut vault,
        &mut providers,
        &mut custody,
        RebalanceAmount::Max,
        from,
        to,
        0,
        true,
    )
    .unwrap();

    assert_eq!(outcome.assets_withdrawn, 1_000 * USDC + 17);
    assert_eq!(providers[0].balance, 0);
    assert_eq!(providers[1].balance, 1_000 * USDC + 17);
    assert_eq!(vault.active_provider, to);
}

// =============================================================================
// BATCH REBALANCE
// =============================================================================

#[test]
fn test_batch_length_mismatch_touches_nothing() {
    let (mut vault, mut providers, mut custody) = seeded(VaultVariant::Standard);
    let moves_before = total_moves(&providers);
    let batch = RebalanceBatch {
        amounts: vec![10 * USDC, 20 * USDC],
        from: vec![providers[0].market],
        to: vec![providers[1].market, providers[1].market],
        fees: vec![0, 0],
        activate_to_provider: false,
    };

    assert_vault_error(
        engine::rebalance_batch(&mut vault, &mut providers, &mut custody, &batch),
        VaultError::ArrayLengthMismatch,
    );
    assert_eq!(total_moves(&providers), moves_before);
    assert_eq!(custody.treasury, 0);
}

#[test]
fn test_batch_empty_rejected() {
    let (mut vault, mut providers, mut custody) = seeded(VaultVariant::Standard);

    assert_vault_error(
        engine::rebalance_batch(&mut vault, &mut providers, &mut custody, &RebalanceBatch::default()),
        VaultError::EmptyBatch,
    );
}

#[test]
fn test_batch_validates_every_entry_first() {
    let (mut vault, mut providers, mut custody) = seeded(VaultVariant::Standard);
    let moves_before = total_moves(&providers);
    let (a, b) = (providers[0].market, providers[1].market);

    // Second entry's fee is over the ceiling
    let batch = RebalanceBatch {
        amounts: vec![100 * USDC, 100 * USDC],
        from: vec![a, a],
        to: vec![b, b],
        fees: vec![0, 21 * USDC],
        activate_to_provider: false,
    };
    assert_vault_error(
        engine::rebalance_batch(&mut vault, &mut providers, &mut custody, &batch),
        VaultError::RebalanceFeeTooHigh,
    );

    // Together the entries overdraw the source
    let batch = RebalanceBatch {
        amounts: vec![600 * USDC, 600 * USDC],
        from: vec![a, a],
        to: vec![b, b],
        fees: vec![0, 0],
        activate_to_provider: false,
    };
    assert_vault_error(
        engine::rebalance_batch(&mut vault, &mut providers, &mut custody, &batch),
        VaultError::InsufficientProviderBalance,
    );

    assert_eq!(total_moves(&providers), moves_before, "No entry ran");
    assert_eq!(providers[0].balance, 1_000 * USDC);
}

#[test]
fn test_batch_applies_entries_in_order() {
    let (mut vault, mut providers, mut custody) = seeded(VaultVariant::Standard);
    let (a, b) = (providers[0].market, providers[1].market);

    // The second entry spends funds the first one delivered
    let batch = RebalanceBatch {
        amounts: vec![300 * USDC, 250 * USDC],
        from: vec![a, b],
        to: vec![b, a],
        fees: vec![5 * USDC, 0],
        activate_to_provider: false,
    };
    let outcomes = engine::rebalance_batch(&mut vault, &mut providers, &mut custody, &batch).unwrap();

    assert_eq!(outcomes.len(), 2);
    assert_eq!(providers[0].balance, 950 * USDC);
    assert_eq!(providers[1].balance, 45 * USDC);
    assert_eq!(custody.treasury, 5 * USDC);
}

// =============================================================================
// PROFIT FEE VARIANT
// =============================================================================

#[test]
fn test_rebalance_settles_profit_fee_first() {
    let (mut vault, mut providers, mut custody) = seeded(VaultVariant::WithProfitFees);
    vault.set_profit_fee_percent(2_500).unwrap();
    providers[0].accrue(400 * USDC);

    let req = request(&providers, 100 * USDC, 0);
    let outcome = engine::rebalance(&mut vault, &mut providers, &mut custody, req).unwrap();

    let profit_fee = outcome.profit_fee.expect("profit fee charged");
    assert_eq!(profit_fee.profit, 400 * USDC);
    assert_eq!(profit_fee.fee, 100 * USDC);
    assert_eq!(custody.treasury, 100 * USDC);
    assert_eq!(providers[0].balance, 1_200 * USDC);
    assert_eq!(providers[1].balance, 100 * USDC);
    assert_eq!(vault.last_total_assets, 1_400 * USDC);
}

#[test]
fn test_rebalance_max_after_profit_fee() {
    let (mut vault, mut providers, mut custody) = seeded(VaultVariant::WithProfitFees);
    vault.set_profit_fee_percent(2_500).unwrap();
    providers[0].accrue(400 * USDC);
    let (from, to) = (providers[0].market, providers[1].market);

    let outcome = engine::rebalance_amount(
        &mut vault,
        &mut providers,
        &mut custody,
        RebalanceAmount::Max,
        from,
        to,
        0,
        false,
    )
    .unwrap();

    assert!(outcome.profit_fee.is_some());
    assert_eq!(outcome.assets_withdrawn, 1_300 * USDC, "Resolved after the fee left");
    assert_eq!(providers[0].balance, 0);
    assert_eq!(providers[1].balance, 1_300 * USDC);
    assert_eq!(custody.treasury, 100 * USDC);
}

#[test]
fn test_batch_simulation_accounts_for_pending_profit_fee() {
    let (mut vault, mut providers, mut custody) = seeded(VaultVariant::WithProfitFees);
    vault.set_profit_fee_percent(5_000).unwrap();
    providers[0].accrue(400 * USDC);
    let moves_before = total_moves(&providers);
    let (a, b) = (providers[0].market, providers[1].market);

    // 1_400 sits in A, but 200 of it leaves as profit fee before the first move
    let batch = RebalanceBatch {
        amounts: vec![100 * USDC, 1_300 * USDC],
        from: vec![a, a],
        to: vec![b, b],
        fees: vec![0, 0],
        activate_to_provider: false,
    };
    assert_vault_error(
        engine::rebalance_batch(&mut vault, &mut providers, &mut custody, &batch),
        VaultError::InsufficientProviderBalance,
    );
    assert_eq!(total_moves(&providers), moves_before, "Rejected before any entry ran");
    assert_eq!(custody.treasury, 0);
    assert_eq!(providers[0].balance, 1_400 * USDC);
    assert_eq!(vault.last_total_assets, 1_000 * USDC, "Checkpoint untouched");

    let batch = RebalanceBatch {
        amounts: vec![100 * USDC, 1_100 * USDC],
        ..batch
    };
    let outcomes = engine::rebalance_batch(&mut vault, &mut providers, &mut custody, &batch).unwrap();

    assert_eq!(outcomes[0].profit_fee.map(|p| p.fee), Some(200 * USDC));
    assert!(outcomes[1].profit_fee.is_none());
    assert_eq!(providers[0].balance, 0);
    assert_eq!(providers[1].balance, 1_200 * USDC);
    assert_eq!(custody.treasury, 200 * USDC);
}
