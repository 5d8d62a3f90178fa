use anchor_lang::prelude::*;

use super::fees::{collect_profit_fees, pending_profit_fee, validate_rebalance_fee, ProfitFeeOutcome};
use crate::{
    custody::VaultCustody,
    errors::VaultError,
    providers::{provider_index, ProviderAdapter},
    state::VaultState,
};

/// Amount argument of the rebalance instruction
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RebalanceAmount {
    Exact(u64),
    /// The source provider's entire balance for this vault
    Max,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RebalanceRequest {
    pub assets: u64,
    pub from: Pubkey,
    pub to: Pubkey,
    pub fee: u64,
    pub activate_to_provider: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RebalanceOutcome {
    pub assets_withdrawn: u64,
    pub assets_deposited: u64,
    pub from: Pubkey,
    pub to: Pubkey,
    pub fee: u64,
    /// Set when the destination became the active provider
    pub activated: bool,
    pub profit_fee: Option<ProfitFeeOutcome>,
}

/// Parallel arrays of a batch rebalance
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RebalanceBatch {
    pub amounts: Vec<u64>,
    pub from: Vec<Pubkey>,
    pub to: Vec<Pubkey>,
    pub fees: Vec<u64>,
    pub activate_to_provider: bool,
}

impl RebalanceBatch {
    /// Zips the arrays into requests after checking their shape
    pub fn requests(&self) -> Result<Vec<RebalanceRequest>> {
        let len = self.amounts.len();
        require!(
            self.from.len() == len && self.to.len() == len && self.fees.len() == len,
            VaultError::ArrayLengthMismatch
        );
        require!(len > 0, VaultError::EmptyBatch);

        Ok((0..len)
            .map(|i| RebalanceRequest {
                assets: self.amounts[i],
                from: self.from[i],
                to: self.to[i],
                fee: self.fees[i],
                activate_to_provider: self.activate_to_provider,
            })
            .collect())
    }
}

/// Static checks on a request: amount, membership, distinct ends and fee ceiling.
/// Returns the (from, to) provider positions.
fn validate_request<P: ProviderAdapter>(providers: &[P], request: &RebalanceRequest) -> Result<(usize, usize)> {
    require!(request.assets > 0, VaultError::ZeroAmount);
    let from = provider_index(providers, &request.from)?;
    let to = provider_index(providers, &request.to)?;
    require!(from != to, VaultError::SameProvider);
    validate_rebalance_fee(request.assets, request.fee)?;
    Ok((from, to))
}

/// Moves `request.assets` out of `from` and `assets - fee` into `to`, paying `fee` to
/// the treasury. On the profit-fee variant, profit is checkpointed and skimmed first.
pub fn rebalance<P, C>(
    vault: &mut VaultState,
    providers: &mut [P],
    custody: &mut C,
    request: RebalanceRequest,
) -> Result<RebalanceOutcome>
where
    P: ProviderAdapter,
    C: VaultCustody,
{
    // CHECKS
    let (from, to) = validate_request(providers, &request)?;
    require!(
        providers[from].deposit_balance()? >= request.assets,
        VaultError::InsufficientProviderBalance
    );

    let profit_fee = collect_profit_fees(vault, providers, custody)?;
    if profit_fee.is_some() {
        // The fee may have come out of the source provider
        require!(
            providers[from].deposit_balance()? >= request.assets,
            VaultError::InsufficientProviderBalance
        );
    }

    // INTERACTIONS
    let assets_deposited = request.assets - request.fee;
    providers[from].withdraw(request.assets)?;
    if assets_deposited > 0 {
        providers[to].deposit(assets_deposited)?;
    }
    if request.fee > 0 {
        custody.pay_treasury(request.fee)?;
    }

    let activated = request.activate_to_provider && vault.active_provider != request.to;
    if request.activate_to_provider {
        vault.active_provider = request.to;
    }

    Ok(RebalanceOutcome {
        assets_withdrawn: request.assets,
        assets_deposited,
        from: request.from,
        to: request.to,
        fee: request.fee,
        activated,
        profit_fee,
    })
}

/// Rebalance entry point accepting the `Max` sentinel
///
/// `Max` resolves to the source provider's live balance. On the profit-fee
/// variant the profit fee is collected before resolving, so the resolved amount
/// is still fully withdrawable; the inner collection then finds nothing new.
#[allow(clippy::too_many_arguments)]
pub fn rebalance_amount<P, C>(
    vault: &mut VaultState,
    providers: &mut [P],
    custody: &mut C,
    amount: RebalanceAmount,
    from: Pubkey,
    to: Pubkey,
    fee: u64,
    activate_to_provider: bool,
) -> Result<RebalanceOutcome>
where
    P: ProviderAdapter,
    C: VaultCustody,
{
    let (assets, early_profit_fee) = match amount {
        RebalanceAmount::Exact(assets) => (assets, None),
        RebalanceAmount::Max => {
            let profit_fee = collect_profit_fees(vault, providers, custody)?;
            let source = provider_index(providers, &from)?;
            (providers[source].deposit_balance()?, profit_fee)
        }
    };

    let mut outcome = rebalance(
        vault,
        providers,
        custody,
        RebalanceRequest {
            assets,
            from,
            to,
            fee,
            activate_to_provider,
        },
    )?;
    outcome.profit_fee = outcome.profit_fee.or(early_profit_fee);
    Ok(outcome)
}

/// Applies every tuple of `batch` in order, or none of them
///
/// The whole batch is validated before the first provider call: array shape,
/// then each tuple's membership and fee ceiling, then source balances simulated
/// across the sequence. The simulation starts after the profit fee the first
/// tuple will skim from the active provider.
pub fn rebalance_batch<P, C>(
    vault: &mut VaultState,
    providers: &mut [P],
    custody: &mut C,
    batch: &RebalanceBatch,
) -> Result<Vec<RebalanceOutcome>>
where
    P: ProviderAdapter,
    C: VaultCustody,
{
    let requests = batch.requests()?;
    let positions = requests
        .iter()
        .map(|request| validate_request(providers, request))
        .collect::<Result<Vec<_>>>()?;

    let mut balances = providers
        .iter()
        .map(|p| p.deposit_balance())
        .collect::<Result<Vec<u64>>>()?;
    let pending_fee = pending_profit_fee(vault, providers)?;
    if pending_fee > 0 {
        let active = provider_index(providers, &vault.active_provider)?;
        balances[active] = balances[active]
            .checked_sub(pending_fee)
            .ok_or(error!(VaultError::InsufficientProviderBalance))?;
    }
    for (request, (from, to)) in requests.iter().zip(&positions) {
        balances[*from] = balances[*from]
            .checked_sub(request.assets)
            .ok_or(error!(VaultError::InsufficientProviderBalance))?;
        balances[*to] = balances[*to]
            .checked_add(request.assets - request.fee)
            .ok_or(error!(VaultError::MathOverflow))?;
    }

    requests
        .into_iter()
        .map(|request| rebalance(vault, providers, custody, request))
        .collect()
}
