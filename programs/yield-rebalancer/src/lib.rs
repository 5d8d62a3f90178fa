// Yield Rebalancer - share-accounted vault that routes one asset across
// multiple yield providers
// Architecture: pure accounting engine behind provider and custody traits,
// Anchor instructions as the outer shell

use anchor_lang::prelude::*;

pub mod access;
pub mod constants;
pub mod custody;
pub mod engine;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod math;
pub mod providers;
pub mod state;

use engine::RebalanceAmount;
use instructions::*;
use state::TimelockAction;

declare_id!("2qA4dTeD9xWY2hqrXVcCMW5vbyB65fgajGVT8PgaCNZ9");

#[program]
pub mod yield_rebalancer {
    use super::*;

    /// Create a vault for an asset mint with its share mint, provider
    /// registry and timelock
    ///
    /// Security considerations:
    /// - Fee percentages are bounded before any state is written
    /// - At least one provider is required and becomes the active one
    /// - Each provider market must be a vault-owned reserve of the asset,
    ///   passed in remaining accounts
    pub fn initialize<'info>(
        ctx: Context<'_, '_, 'info, 'info, Initialize<'info>>,
        params: InitializeParams,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, params)
    }

    /// Seed the vault with its first deposit, minting the shares to the vault
    ///
    /// Admin only, callable once. Deposits are rejected until this runs.
    pub fn setup_vault<'info>(
        ctx: Context<'_, '_, 'info, 'info, SetupVault<'info>>,
        assets: u64,
    ) -> Result<()> {
        instructions::setup_vault::handler(ctx, assets)
    }

    /// Deposit assets into the active provider and receive shares
    ///
    /// Remaining accounts: one reserve account per registered provider,
    /// in registry order.
    pub fn deposit<'info>(
        ctx: Context<'_, '_, 'info, 'info, Deposit<'info>>,
        amount: u64,
    ) -> Result<()> {
        instructions::deposit::handler(ctx, amount)
    }

    /// Withdraw an exact amount of assets, burning the shares it costs
    pub fn withdraw<'info>(
        ctx: Context<'_, '_, 'info, 'info, Withdraw<'info>>,
        assets: u64,
    ) -> Result<()> {
        instructions::withdraw::withdraw_handler(ctx, assets)
    }

    /// Burn an exact amount of shares for the assets they are worth
    pub fn redeem<'info>(
        ctx: Context<'_, '_, 'info, 'info, Withdraw<'info>>,
        shares: u64,
    ) -> Result<()> {
        instructions::withdraw::redeem_handler(ctx, shares)
    }

    /// Move assets between two registered providers
    ///
    /// Security considerations:
    /// - Operator only
    /// - Rebalance fee is capped relative to the moved amount
    /// - Profit fees are settled before funds move
    pub fn rebalance<'info>(
        ctx: Context<'_, '_, 'info, 'info, VaultFunds<'info>>,
        amount: RebalanceAmount,
        from: Pubkey,
        to: Pubkey,
        fee: u64,
        activate_to_provider: bool,
    ) -> Result<()> {
        instructions::rebalance::handler(ctx, amount, from, to, fee, activate_to_provider)
    }

    /// Run several rebalances atomically; every entry is validated before
    /// any funds move
    pub fn rebalance_batch<'info>(
        ctx: Context<'_, '_, 'info, 'info, VaultFunds<'info>>,
        amounts: Vec<u64>,
        from: Vec<Pubkey>,
        to: Vec<Pubkey>,
        fees: Vec<u64>,
        activate_to_provider: bool,
    ) -> Result<()> {
        instructions::rebalance::batch_handler(ctx, amounts, from, to, fees, activate_to_provider)
    }

    /// Charge the profit fee on growth since the last checkpoint
    pub fn collect_profit_fees<'info>(
        ctx: Context<'_, '_, 'info, 'info, VaultFunds<'info>>,
    ) -> Result<()> {
        instructions::collect_profit_fees::handler(ctx)
    }

    /// Sum of the vault's balances across every registered provider
    pub fn total_assets<'info>(ctx: Context<'_, '_, 'info, 'info, ViewVault<'info>>) -> Result<u64> {
        instructions::total_assets::handler(ctx)
    }

    pub fn set_withdraw_fee_percent(
        ctx: Context<UpdateConfig>,
        withdraw_fee_percent: u64,
    ) -> Result<()> {
        instructions::update_config::set_withdraw_fee_percent(ctx, withdraw_fee_percent)
    }

    pub fn set_profit_fee_percent(
        ctx: Context<UpdateConfig>,
        profit_fee_percent: u16,
    ) -> Result<()> {
        instructions::update_config::set_profit_fee_percent(ctx, profit_fee_percent)
    }

    pub fn set_min_amount(ctx: Context<UpdateConfig>, min_amount: u64) -> Result<()> {
        instructions::update_config::set_min_amount(ctx, min_amount)
    }

    /// Record a provider's informational deposit rate (operator only)
    pub fn update_deposit_rate(
        ctx: Context<UpdateDepositRate>,
        market: Pubkey,
        deposit_rate: u64,
    ) -> Result<()> {
        instructions::update_deposit_rate::handler(ctx, market, deposit_rate)
    }

    /// Queue a provider or treasury change behind the timelock delay
    pub fn queue_timelock_action(
        ctx: Context<TimelockGate>,
        action: TimelockAction,
        delay: i64,
    ) -> Result<()> {
        instructions::timelock::queue_handler(ctx, action, delay)
    }

    /// Apply a queued action once its delay has elapsed
    ///
    /// Removing a provider requires its reserve account as the first
    /// remaining account.
    pub fn execute_timelock_action<'info>(
        ctx: Context<'_, '_, 'info, 'info, TimelockGate<'info>>,
        id: u64,
    ) -> Result<()> {
        instructions::timelock::execute_handler(ctx, id)
    }

    pub fn cancel_timelock_action(ctx: Context<TimelockGate>, id: u64) -> Result<()> {
        instructions::timelock::cancel_handler(ctx, id)
    }

    /// Create the shared fee collector
    pub fn initialize_collector(ctx: Context<InitializeCollector>) -> Result<()> {
        instructions::collector::initialize_handler(ctx)
    }

    pub fn register_vault(ctx: Context<ManageCollector>, interval: i64) -> Result<()> {
        instructions::collector::register_handler(ctx, interval)
    }

    pub fn update_collection_interval(ctx: Context<ManageCollector>, interval: i64) -> Result<()> {
        instructions::collector::update_interval_handler(ctx, interval)
    }

    pub fn unregister_vault(ctx: Context<ManageCollector>) -> Result<()> {
        instructions::collector::unregister_handler(ctx)
    }

    /// Sweep one vault's retained fees to its treasury once its interval elapses
    pub fn collect_fees(ctx: Context<CollectFees>) -> Result<()> {
        instructions::collector::collect_handler(ctx)
    }

    /// Sweep every due vault passed in remaining accounts; vaults that
    /// fail validation are skipped
    pub fn collect_all_fees<'info>(
        ctx: Context<'_, '_, 'info, 'info, CollectAllFees<'info>>,
    ) -> Result<()> {
        instructions::collector::collect_all_handler(ctx)
    }
}
