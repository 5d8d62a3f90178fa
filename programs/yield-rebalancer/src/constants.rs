// Constants for the Yield Rebalancer program

/// Seed for vault state PDA
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for share mint PDA
pub const SHARE_MINT_SEED: &[u8] = b"shares";

/// Seed for vault authority PDA (owns the vault token accounts and provider reserves)
pub const VAULT_AUTHORITY_SEED: &[u8] = b"vault_authority";

/// Seed for the per-vault provider registry PDA
pub const PROVIDER_REGISTRY_SEED: &[u8] = b"provider_registry";

/// Seed for the per-vault timelock PDA
pub const TIMELOCK_SEED: &[u8] = b"timelock";

/// Seed for the global fee collector PDA
pub const FEE_COLLECTOR_SEED: &[u8] = b"fee_collector";

/// Fixed-point scale for withdraw and rebalance fee percentages (1e18 = 100%)
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Scale for the profit fee percentage (10_000 = 100%)
pub const BASIS_POINTS: u128 = 10_000;

/// Withdraw fee ceiling: 5%
pub const MAX_WITHDRAW_FEE_PERCENT: u64 = 50_000_000_000_000_000;

/// Rebalance fee ceiling relative to the moved amount: 20%
pub const MAX_REBALANCE_FEE_PERCENT: u128 = 200_000_000_000_000_000;

/// Profit fee ceiling: 50%
pub const MAX_PROFIT_FEE_PERCENT: u16 = 5_000;

/// Virtual shares added to the share supply in every conversion
pub const VIRTUAL_SHARES: u128 = 1;

/// Virtual assets added to the asset total in every conversion
pub const VIRTUAL_ASSETS: u128 = 1;

/// Maximum providers a vault can register
pub const MAX_PROVIDERS: usize = 10;

/// Maximum length of a provider identifier
pub const MAX_IDENTIFIER_LEN: usize = 32;

/// Timelock delay bounds and the window after eta in which an action stays executable
pub const MIN_TIMELOCK_DELAY: i64 = 2 * 24 * 60 * 60;
pub const MAX_TIMELOCK_DELAY: i64 = 30 * 24 * 60 * 60;
pub const TIMELOCK_GRACE_PERIOD: i64 = 14 * 24 * 60 * 60;

/// Maximum actions waiting in a vault's timelock queue
pub const MAX_QUEUED_ACTIONS: usize = 8;

/// Fee collector interval bounds
pub const MIN_COLLECTION_INTERVAL: i64 = 24 * 60 * 60;
pub const MAX_COLLECTION_INTERVAL: i64 = 30 * 24 * 60 * 60;

/// Maximum vaults tracked by the fee collector
pub const MAX_COLLECTOR_VAULTS: usize = 16;

/// Remaining accounts consumed per vault by `collect_all_fees`:
/// vault_state, vault_authority, vault_token_account, treasury_token_account
pub const COLLECT_ACCOUNTS_PER_VAULT: usize = 4;
