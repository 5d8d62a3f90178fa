use anchor_lang::prelude::*;

/// Event emitted when a new vault is initialized
#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub authority: Pubkey,
    pub asset_mint: Pubkey,
    pub share_mint: Pubkey,
    pub profit_fees: bool,
    pub timestamp: i64,
}

/// Event emitted once the seed deposit has been made
#[event]
pub struct SetupCompleted {
    pub vault: Pubkey,
    pub assets: u64,
    pub shares: u64,
    pub timestamp: i64,
}

/// Event emitted when assets are deposited
#[event]
pub struct Deposited {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub asset_amount: u64,
    pub shares_minted: u64,
    pub total_assets: u64,
    pub total_shares: u64,
    pub timestamp: i64,
}

/// Event emitted when assets leave the vault through withdraw or redeem
#[event]
pub struct Withdrawn {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub asset_amount: u64,
    pub shares_burned: u64,
    pub withdraw_fee: u64,
    pub total_shares: u64,
    pub timestamp: i64,
}

#[event]
pub struct RebalanceExecuted {
    pub vault: Pubkey,
    pub assets_withdrawn: u64,
    pub assets_deposited: u64,
    pub from: Pubkey,
    pub to: Pubkey,
    pub timestamp: i64,
}

/// Event emitted whenever an asset fee is paid to the treasury
#[event]
pub struct FeeCharged {
    pub vault: Pubkey,
    pub treasury: Pubkey,
    pub assets: u64,
    pub fee: u64,
    pub timestamp: i64,
}

#[event]
pub struct ProfitFeeCharged {
    pub vault: Pubkey,
    pub profit: u64,
    pub fee: u64,
    pub shares_burned: u64,
    pub last_total_assets: u64,
    pub timestamp: i64,
}

#[event]
pub struct ProvidersUpdated {
    pub vault: Pubkey,
    pub providers: Vec<Pubkey>,
    pub timestamp: i64,
}

#[event]
pub struct ActiveProviderUpdated {
    pub vault: Pubkey,
    pub provider: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct TreasuryUpdated {
    pub vault: Pubkey,
    pub treasury: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct WithdrawFeePercentUpdated {
    pub vault: Pubkey,
    pub withdraw_fee_percent: u64,
    pub timestamp: i64,
}

#[event]
pub struct ProfitFeePercentUpdated {
    pub vault: Pubkey,
    pub profit_fee_percent: u16,
    pub timestamp: i64,
}

#[event]
pub struct MinAmountUpdated {
    pub vault: Pubkey,
    pub min_amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct DepositRateUpdated {
    pub vault: Pubkey,
    pub market: Pubkey,
    pub deposit_rate: u64,
    pub timestamp: i64,
}

#[event]
pub struct TimelockActionQueued {
    pub vault: Pubkey,
    pub id: u64,
    pub eta: i64,
    pub timestamp: i64,
}

#[event]
pub struct TimelockActionExecuted {
    pub vault: Pubkey,
    pub id: u64,
    pub timestamp: i64,
}

#[event]
pub struct TimelockActionCancelled {
    pub vault: Pubkey,
    pub id: u64,
    pub timestamp: i64,
}

/// Event emitted when an action is dropped because its grace period ran out
#[event]
pub struct TimelockActionExpired {
    pub vault: Pubkey,
    pub id: u64,
    pub eta: i64,
    pub timestamp: i64,
}

#[event]
pub struct VaultRegistered {
    pub vault: Pubkey,
    pub interval: i64,
    pub timestamp: i64,
}

#[event]
pub struct CollectionIntervalUpdated {
    pub vault: Pubkey,
    pub interval: i64,
    pub timestamp: i64,
}

#[event]
pub struct VaultUnregistered {
    pub vault: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when the collector sweeps a vault's idle balance
#[event]
pub struct FeesCollected {
    pub vault: Pubkey,
    pub treasury: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}
