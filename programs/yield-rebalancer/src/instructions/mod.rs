pub mod collect_profit_fees;
pub mod collector;
pub mod deposit;
pub mod initialize;
pub mod rebalance;
pub mod setup_vault;
pub mod timelock;
pub mod total_assets;
pub mod update_config;
pub mod update_deposit_rate;
pub mod withdraw;

pub use collect_profit_fees::*;
pub use collector::*;
pub use deposit::*;
pub use initialize::*;
pub use rebalance::*;
pub use setup_vault::*;
pub use timelock::*;
pub use total_assets::*;
pub use update_config::*;
pub use update_deposit_rate::*;
pub use withdraw::*;
