//! Share accounting, rebalancing and fee collection.
//!
//! Everything here operates on `VaultState` plus the `ProviderAdapter` and
//! `VaultCustody` seams and never reads the clock, so instruction handlers
//! own timestamps and event emission.

pub mod accounting;
pub mod fees;
pub mod rebalance;

pub use accounting::*;
pub use fees::*;
pub use rebalance::*;
