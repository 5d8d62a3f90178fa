//! Provider adapters: one uniform interface per external yield source.

use anchor_lang::prelude::*;

use crate::errors::VaultError;

pub mod token_reserve;

pub use token_reserve::*;

/// Uniform interface each yield source implements
///
/// An adapter is bound to a single vault; the vault's position lives in the
/// external market keyed by the vault authority.
pub trait ProviderAdapter {
    /// Stable name used for registry lookups
    fn identifier(&self) -> &str;

    /// Market account identifying this provider within the vault
    fn market(&self) -> Pubkey;

    /// Moves `amount` of the vault's idle assets into the yield source.
    /// Must either deposit the full amount or fail.
    fn deposit(&mut self, amount: u64) -> Result<()>;

    /// Returns `amount` from the yield source to the vault's idle balance
    fn withdraw(&mut self, amount: u64) -> Result<()>;

    /// Current value of the vault's position, in base asset units
    fn deposit_balance(&self) -> Result<u64>;

    /// Informational yield rate; never used for accounting
    fn deposit_rate(&self) -> Result<u64>;
}

/// Position of `market` in the vault's provider list
pub fn provider_index<P: ProviderAdapter>(providers: &[P], market: &Pubkey) -> Result<usize> {
    providers
        .iter()
        .position(|p| p.market() == *market)
        .ok_or(error!(VaultError::InvalidProvider))
}
