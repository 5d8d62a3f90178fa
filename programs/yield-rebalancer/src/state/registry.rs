use anchor_lang::prelude::*;

use crate::{constants::*, errors::VaultError};

/// Provider registry for a vault
///
/// Maps each provider's human identifier to the market account holding the
/// vault's position. Order is significant: provider accounts are passed to
/// instructions in registry order.
///
/// Security: only the timelock path can add or remove entries
#[account]
pub struct ProviderRegistry {
    /// Vault this registry belongs to
    pub vault: Pubkey,                   // 32 bytes

    /// Registered providers, in account order
    pub providers: Vec<ProviderEntry>,   // 4 + (n * ~84) bytes

    /// Bump seed for PDA
    pub bump: u8,                        // 1 byte
}

/// Individual provider entry
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct ProviderEntry {
    /// Stable identifier (e.g., "Compound_V3_Provider")
    pub identifier: String,              // 4 + up to 32 bytes

    /// Market account holding the vault's position
    pub market: Pubkey,                  // 32 bytes

    /// Informational deposit rate, as last reported by the operator
    pub deposit_rate: u64,               // 8 bytes
}

/// Identifier and market of a provider at registration time
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct ProviderConfig {
    pub identifier: String,
    pub market: Pubkey,
}

impl ProviderRegistry {
    /// 8 (discriminator) + 32 (vault) + 4 (vec len) + (10 * 84) + 1 (bump) + 64 (padding)
    pub const SPACE: usize = 8 + 32 + 4 + (MAX_PROVIDERS * 84) + 1 + 64;

    pub fn contains(&self, market: &Pubkey) -> bool {
        self.providers.iter().any(|p| p.market == *market)
    }

    pub fn get_provider(&self, market: &Pubkey) -> Option<&ProviderEntry> {
        self.providers.iter().find(|p| p.market == *market)
    }

    pub fn get_provider_mut(&mut self, market: &Pubkey) -> Option<&mut ProviderEntry> {
        self.providers.iter_mut().find(|p| p.market == *market)
    }

    pub fn markets(&self) -> Vec<Pubkey> {
        self.providers.iter().map(|p| p.market).collect()
    }

    pub fn add_provider(&mut self, config: ProviderConfig) -> Result<()> {
        require!(
            config.identifier.len() <= MAX_IDENTIFIER_LEN,
            VaultError::NameTooLong
        );
        require!(config.market != Pubkey::default(), VaultError::ZeroAddress);
        require!(
            !self.contains(&config.market),
            VaultError::ProviderAlreadyExists
        );
        require!(self.providers.len() < MAX_PROVIDERS, VaultError::RegistryFull);

        self.providers.push(ProviderEntry {
            identifier: config.identifier,
            market: config.market,
            deposit_rate: 0,
        });
        Ok(())
    }

    pub fn remove_provider(&mut self, market: &Pubkey) -> Result<ProviderEntry> {
        let index = self
            .providers
            .iter()
            .position(|p| p.market == *market)
            .ok_or(error!(VaultError::ProviderNotFound))?;
        require!(self.providers.len() > 1, VaultError::EmptyProviderSet);
        Ok(self.providers.remove(index))
    }

    pub fn set_deposit_rate(&mut self, market: &Pubkey, deposit_rate: u64) -> Result<()> {
        let provider = self
            .get_provider_mut(market)
            .ok_or(error!(VaultError::ProviderNotFound))?;
        provider.deposit_rate = deposit_rate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(identifier: &str) -> ProviderConfig {
        ProviderConfig {
            identifier: identifier.to_string(),
            market: Pubkey::new_unique(),
        }
    }

    fn empty_registry() -> ProviderRegistry {
        ProviderRegistry {
            vault: Pubkey::new_unique(),
            providers: Vec::new(),
            bump: 0,
        }
    }

    #[test]
    fn test_add_keeps_order_and_rejects_duplicates() {
        let mut registry = empty_registry();
        let first = config("Aave_V3_Provider");
        let second = config("Compound_V3_Provider");

        registry.add_provider(first.clone()).unwrap();
        registry.add_provider(second.clone()).unwrap();
        assert_eq!(registry.markets(), vec![first.market, second.market]);

        assert!(registry.add_provider(first).is_err());
    }

    #[test]
    fn test_registry_capacity() {
        let mut registry = empty_registry();
        for i in 0..MAX_PROVIDERS {
            registry.add_provider(config(&format!("Provider_{i}"))).unwrap();
        }
        assert!(registry.add_provider(config("One_Too_Many")).is_err());
    }

    #[test]
    fn test_identifier_length_limit() {
        let mut registry = empty_registry();
        assert!(registry.add_provider(config(&"x".repeat(33))).is_err());
    }

    #[test]
    fn test_remove_never_empties_registry() {
        let mut registry = empty_registry();
        let only = config("Only_Provider");
        registry.add_provider(only.clone()).unwrap();
        assert!(registry.remove_provider(&only.market).is_err());

        let other = config("Other_Provider");
        registry.add_provider(other.clone()).unwrap();
        registry.remove_provider(&only.market).unwrap();
        assert_eq!(registry.markets(), vec![other.market]);
    }

    #[test]
    fn test_set_deposit_rate() {
        let mut registry = empty_registry();
        let entry = config("Aave_V3_Provider");
        registry.add_provider(entry.clone()).unwrap();

        registry.set_deposit_rate(&entry.market, 420).unwrap();
        assert_eq!(registry.get_provider(&entry.market).unwrap().deposit_rate, 420);
        assert!(registry.set_deposit_rate(&Pubkey::new_unique(), 1).is_err());
    }
}
