use anchor_lang::prelude::*;

use crate::{constants::*, errors::VaultError};

/// Vault-agnostic sweeper that moves idle vault balances to treasury on a cadence
#[account]
pub struct FeeCollector {
    /// Admin that registers vaults and sets their intervals
    pub admin: Pubkey,                    // 32 bytes

    pub entries: Vec<CollectorEntry>,     // 4 + (n * 48) bytes

    pub bump: u8,                         // 1 byte
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct CollectorEntry {
    pub vault: Pubkey,
    /// Seconds between collections
    pub interval: i64,
    /// Timestamp of the last sweep, zero until the first one
    pub last_collection: i64,
}

/// Outcome of a batch sweep
#[derive(Debug, Default, PartialEq)]
pub struct CollectionReport {
    pub collected: Vec<(Pubkey, u64)>,
    pub skipped: Vec<Pubkey>,
}

impl CollectorEntry {
    pub fn is_due(&self, now: i64) -> bool {
        now >= self.last_collection.saturating_add(self.interval)
    }
}

impl FeeCollector {
    pub const SPACE: usize = 8 + 32 + 4 + (MAX_COLLECTOR_VAULTS * 48) + 1 + 32;

    pub fn validate_interval(interval: i64) -> Result<()> {
        require!(
            (MIN_COLLECTION_INTERVAL..=MAX_COLLECTION_INTERVAL).contains(&interval),
            VaultError::InvalidCollectionInterval
        );
        Ok(())
    }

    pub fn entry(&self, vault: &Pubkey) -> Option<&CollectorEntry> {
        self.entries.iter().find(|e| e.vault == *vault)
    }

    fn entry_mut(&mut self, vault: &Pubkey) -> Result<&mut CollectorEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.vault == *vault)
            .ok_or(error!(VaultError::VaultNotRegistered))
    }

    pub fn register_vault(&mut self, vault: Pubkey, interval: i64) -> Result<()> {
        Self::validate_interval(interval)?;
        require!(
            self.entry(&vault).is_none(),
            VaultError::VaultAlreadyRegistered
        );
        require!(
            self.entries.len() < MAX_COLLECTOR_VAULTS,
            VaultError::CollectorFull
        );

        self.entries.push(CollectorEntry {
            vault,
            interval,
            last_collection: 0,
        });
        Ok(())
    }

    pub fn update_interval(&mut self, vault: &Pubkey, interval: i64) -> Result<()> {
        Self::validate_interval(interval)?;
        self.entry_mut(vault)?.interval = interval;
        Ok(())
    }

    pub fn unregister_vault(&mut self, vault: &Pubkey) -> Result<()> {
        let before = self.entries.len();
        self.entries.retain(|e| e.vault != *vault);
        require!(self.entries.len() < before, VaultError::VaultNotRegistered);
        Ok(())
    }

    /// Runs `sweep` for one vault if its interval has elapsed, then stamps the entry
    pub fn collect<F>(&mut self, vault: &Pubkey, now: i64, sweep: F) -> Result<u64>
    where
        F: FnOnce() -> Result<u64>,
    {
        let entry = self.entry_mut(vault)?;
        require!(entry.is_due(now), VaultError::CollectionNotDue);

        let amount = sweep()?;
        entry.last_collection = now;
        Ok(amount)
    }

    /// Sweeps every listed vault; any vault that is unknown, not due or whose
    /// sweep fails is skipped without affecting the others
    pub fn collect_all<F>(&mut self, vaults: &[Pubkey], now: i64, mut sweep: F) -> CollectionReport
    where
        F: FnMut(usize, &Pubkey) -> Result<u64>,
    {
        let mut report = CollectionReport::default();

        for (index, vault) in vaults.iter().enumerate() {
            match self.collect(vault, now, || sweep(index, vault)) {
                Ok(amount) => report.collected.push((*vault, amount)),
                Err(err) => {
                    msg!("Skipping fee collection for {}: {}", vault, err);
                    report.skipped.push(*vault);
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 24 * 60 * 60;

    fn collector() -> FeeCollector {
        FeeCollector {
            admin: Pubkey::new_unique(),
            entries: Vec::new(),
            bump: 0,
        }
    }

    #[test]
    fn test_register_validates_interval() {
        let mut fees = collector();
        let vault = Pubkey::new_unique();

        assert!(fees.register_vault(vault, DAY - 1).is_err());
        assert!(fees.register_vault(vault, 30 * DAY + 1).is_err());
        fees.register_vault(vault, DAY).unwrap();
        assert!(fees.register_vault(vault, DAY).is_err(), "Duplicate registration");
        assert_eq!(fees.entry(&vault).unwrap().last_collection, 0);
    }

    #[test]
    fn test_collect_respects_interval() {
        let mut fees = collector();
        let vault = Pubkey::new_unique();
        fees.register_vault(vault, 7 * DAY).unwrap();

        let start = 1_700_000_000;
        assert_eq!(fees.collect(&vault, start, || Ok(42)).unwrap(), 42);
        assert_eq!(fees.entry(&vault).unwrap().last_collection, start);

        assert!(fees.collect(&vault, start + 7 * DAY - 1, || Ok(1)).is_err());
        assert_eq!(fees.collect(&vault, start + 7 * DAY, || Ok(1)).unwrap(), 1);
    }

    #[test]
    fn test_failed_sweep_leaves_entry_due() {
        let mut fees = collector();
        let vault = Pubkey::new_unique();
        fees.register_vault(vault, DAY).unwrap();

        assert!(fees
            .collect(&vault, 10 * DAY, || err!(VaultError::InvalidMint))
            .is_err());
        assert_eq!(fees.entry(&vault).unwrap().last_collection, 0);
    }

    #[test]
    fn test_collect_all_skips_failures() {
        let mut fees = collector();
        let (ok, failing, not_due, unknown) = (
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        );
        fees.register_vault(ok, DAY).unwrap();
        fees.register_vault(failing, DAY).unwrap();
        fees.register_vault(not_due, DAY).unwrap();
        fees.collect(&not_due, 10 * DAY, || Ok(0)).unwrap();

        let report = fees.collect_all(&[ok, failing, not_due, unknown], 10 * DAY, |index, _| {
            if index == 1 {
                err!(VaultError::InvalidOwner)
            } else {
                Ok(100)
            }
        });

        assert_eq!(report.collected, vec![(ok, 100)]);
        assert_eq!(report.skipped, vec![failing, not_due, unknown]);
    }

    #[test]
    fn test_update_and_unregister() {
        let mut fees = collector();
        let vault = Pubkey::new_unique();
        assert!(fees.update_interval(&vault, DAY).is_err());

        fees.register_vault(vault, DAY).unwrap();
        fees.update_interval(&vault, 2 * DAY).unwrap();
        assert_eq!(fees.entry(&vault).unwrap().interval, 2 * DAY);
        assert!(fees.update_interval(&vault, 0).is_err());

        fees.unregister_vault(&vault).unwrap();
        assert!(fees.entry(&vault).is_none());
        assert!(fees.unregister_vault(&vault).is_err());
    }

    #[test]
    fn test_capacity() {
        let mut fees = collector();
        for _ in 0..MAX_COLLECTOR_VAULTS {
            fees.register_vault(Pubkey::new_unique(), DAY).unwrap();
        }
        assert!(fees.register_vault(Pubkey::new_unique(), DAY).is_err());
    }
}
