use anchor_lang::prelude::*;

use crate::{constants::*, errors::VaultError};

/// Reconfiguration that must wait out the timelock delay
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub enum TimelockAction {
    AddProvider { identifier: String, market: Pubkey },
    RemoveProvider { market: Pubkey },
    SetTreasury { treasury: Pubkey },
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct QueuedAction {
    pub id: u64,
    pub action: TimelockAction,
    /// Earliest execution time
    pub eta: i64,
}

/// Result of releasing a queued action
#[derive(Debug, PartialEq)]
pub enum Release {
    Ready(QueuedAction),
    /// The grace period ran out; the action is dropped and must be queued again
    Expired(QueuedAction),
}

/// Delay-gated queue for sensitive vault reconfiguration
#[account]
pub struct Timelock {
    pub vault: Pubkey,               // 32 bytes
    pub next_id: u64,                // 8 bytes
    pub queue: Vec<QueuedAction>,    // 4 + (n * ~90) bytes
    pub bump: u8,                    // 1 byte
}

impl TimelockAction {
    pub fn validate(&self) -> Result<()> {
        match self {
            TimelockAction::AddProvider { identifier, market } => {
                require!(
                    identifier.len() <= MAX_IDENTIFIER_LEN,
                    VaultError::NameTooLong
                );
                require!(*market != Pubkey::default(), VaultError::ZeroAddress);
            }
            TimelockAction::RemoveProvider { market } => {
                require!(*market != Pubkey::default(), VaultError::ZeroAddress);
            }
            TimelockAction::SetTreasury { treasury } => {
                require!(*treasury != Pubkey::default(), VaultError::ZeroAddress);
            }
        }
        Ok(())
    }
}

impl Timelock {
    pub const SPACE: usize = 8 + 32 + 8 + 4 + (MAX_QUEUED_ACTIONS * 90) + 1 + 32;

    pub fn queue_action(&mut self, action: TimelockAction, delay: i64, now: i64) -> Result<QueuedAction> {
        require!(
            (MIN_TIMELOCK_DELAY..=MAX_TIMELOCK_DELAY).contains(&delay),
            VaultError::TimelockDelayOutOfRange
        );
        require!(
            self.queue.len() < MAX_QUEUED_ACTIONS,
            VaultError::TimelockQueueFull
        );
        action.validate()?;

        let queued = QueuedAction {
            id: self.next_id,
            action,
            eta: now.checked_add(delay).ok_or(error!(VaultError::MathOverflow))?,
        };
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(error!(VaultError::MathOverflow))?;
        self.queue.push(queued.clone());
        Ok(queued)
    }

    /// Removes action `id` from the queue once its eta has passed
    pub fn release(&mut self, id: u64, now: i64) -> Result<Release> {
        let index = self.position(id)?;
        let eta = self.queue[index].eta;
        require!(now >= eta, VaultError::TimelockNotReady);

        let queued = self.queue.remove(index);
        if now > eta.saturating_add(TIMELOCK_GRACE_PERIOD) {
            return Ok(Release::Expired(queued));
        }
        Ok(Release::Ready(queued))
    }

    pub fn cancel(&mut self, id: u64) -> Result<QueuedAction> {
        let index = self.position(id)?;
        Ok(self.queue.remove(index))
    }

    fn position(&self, id: u64) -> Result<usize> {
        self.queue
            .iter()
            .position(|q| q.id == id)
            .ok_or(error!(VaultError::TimelockActionNotFound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 24 * 60 * 60;

    fn timelock() -> Timelock {
        Timelock {
            vault: Pubkey::new_unique(),
            next_id: 0,
            queue: Vec::new(),
            bump: 0,
        }
    }

    fn set_treasury() -> TimelockAction {
        TimelockAction::SetTreasury {
            treasury: Pubkey::new_unique(),
        }
    }

    #[test]
    fn test_delay_bounds() {
        let mut lock = timelock();
        assert!(lock.queue_action(set_treasury(), 2 * DAY - 1, 0).is_err());
        assert!(lock.queue_action(set_treasury(), 30 * DAY + 1, 0).is_err());
        assert!(lock.queue_action(set_treasury(), 2 * DAY, 0).is_ok());
        assert!(lock.queue_action(set_treasury(), 30 * DAY, 0).is_ok());
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut lock = timelock();
        let first = lock.queue_action(set_treasury(), 2 * DAY, 100).unwrap();
        let second = lock.queue_action(set_treasury(), 3 * DAY, 100).unwrap();

        assert_eq!(first.id, 0);
        assert_eq!(second.id, 1);
        assert_eq!(second.eta, 100 + 3 * DAY);
    }

    #[test]
    fn test_release_waits_for_eta() {
        let mut lock = timelock();
        let queued = lock.queue_action(set_treasury(), 2 * DAY, 0).unwrap();

        assert!(lock.release(queued.id, 2 * DAY - 1).is_err());
        assert_eq!(lock.queue.len(), 1, "Early release keeps the action queued");

        assert_eq!(lock.release(queued.id, 2 * DAY).unwrap(), Release::Ready(queued));
        assert!(lock.queue.is_empty());
    }

    #[test]
    fn test_release_after_grace_expires() {
        let mut lock = timelock();
        let queued = lock.queue_action(set_treasury(), 2 * DAY, 0).unwrap();
        let late = queued.eta + TIMELOCK_GRACE_PERIOD + 1;

        assert_eq!(lock.release(queued.id, late).unwrap(), Release::Expired(queued.clone()));
        assert!(lock.queue.is_empty());
        assert!(lock.release(queued.id, late).is_err());
    }

    #[test]
    fn test_cancel_and_capacity() {
        let mut lock = timelock();
        for _ in 0..MAX_QUEUED_ACTIONS {
            lock.queue_action(set_treasury(), 2 * DAY, 0).unwrap();
        }
        assert!(lock.queue_action(set_treasury(), 2 * DAY, 0).is_err());

        lock.cancel(3).unwrap();
        assert!(lock.cancel(3).is_err());
        assert!(lock.queue_action(set_treasury(), 2 * DAY, 0).is_ok());
    }

    #[test]
    fn test_actions_are_validated_when_queued() {
        let mut lock = timelock();
        let zero_treasury = TimelockAction::SetTreasury {
            treasury: Pubkey::default(),
        };
        let long_name = TimelockAction::AddProvider {
            identifier: "x".repeat(MAX_IDENTIFIER_LEN + 1),
            market: Pubkey::new_unique(),
        };

        assert!(lock.queue_action(zero_treasury, 2 * DAY, 0).is_err());
        assert!(lock.queue_action(long_name, 2 * DAY, 0).is_err());
        assert_eq!(lock.next_id, 0);
    }
}
