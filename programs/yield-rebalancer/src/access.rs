use anchor_lang::prelude::*;

use crate::{errors::VaultError, state::VaultState};

/// Capabilities checked at the top of each privileged instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Fee parameters and the setup deposit
    Admin,
    /// Rebalancing and provider rate updates
    Operator,
    /// Provider set and treasury changes, after the delay
    Timelock,
}

impl VaultState {
    pub fn role_holder(&self, role: Role) -> Pubkey {
        match role {
            Role::Admin => self.authority,
            Role::Operator => self.operator,
            Role::Timelock => self.timelock,
        }
    }

    pub fn require_role(&self, caller: &Pubkey, role: Role) -> Result<()> {
        require_keys_eq!(*caller, self.role_holder(role), VaultError::Unauthorized);
        Ok(())
    }
}
