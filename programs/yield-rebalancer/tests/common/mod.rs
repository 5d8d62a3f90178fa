//! In-memory provider and custody used to drive the accounting engine
//! without a validator.

#![allow(dead_code)]

use anchor_lang::prelude::*;
use yield_rebalancer::{
    custody::{ShareHolder, VaultCustody},
    errors::VaultError,
    providers::ProviderAdapter,
    state::{VaultState, VaultVariant},
};

pub const USDC: u64 = 1_000_000;

/// Yield source holding a plain balance
#[derive(Debug, Clone)]
pub struct MockProvider {
    pub identifier: String,
    pub market: Pubkey,
    pub balance: u64,
    pub rate: u64,
    /// Makes every deposit fail after the funds were staged
    pub fail_deposit: bool,
    /// Deposit and withdraw calls seen so far
    pub moves: u32,
}

impl MockProvider {
    pub fn new(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            market: Pubkey::new_unique(),
            balance: 0,
            rate: 0,
            fail_deposit: false,
            moves: 0,
        }
    }

    /// Simulates interest accruing on the vault's position
    pub fn accrue(&mut self, amount: u64) {
        self.balance += amount;
    }

    pub fn lose(&mut self, amount: u64) {
        self.balance -= amount;
    }
}

impl ProviderAdapter for MockProvider {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn market(&self) -> Pubkey {
        self.market
    }

    fn deposit(&mut self, amount: u64) -> Result<()> {
        self.moves += 1;
        if self.fail_deposit {
            return err!(VaultError::InvalidProvider);
        }
        self.balance += amount;
        Ok(())
    }

    fn withdraw(&mut self, amount: u64) -> Result<()> {
        self.moves += 1;
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(error!(VaultError::InsufficientProviderBalance))?;
        Ok(())
    }

    fn deposit_balance(&self) -> Result<u64> {
        Ok(self.balance)
    }

    fn deposit_rate(&self) -> Result<u64> {
        Ok(self.rate)
    }
}

/// Records every token movement the engine asks for
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MockCustody {
    pub pulled: u64,
    pub pushed: u64,
    pub treasury: u64,
    pub minted_to_vault: u64,
    pub minted_to_depositor: u64,
    pub burned_from_vault: u64,
    pub burned_from_depositor: u64,
}

impl VaultCustody for MockCustody {
    fn pull_from_depositor(&mut self, amount: u64) -> Result<()> {
        self.pulled += amount;
        Ok(())
    }

    fn push_to_depositor(&mut self, amount: u64) -> Result<()> {
        self.pushed += amount;
        Ok(())
    }

    fn pay_treasury(&mut self, amount: u64) -> Result<()> {
        self.treasury += amount;
        Ok(())
    }

    fn mint_shares(&mut self, holder: ShareHolder, shares: u64) -> Result<()> {
        match holder {
            ShareHolder::Vault => self.minted_to_vault += shares,
            ShareHolder::Depositor => self.minted_to_depositor += shares,
        }
        Ok(())
    }

    fn burn_shares(&mut self, holder: ShareHolder, shares: u64) -> Result<()> {
        match holder {
            ShareHolder::Vault => self.burned_from_vault += shares,
            ShareHolder::Depositor => self.burned_from_depositor += shares,
        }
        Ok(())
    }
}

/// Fresh, not yet seeded vault whose active provider is `active`
pub fn vault_state(variant: VaultVariant, active: Pubkey) -> VaultState {
    VaultState {
        authority: Pubkey::new_unique(),
        operator: Pubkey::new_unique(),
        timelock: Pubkey::new_unique(),
        treasury: Pubkey::new_unique(),
        asset_mint: Pubkey::new_unique(),
        share_mint: Pubkey::new_unique(),
        active_provider: active,
        variant,
        setup_complete: false,
        total_shares: 0,
        vault_owned_shares: 0,
        withdraw_fee_percent: 0,
        profit_fee_percent: 0,
        min_amount: USDC,
        last_total_assets: 0,
        bump: 255,
        share_bump: 255,
        authority_bump: 255,
        _reserved: [0; 64],
    }
}

/// Two providers, the first one active
pub fn two_providers() -> Vec<MockProvider> {
    vec![
        MockProvider::new("Aave_V3_Provider"),
        MockProvider::new("Compound_V3_Provider"),
    ]
}

pub fn assert_vault_error<T: std::fmt::Debug>(result: Result<T>, expected: VaultError) {
    match result {
        Err(Error::AnchorError(err)) => assert_eq!(
            err.error_code_number,
            u32::from(expected),
            "expected {:?}, got {}",
            expected,
            err.error_name
        ),
        other => panic!("expected {:?}, got {:?}", expected, other),
    }
}
