use anchor_lang::prelude::*;
use anchor_spl::token::{self, TokenAccount};

use super::ProviderAdapter;
use crate::{
    custody::{vault_token_address, VaultSigner},
    errors::VaultError,
    state::{ProviderEntry, ProviderRegistry},
};

/// Provider whose market position is an SPL token reserve owned by the vault authority
///
/// The reserve balance is the position value: yield accrues by the market
/// crediting the reserve, so `deposit_balance` always reads the live amount.
pub struct TokenReserveProvider<'a, 'info> {
    identifier: String,
    market: Pubkey,
    deposit_rate: u64,
    reserve: AccountInfo<'info>,
    signer: VaultSigner<'a, 'info>,
}

impl<'a, 'info> TokenReserveProvider<'a, 'info> {
    /// Binds a registry entry to its reserve account
    ///
    /// Security considerations:
    /// - Reserve key must equal the registered market
    /// - Reserve must be an SPL token account of the vault asset
    /// - Reserve must be owned by the vault authority PDA
    pub fn load(
        entry: &ProviderEntry,
        reserve: &AccountInfo<'info>,
        asset_mint: &Pubkey,
        signer: &VaultSigner<'a, 'info>,
    ) -> Result<Self> {
        let rules = ReserveRules {
            asset_mint: *asset_mint,
            vault_authority: signer.vault_authority.key(),
        };
        rules.check_account(&entry.market, reserve)?;

        Ok(Self {
            identifier: entry.identifier.clone(),
            market: entry.market,
            deposit_rate: entry.deposit_rate,
            reserve: reserve.clone(),
            signer: signer.clone(),
        })
    }
}

/// What makes a token account usable as a provider reserve for one vault
pub struct ReserveRules {
    pub asset_mint: Pubkey,
    pub vault_authority: Pubkey,
}

impl ReserveRules {
    /// Reserve key must equal the registered market, must not be the vault's
    /// idle account, and must hold the vault asset under the vault authority
    pub fn check(&self, market: &Pubkey, reserve_key: &Pubkey, mint: &Pubkey, owner: &Pubkey) -> Result<()> {
        require_keys_eq!(*reserve_key, *market, VaultError::ProviderAccountMismatch);
        require_keys_neq!(
            *reserve_key,
            vault_token_address(&self.vault_authority, &self.asset_mint),
            VaultError::ReserveIsVaultAccount
        );
        require_keys_eq!(*mint, self.asset_mint, VaultError::InvalidMint);
        require_keys_eq!(*owner, self.vault_authority, VaultError::InvalidOwner);
        Ok(())
    }

    pub fn check_account(&self, market: &Pubkey, reserve: &AccountInfo) -> Result<TokenAccount> {
        require_keys_eq!(*reserve.key, *market, VaultError::ProviderAccountMismatch);
        let position = read_token_account(reserve)?;
        self.check(market, reserve.key, &position.mint, &position.owner)?;
        Ok(position)
    }

    /// Whether a reserve still holds vault funds; anything else can be unregistered
    pub fn holds_funds(&self, mint: &Pubkey, owner: &Pubkey, amount: u64) -> bool {
        *mint == self.asset_mint && *owner == self.vault_authority && amount > 0
    }

    pub fn account_holds_funds(&self, reserve: &AccountInfo) -> bool {
        match read_token_account(reserve) {
            Ok(position) => self.holds_funds(&position.mint, &position.owner, position.amount),
            Err(_) => false,
        }
    }
}

/// Loads one adapter per registered provider from `accounts`, in registry order
pub fn load_providers<'a, 'info>(
    registry: &ProviderRegistry,
    accounts: &[AccountInfo<'info>],
    asset_mint: &Pubkey,
    signer: &VaultSigner<'a, 'info>,
) -> Result<Vec<TokenReserveProvider<'a, 'info>>> {
    require!(
        accounts.len() >= registry.providers.len(),
        VaultError::MissingProviderAccounts
    );

    registry
        .providers
        .iter()
        .zip(accounts)
        .map(|(entry, reserve)| TokenReserveProvider::load(entry, reserve, asset_mint, signer))
        .collect()
}

/// Deserializes an SPL token account, rejecting accounts not owned by the token program
pub fn read_token_account(info: &AccountInfo) -> Result<TokenAccount> {
    require_keys_eq!(*info.owner, token::ID, VaultError::InvalidOwner);
    let data = info.try_borrow_data()?;
    TokenAccount::try_deserialize(&mut &data[..])
}

impl<'a, 'info> ProviderAdapter for TokenReserveProvider<'a, 'info> {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn market(&self) -> Pubkey {
        self.market
    }

    fn deposit(&mut self, amount: u64) -> Result<()> {
        self.signer
            .transfer(&self.signer.vault_token_account, &self.reserve, amount)
    }

    fn withdraw(&mut self, amount: u64) -> Result<()> {
        require!(
            self.deposit_balance()? >= amount,
            VaultError::InsufficientProviderBalance
        );
        self.signer
            .transfer(&self.reserve, &self.signer.vault_token_account, amount)
    }

    fn deposit_balance(&self) -> Result<u64> {
        Ok(read_token_account(&self.reserve)?.amount)
    }

    fn deposit_rate(&self) -> Result<u64> {
        Ok(self.deposit_rate)
    }
}
