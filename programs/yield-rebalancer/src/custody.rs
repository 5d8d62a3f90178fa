use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::get_associated_token_address,
    token::{self, Burn, MintTo, Transfer},
};

use crate::errors::VaultError;

/// Whose share balance a mint or burn touches
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareHolder {
    /// The vault's own share account (setup shares)
    Vault,
    /// The user calling deposit / withdraw / redeem
    Depositor,
}

/// Token movements owned by the vault itself
///
/// The accounting engine only talks to tokens through this trait, so it can run
/// against in-memory balances in tests.
pub trait VaultCustody {
    /// Depositor → vault token account
    fn pull_from_depositor(&mut self, amount: u64) -> Result<()>;
    /// Vault token account → depositor
    fn push_to_depositor(&mut self, amount: u64) -> Result<()>;
    /// Vault token account → treasury
    fn pay_treasury(&mut self, amount: u64) -> Result<()>;
    fn mint_shares(&mut self, holder: ShareHolder, shares: u64) -> Result<()>;
    fn burn_shares(&mut self, holder: ShareHolder, shares: u64) -> Result<()>;
}

/// The vault's idle asset account: the vault authority's associated token account
///
/// Provider reserves share its mint and owner, so only the address tells them apart.
pub fn vault_token_address(vault_authority: &Pubkey, asset_mint: &Pubkey) -> Pubkey {
    get_associated_token_address(vault_authority, asset_mint)
}

pub fn require_vault_token_account(key: &Pubkey, vault_authority: &Pubkey, asset_mint: &Pubkey) -> Result<()> {
    require_keys_eq!(
        *key,
        vault_token_address(vault_authority, asset_mint),
        VaultError::InvalidVaultTokenAccount
    );
    Ok(())
}

/// Vault-side accounts every CPI out of the vault signs with
#[derive(Clone)]
pub struct VaultSigner<'a, 'info> {
    pub token_program: AccountInfo<'info>,
    pub vault_token_account: AccountInfo<'info>,
    pub vault_authority: AccountInfo<'info>,
    pub signer_seeds: &'a [&'a [&'a [u8]]],
}

impl<'a, 'info> VaultSigner<'a, 'info> {
    /// Transfer between two token accounts owned by the vault authority PDA
    pub fn transfer(
        &self,
        from: &AccountInfo<'info>,
        to: &AccountInfo<'info>,
        amount: u64,
    ) -> Result<()> {
        let transfer_ctx = CpiContext::new_with_signer(
            self.token_program.clone(),
            Transfer {
                from: from.clone(),
                to: to.clone(),
                authority: self.vault_authority.clone(),
            },
            self.signer_seeds,
        );
        token::transfer(transfer_ctx, amount)
    }
}

/// User side of a deposit or withdrawal
pub struct DepositorAccounts<'info> {
    pub owner: AccountInfo<'info>,
    pub asset_account: AccountInfo<'info>,
    /// Absent for the setup deposit, whose shares go to the vault
    pub share_account: Option<AccountInfo<'info>>,
}

/// `VaultCustody` backed by SPL token CPIs
pub struct AnchorCustody<'a, 'info> {
    pub signer: VaultSigner<'a, 'info>,
    pub share_mint: AccountInfo<'info>,
    /// Required for setup and profit fee burns
    pub vault_share_account: Option<AccountInfo<'info>>,
    pub treasury_token_account: Option<AccountInfo<'info>>,
    pub depositor: Option<DepositorAccounts<'info>>,
}

impl<'a, 'info> AnchorCustody<'a, 'info> {
    fn depositor(&self) -> Result<&DepositorAccounts<'info>> {
        self.depositor
            .as_ref()
            .ok_or(error!(VaultError::MissingAccount))
    }

    fn vault_shares(&self) -> Result<AccountInfo<'info>> {
        self.vault_share_account
            .clone()
            .ok_or(error!(VaultError::MissingAccount))
    }

    fn depositor_shares(&self) -> Result<AccountInfo<'info>> {
        self.depositor()?
            .share_account
            .clone()
            .ok_or(error!(VaultError::MissingAccount))
    }
}

impl<'a, 'info> VaultCustody for AnchorCustody<'a, 'info> {
    fn pull_from_depositor(&mut self, amount: u64) -> Result<()> {
        let depositor = self.depositor()?;
        let transfer_ctx = CpiContext::new(
            self.signer.token_program.clone(),
            Transfer {
                from: depositor.asset_account.clone(),
                to: self.signer.vault_token_account.clone(),
                authority: depositor.owner.clone(),
            },
        );
        token::transfer(transfer_ctx, amount)
    }

    fn push_to_depositor(&mut self, amount: u64) -> Result<()> {
        let to = self.depositor()?.asset_account.clone();
        self.signer
            .transfer(&self.signer.vault_token_account, &to, amount)
    }

    fn pay_treasury(&mut self, amount: u64) -> Result<()> {
        let treasury = self
            .treasury_token_account
            .as_ref()
            .ok_or(error!(VaultError::MissingAccount))?;
        self.signer
            .transfer(&self.signer.vault_token_account, treasury, amount)
    }

    fn mint_shares(&mut self, holder: ShareHolder, shares: u64) -> Result<()> {
        let to = match holder {
            ShareHolder::Vault => self.vault_shares()?,
            ShareHolder::Depositor => self.depositor_shares()?,
        };
        let mint_ctx = CpiContext::new_with_signer(
            self.signer.token_program.clone(),
            MintTo {
                mint: self.share_mint.clone(),
                to,
                authority: self.signer.vault_authority.clone(),
            },
            self.signer.signer_seeds,
        );
        token::mint_to(mint_ctx, shares)
    }

    fn burn_shares(&mut self, holder: ShareHolder, shares: u64) -> Result<()> {
        match holder {
            ShareHolder::Vault => {
                let burn_ctx = CpiContext::new_with_signer(
                    self.signer.token_program.clone(),
                    Burn {
                        mint: self.share_mint.clone(),
                        from: self.vault_shares()?,
                        authority: self.signer.vault_authority.clone(),
                    },
                    self.signer.signer_seeds,
                );
                token::burn(burn_ctx, shares)
            }
            ShareHolder::Depositor => {
                let burn_ctx = CpiContext::new(
                    self.signer.token_program.clone(),
                    Burn {
                        mint: self.share_mint.clone(),
                        from: self.depositor_shares()?,
                        authority: self.depositor()?.owner.clone(),
                    },
                );
                token::burn(burn_ctx, shares)
            }
        }
    }
}
