use anchor_lang::prelude::*;

use crate::{
    constants::*,
    errors::VaultError,
    math::{mul_div_u64, Rounding},
};

/// Which fee streams a vault runs
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VaultVariant {
    /// Withdraw and rebalance fees only
    Standard,
    /// Additionally skims a share of accrued profit against `last_total_assets`
    WithProfitFees,
}

/// Global vault state tracking shares, fee parameters and the active provider
///
/// Security considerations:
/// - Role holders stored in state (not instruction args)
/// - Total assets are never cached here; they are read from the providers
/// - Bumps stored for efficient PDA signing
/// - 64 bytes padding for future upgrades
#[account]
pub struct VaultState {
    /// Admin: fee parameters, setup deposit
    pub authority: Pubkey,          // 32 bytes

    /// Operator: rebalances and provider rate updates
    pub operator: Pubkey,           // 32 bytes

    /// Timelock authority: provider set and treasury changes
    pub timelock: Pubkey,           // 32 bytes

    /// Owner of the token account receiving fees
    pub treasury: Pubkey,           // 32 bytes

    /// Mint of the underlying asset token
    pub asset_mint: Pubkey,         // 32 bytes

    /// Mint of the vault share token
    pub share_mint: Pubkey,         // 32 bytes

    /// Market key of the provider used for deposits and withdrawals
    pub active_provider: Pubkey,    // 32 bytes

    pub variant: VaultVariant,      // 1 byte

    /// Set once the seed deposit has been made
    pub setup_complete: bool,       // 1 byte

    /// Total shares outstanding (mirrors the share mint supply)
    pub total_shares: u64,          // 8 bytes

    /// Shares held by the vault itself, minted by the setup deposit
    pub vault_owned_shares: u64,    // 8 bytes

    /// Withdraw fee, PRECISION scale
    pub withdraw_fee_percent: u64,  // 8 bytes

    /// Profit fee, basis points
    pub profit_fee_percent: u16,    // 2 bytes

    /// Minimum seed deposit
    pub min_amount: u64,            // 8 bytes

    /// Total assets at the last profit fee checkpoint
    pub last_total_assets: u64,     // 8 bytes

    pub bump: u8,                   // 1 byte
    pub share_bump: u8,             // 1 byte
    pub authority_bump: u8,         // 1 byte

    // Padding for future upgrades
    pub _reserved: [u8; 64],        // 64 bytes
}

impl VaultState {
    pub const SPACE: usize = 8 + (7 * 32) + 1 + 1 + 8 + 8 + 8 + 2 + 8 + 8 + 1 + 1 + 1 + 64;

    pub fn profit_fees_enabled(&self) -> bool {
        self.variant == VaultVariant::WithProfitFees
    }

    /// Rejects the one state conversions can never price: assets gone while shares remain
    pub fn check_solvency(&self, total_assets: u64) -> Result<()> {
        require!(
            total_assets > 0 || self.total_shares == 0,
            VaultError::InvariantViolation
        );
        Ok(())
    }

    /// Shares worth `assets`, given the current provider total
    ///
    /// Formula: shares = assets * (totalShares + VIRTUAL_SHARES) / (totalAssets + VIRTUAL_ASSETS)
    ///
    /// Security: the virtual offset keeps the denominator non-zero and flattens the
    /// price curve near an empty vault
    pub fn convert_to_shares(&self, assets: u64, total_assets: u64, rounding: Rounding) -> Result<u64> {
        self.check_solvency(total_assets)?;
        mul_div_u64(
            assets,
            self.total_shares as u128 + VIRTUAL_SHARES,
            total_assets as u128 + VIRTUAL_ASSETS,
            rounding,
        )
    }

    /// Assets worth `shares`, given the current provider total
    ///
    /// Formula: assets = shares * (totalAssets + VIRTUAL_ASSETS) / (totalShares + VIRTUAL_SHARES)
    pub fn convert_to_assets(&self, shares: u64, total_assets: u64, rounding: Rounding) -> Result<u64> {
        self.check_solvency(total_assets)?;
        mul_div_u64(
            shares,
            total_assets as u128 + VIRTUAL_ASSETS,
            self.total_shares as u128 + VIRTUAL_SHARES,
            rounding,
        )
    }

    /// Fee retained on a withdrawal of `assets`
    pub fn withdraw_fee(&self, assets: u64) -> Result<u64> {
        mul_div_u64(assets, self.withdraw_fee_percent as u128, PRECISION, Rounding::Floor)
    }

    pub fn set_withdraw_fee_percent(&mut self, withdraw_fee_percent: u64) -> Result<()> {
        require!(
            withdraw_fee_percent <= MAX_WITHDRAW_FEE_PERCENT,
            VaultError::FeePercentTooHigh
        );
        self.withdraw_fee_percent = withdraw_fee_percent;
        Ok(())
    }

    pub fn set_profit_fee_percent(&mut self, profit_fee_percent: u16) -> Result<()> {
        require!(
            profit_fee_percent <= MAX_PROFIT_FEE_PERCENT,
            VaultError::FeePercentTooHigh
        );
        self.profit_fee_percent = profit_fee_percent;
        Ok(())
    }

    pub fn set_min_amount(&mut self, min_amount: u64) -> Result<()> {
        require!(min_amount > 0, VaultError::InvalidMinAmount);
        self.min_amount = min_amount;
        Ok(())
    }

    /// Vault authority PDA, re-derived from the stored bump
    pub fn vault_authority(&self) -> Result<Pubkey> {
        Pubkey::create_program_address(
            &[
                VAULT_AUTHORITY_SEED,
                self.asset_mint.as_ref(),
                &[self.authority_bump],
            ],
            &crate::ID,
        )
        .map_err(|_| error!(VaultError::InvalidVaultAuthority))
    }

    pub fn set_treasury(&mut self, treasury: Pubkey) -> Result<()> {
        require!(treasury != Pubkey::default(), VaultError::ZeroAddress);
        self.treasury = treasury;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_vault(total_shares: u64) -> VaultState {
        VaultState {
            authority: Pubkey::default(),
            operator: Pubkey::default(),
            timelock: Pubkey::default(),
            treasury: Pubkey::default(),
            asset_mint: Pubkey::default(),
            share_mint: Pubkey::default(),
            active_provider: Pubkey::default(),
            variant: VaultVariant::Standard,
            setup_complete: true,
            total_shares,
            vault_owned_shares: 0,
            withdraw_fee_percent: 0,
            profit_fee_percent: 0,
            min_amount: 1,
            last_total_assets: 0,
            bump: 0,
            share_bump: 0,
            authority_bump: 0,
            _reserved: [0; 64],
        }
    }

    #[test]
    fn test_empty_vault_converts_one_to_one() {
        let vault = mock_vault(0);
        assert_eq!(vault.convert_to_shares(1000, 0, Rounding::Floor).unwrap(), 1000);
    }

    #[test]
    fn test_deposit_with_profit() {
        // Vault has 2000 assets but only 1000 shares (profit made)
        let vault = mock_vault(1000);
        // (1000 + 1) / (2000 + 1) of 500 assets, floored
        assert_eq!(vault.convert_to_shares(500, 2000, Rounding::Floor).unwrap(), 250);
    }

    #[test]
    fn test_convert_to_assets() {
        let vault = mock_vault(1000);
        // 500 * 2001 / 1001 = 999.5
        assert_eq!(vault.convert_to_assets(500, 2000, Rounding::Floor).unwrap(), 999);
        assert_eq!(vault.convert_to_assets(500, 2000, Rounding::Ceil).unwrap(), 1000);
    }

    #[test]
    fn test_precision_loss_favors_vault() {
        let vault = mock_vault(333);
        // 100 * 334 / 1001 = 33.36
        assert_eq!(vault.convert_to_shares(100, 1000, Rounding::Floor).unwrap(), 33);
        assert_eq!(vault.convert_to_shares(100, 1000, Rounding::Ceil).unwrap(), 34);
    }

    #[test]
    fn test_zero_assets_with_shares_is_fatal() {
        let vault = mock_vault(10);
        assert!(vault.convert_to_shares(1, 0, Rounding::Floor).is_err());
        assert!(vault.convert_to_assets(1, 0, Rounding::Floor).is_err());
    }

    #[test]
    fn test_fee_setters_respect_ceilings() {
        let mut vault = mock_vault(0);
        assert!(vault.set_withdraw_fee_percent(MAX_WITHDRAW_FEE_PERCENT + 1).is_err());
        vault.set_withdraw_fee_percent(MAX_WITHDRAW_FEE_PERCENT).unwrap();
        assert!(vault.set_min_amount(0).is_err());
        assert!(vault.set_treasury(Pubkey::default()).is_err());
    }

    #[test]
    fn test_withdraw_fee() {
        let mut vault = mock_vault(0);
        // 1%
        vault.set_withdraw_fee_percent(10_000_000_000_000_000).unwrap();
        assert_eq!(vault.withdraw_fee(1_000).unwrap(), 10);
        assert_eq!(vault.withdraw_fee(99).unwrap(), 0);
    }
}
