use anchor_lang::prelude::*;

use crate::errors::VaultError;

/// Rounding direction for share/asset conversions.
///
/// | Operation            | Convert         | Rounding |
/// |----------------------|-----------------|----------|
/// | Deposit              | assets → shares | Floor    |
/// | Withdraw             | assets → shares | Ceil     |
/// | Redeem               | shares → assets | Floor    |
/// | Profit fee burn      | assets → shares | Ceil     |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    Floor,
    Ceil,
}

/// `value * numerator / denominator` in u128 with the requested rounding
pub fn mul_div(value: u128, numerator: u128, denominator: u128, rounding: Rounding) -> Result<u128> {
    require!(denominator != 0, VaultError::MathOverflow);

    let product = value
        .checked_mul(numerator)
        .ok_or(error!(VaultError::MathOverflow))?;
    let quotient = product / denominator;

    match rounding {
        Rounding::Ceil if product % denominator != 0 => quotient
            .checked_add(1)
            .ok_or(error!(VaultError::MathOverflow)),
        _ => Ok(quotient),
    }
}

/// `mul_div` for u64 amounts, failing if the result does not fit back into u64
pub fn mul_div_u64(value: u64, numerator: u128, denominator: u128, rounding: Rounding) -> Result<u64> {
    let result = mul_div(value as u128, numerator, denominator, rounding)?;
    u64::try_from(result).map_err(|_| error!(VaultError::MathOverflow))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_and_ceil_agree_on_exact_division() {
        assert_eq!(mul_div(100, 3, 3, Rounding::Floor).unwrap(), 100);
        assert_eq!(mul_div(100, 3, 3, Rounding::Ceil).unwrap(), 100);
    }

    #[test]
    fn test_ceil_rounds_remainder_up() {
        assert_eq!(mul_div(10, 1, 3, Rounding::Floor).unwrap(), 3);
        assert_eq!(mul_div(10, 1, 3, Rounding::Ceil).unwrap(), 4);
    }

    #[test]
    fn test_zero_denominator_rejected() {
        assert!(mul_div(1, 1, 0, Rounding::Floor).is_err());
    }

    #[test]
    fn test_u64_overflow_rejected() {
        assert!(mul_div_u64(u64::MAX, 2, 1, Rounding::Floor).is_err());
        assert_eq!(mul_div_u64(u64::MAX, 1, 1, Rounding::Floor).unwrap(), u64::MAX);
    }
}
