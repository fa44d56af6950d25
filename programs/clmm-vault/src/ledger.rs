//! Share ledger: pure share issuance and redemption math.
//!
//! Values are compared in a common unit: each amount is scaled up to the larger of
//! the two token decimals and weighted by its reference price. All arithmetic is
//! checked `u128`; every quotient rounds down so rounding never favours the caller.

use anchor_lang::prelude::*;

use crate::{constants::SHARE_DECIMALS, errors::VaultError};

/// Prices and decimals needed to value a pair of token amounts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Valuation {
    pub price_a: u64,
    pub price_b: u64,
    pub decimals_a: u8,
    pub decimals_b: u8,
}

impl Valuation {
    /// Larger of the two token decimals; values are expressed at this precision
    pub fn base_decimals(&self) -> u8 {
        self.decimals_a.max(self.decimals_b)
    }

    /// Price-weighted value of `(amount_a, amount_b)` at `base_decimals` precision
    pub fn value(&self, amount_a: u64, amount_b: u64) -> Result<u128> {
        let base = self.base_decimals();
        let value_a = weighted(amount_a, self.price_a, base - self.decimals_a)?;
        let value_b = weighted(amount_b, self.price_b, base - self.decimals_b)?;
        value_a
            .checked_add(value_b)
            .ok_or_else(|| error!(VaultError::ArithmeticOverflow))
    }
}

fn weighted(amount: u64, price: u64, scale_decimals: u8) -> Result<u128> {
    (amount as u128)
        .checked_mul(price as u128)
        .and_then(|v| v.checked_mul(pow10(scale_decimals)?))
        .ok_or_else(|| error!(VaultError::ArithmeticOverflow))
}

fn pow10(exp: u8) -> Option<u128> {
    10u128.checked_pow(exp as u32)
}

fn to_u64(value: u128) -> Result<u64> {
    u64::try_from(value).map_err(|_| error!(VaultError::ArithmeticOverflow))
}

/// Tokens under the vault's control, split by where they sit
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Holdings {
    /// Custody token account balances
    pub idle_a: u64,
    pub idle_b: u64,
    /// Open position marked to the pool price, uncollected fees included
    pub position_a: u64,
    pub position_b: u64,
}

impl Holdings {
    pub fn idle(idle_a: u64, idle_b: u64) -> Self {
        Self {
            idle_a,
            idle_b,
            ..Self::default()
        }
    }

    /// Managed reserves of each token
    pub fn reserves(&self) -> Result<(u64, u64)> {
        let reserve_a = self
            .idle_a
            .checked_add(self.position_a)
            .ok_or(VaultError::ArithmeticOverflow)?;
        let reserve_b = self
            .idle_b
            .checked_add(self.position_b)
            .ok_or(VaultError::ArithmeticOverflow)?;
        Ok((reserve_a, reserve_b))
    }
}

/// Shares to mint for a deposit of `(amount_a, amount_b)`.
///
/// `reserve_a`/`reserve_b` are the managed reserves *before* the deposit lands.
/// - First deposit: `value * 10^SHARE_DECIMALS / 10^base_decimals`
/// - Otherwise: `total_shares * deposit_value / value_before`
pub fn shares_for_deposit(
    valuation: &Valuation,
    amount_a: u64,
    amount_b: u64,
    reserve_a: u64,
    reserve_b: u64,
    total_shares: u64,
) -> Result<u64> {
    let deposit_value = valuation.value(amount_a, amount_b)?;

    if total_shares == 0 {
        let scale = pow10(SHARE_DECIMALS).ok_or(VaultError::ArithmeticOverflow)?;
        let divisor = pow10(valuation.base_decimals()).ok_or(VaultError::ArithmeticOverflow)?;
        let shares = deposit_value
            .checked_mul(scale)
            .ok_or(VaultError::ArithmeticOverflow)?
            / divisor;
        return to_u64(shares);
    }

    let value_before = valuation.value(reserve_a, reserve_b)?;
    // Shares outstanding against an empty vault cannot be priced
    require!(value_before > 0, VaultError::ArithmeticOverflow);

    let shares = (total_shares as u128)
        .checked_mul(deposit_value)
        .ok_or(VaultError::ArithmeticOverflow)?
        / value_before;
    to_u64(shares)
}

/// `reserve * shares / total_shares`, rounded down
pub fn proportional_amount(reserve: u64, shares: u64, total_shares: u64) -> Result<u64> {
    let amount = (reserve as u128)
        .checked_mul(shares as u128)
        .ok_or(VaultError::ArithmeticOverflow)?
        .checked_div(total_shares as u128)
        .ok_or(VaultError::ArithmeticOverflow)?;
    to_u64(amount)
}

/// Token amounts owed for burning `shares`, from the pre-burn reserves
pub fn withdraw_amounts(
    shares: u64,
    reserve_a: u64,
    reserve_b: u64,
    total_shares: u64,
) -> Result<(u64, u64)> {
    require!(shares <= total_shares, VaultError::InsufficientShares);
    Ok((
        proportional_amount(reserve_a, shares, total_shares)?,
        proportional_amount(reserve_b, shares, total_shares)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sol_usdc() -> Valuation {
        Valuation {
            price_a: 100,
            price_b: 1000,
            decimals_a: 9,
            decimals_b: 6,
        }
    }

    #[test]
    fn value_normalizes_decimals() {
        let v = sol_usdc();
        // 1 SOL at 100 + 10 USDC at 1000, both at 9 decimals
        assert_eq!(v.value(1_000_000_000, 10_000_000).unwrap(), 10_100_000_000_000);
    }

    #[test]
    fn first_deposit_seeds_share_price() {
        let shares = shares_for_deposit(&sol_usdc(), 1_000_000_000, 10_000_000, 0, 0, 0).unwrap();
        // 10_100 price units with 6 share decimals
        assert_eq!(shares, 10_100_000_000);
    }

    #[test]
    fn lopsided_deposit_is_valued_not_counted() {
        let v = sol_usdc();
        let total = shares_for_deposit(&v, 1_000_000_000, 10_000_000, 0, 0, 0).unwrap();
        // Only token B, worth half of the existing vault
        let shares =
            shares_for_deposit(&v, 0, 5_050_000, 1_000_000_000, 10_000_000, total).unwrap();
        assert_eq!(shares, total / 2);
    }

    #[test]
    fn tiny_deposit_rounds_down() {
        let v = Valuation {
            price_a: 1,
            price_b: 1,
            decimals_a: 6,
            decimals_b: 6,
        };
        let shares = shares_for_deposit(&v, 1, 0, 3_000_000, 0, 1_000_000).unwrap();
        assert_eq!(shares, 0);
    }

    #[test]
    fn overflow_is_an_error() {
        let v = Valuation {
            price_a: u64::MAX,
            price_b: u64::MAX,
            decimals_a: 0,
            decimals_b: 38,
        };
        assert!(v.value(u64::MAX, 0).is_err());
    }

    #[test]
    fn reserves_sum_idle_and_position() {
        let holdings = Holdings {
            idle_a: 600,
            idle_b: 60,
            position_a: 400,
            position_b: 40,
        };
        assert_eq!(holdings.reserves().unwrap(), (1000, 100));
        assert_eq!(Holdings::idle(7, 8).reserves().unwrap(), (7, 8));
    }

    #[test]
    fn withdraw_everything_returns_reserves() {
        assert_eq!(withdraw_amounts(500, 1_234, 9_999, 500).unwrap(), (1_234, 9_999));
    }

    #[test]
    fn withdraw_rounds_down() {
        assert_eq!(withdraw_amounts(1, 10, 20, 3).unwrap(), (3, 6));
    }

    #[test]
    fn withdraw_more_than_supply_fails() {
        assert!(withdraw_amounts(4, 10, 20, 3).is_err());
    }
}
