//! Coin amounts
//!
//! Coins and currency amounts are integers. Request payloads arrive as signed
//! JSON numbers, so validation happens here once and the rest of the crate
//! only ever sees positive values.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{WalletError, WalletResult};

/// A strictly positive number of coins
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coins(u64);

impl Coins {
    /// Validate a signed amount from the outside world
    pub fn new(value: i64) -> WalletResult<Self> {
        positive(value, "Coin amount").map(Self)
    }

    /// Wrap an already-unsigned amount; zero is rejected
    pub fn from_u64(value: u64) -> WalletResult<Self> {
        if value == 0 {
            return Err(WalletError::invalid_amount(
                "Coin amount must be a positive integer",
            ));
        }
        Ok(Self(value))
    }

    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate a positive currency amount (whole units)
pub fn positive(value: i64, field: &str) -> WalletResult<u64> {
    if value <= 0 {
        return Err(WalletError::invalid_amount(format!(
            "{field} must be a positive integer"
        )));
    }
    Ok(value as u64)
}

/// `amount * rate` without wrapping
pub fn coins_for_amount(amount: u64, rate: u64) -> WalletResult<Coins> {
    let coins = amount
        .checked_mul(rate)
        .ok_or_else(|| WalletError::invalid_amount("Amount is too large"))?;
    Coins::from_u64(coins)
}
