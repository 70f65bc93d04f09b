//! Application Configuration
//!
//! Settlement settings. Built once (from the environment in the binary,
//! literally in tests) and passed to every use case.

use platform::config::{ConfigError, env_or};

/// Settlement engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementConfig {
    /// Coins credited per currency unit when a proof or deposit omits them
    pub coins_per_currency_unit: u64,
    /// Smallest accepted payment proof amount
    pub min_deposit: u64,
    /// Largest accepted payment proof amount
    pub max_deposit: u64,
    /// Attempts per operation when the wallet version moves underneath it
    pub max_commit_attempts: u32,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            coins_per_currency_unit: 10,
            min_deposit: 100,
            max_deposit: 100_000,
            max_commit_attempts: 3,
        }
    }
}

impl SettlementConfig {
    /// Read `COINS_PER_CURRENCY_UNIT`, `MIN_DEPOSIT`, `MAX_DEPOSIT` and
    /// `MAX_COMMIT_ATTEMPTS`, falling back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Self {
            coins_per_currency_unit: env_or(
                "COINS_PER_CURRENCY_UNIT",
                defaults.coins_per_currency_unit,
            )?,
            min_deposit: env_or("MIN_DEPOSIT", defaults.min_deposit)?,
            max_deposit: env_or("MAX_DEPOSIT", defaults.max_deposit)?,
            max_commit_attempts: env_or("MAX_COMMIT_ATTEMPTS", defaults.max_commit_attempts)?,
        }
        .validated()
    }

    /// Reject settings no operation could work with
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.coins_per_currency_unit == 0 {
            return Err(invalid("COINS_PER_CURRENCY_UNIT", "0", "must be positive"));
        }
        if self.min_deposit > self.max_deposit {
            return Err(invalid(
                "MIN_DEPOSIT",
                &self.min_deposit.to_string(),
                "must not exceed MAX_DEPOSIT",
            ));
        }
        if self.max_commit_attempts == 0 {
            return Err(invalid("MAX_COMMIT_ATTEMPTS", "0", "must be at least 1"));
        }
        Ok(self)
    }

    pub fn deposit_in_range(&self, amount: u64) -> bool {
        (self.min_deposit..=self.max_deposit).contains(&amount)
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
