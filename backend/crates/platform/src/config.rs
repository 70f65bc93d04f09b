//! Environment configuration helpers
//!
//! Settings are read once at startup and passed explicitly to whoever needs
//! them. Nothing here caches values globally.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// Configuration loading error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(String),

    #[error("{key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Read a required variable. Empty values count as missing.
pub fn require_env(key: &str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key.to_string())),
    }
}

/// Read an optional variable, parsing it as `T` or falling back to `default`.
pub fn env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    parse_value(key, env::var(key).ok().as_deref(), default)
}

/// Parse a raw value the same way [`env_or`] does.
pub fn parse_value<T>(key: &str, raw: Option<&str>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse::<T>().map_err(|e| ConfigError::Invalid {
            key: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}
