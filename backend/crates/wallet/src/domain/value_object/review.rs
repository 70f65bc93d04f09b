//! Review Value Objects
//!
//! Payment-proof lifecycle plus the free-text inputs an admin or user
//! attaches while moving records through it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{WalletError, WalletResult};

// ============================================================================
// ProofStatus
// ============================================================================

/// Payment proof lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum ProofStatus {
    #[default]
    Pending = 0,
    Approved = 1,
    Rejected = 2,
}

impl ProofStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(Self::Pending),
            1 => Some(Self::Approved),
            2 => Some(Self::Rejected),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ProofStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// Utr
// ============================================================================

/// Unique Transaction Reference of a bank transfer
///
/// Trimmed, non-empty, at most 64 characters, no inner whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Utr(String);

impl Utr {
    pub const MAX_LEN: usize = 64;

    pub fn new(raw: &str) -> WalletResult<Self> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(WalletError::invalid_input("UTR and amount are required"));
        }
        if value.chars().count() > Self::MAX_LEN {
            return Err(WalletError::invalid_input("UTR is too long"));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(WalletError::invalid_input("UTR must not contain whitespace"));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rebuild from storage without validation
    pub(crate) fn from_trusted(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Utr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// ReviewReason
// ============================================================================

/// Non-empty rejection reason shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewReason(String);

impl ReviewReason {
    pub const MAX_LEN: usize = 500;

    pub fn new(raw: Option<&str>) -> WalletResult<Self> {
        let value = raw.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return Err(WalletError::ReasonRequired);
        }
        if value.chars().count() > Self::MAX_LEN {
            return Err(WalletError::invalid_input("Rejection reason is too long"));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReviewReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Optional admin note: blank becomes `None`
pub fn normalize_note(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
