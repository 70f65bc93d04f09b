//! Ledger Value Objects
//!
//! Closed tags carried by every transaction: what kind of money movement it
//! is, where it is in its lifecycle, and which sub-wallet it draws from.
//! Stored as SMALLINT; anything outside the known set is rejected when a row
//! is loaded.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// TransactionType
// ============================================================================

/// Kind of money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum TransactionType {
    /// Coins earned by a completed mining session
    Mining = 0,
    /// Coins bought through an approved payment proof
    Purchase = 1,
    /// Coins paid out to the user
    Withdrawal = 2,
    /// Bonus for a successful referral
    Referral = 3,
    /// Coins bought with an on-chain transfer
    CryptoDeposit = 4,
}

impl TransactionType {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Mining => "mining",
            Self::Purchase => "purchase",
            Self::Withdrawal => "withdrawal",
            Self::Referral => "referral",
            Self::CryptoDeposit => "crypto_deposit",
        }
    }

    /// Types that start life as `pending` and wait for an admin
    #[inline]
    pub const fn requires_review(&self) -> bool {
        matches!(self, Self::Withdrawal | Self::CryptoDeposit)
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(Self::Mining),
            1 => Some(Self::Purchase),
            2 => Some(Self::Withdrawal),
            3 => Some(Self::Referral),
            4 => Some(Self::CryptoDeposit),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "mining" => Some(Self::Mining),
            "purchase" => Some(Self::Purchase),
            "withdrawal" => Some(Self::Withdrawal),
            "referral" => Some(Self::Referral),
            "crypto_deposit" => Some(Self::CryptoDeposit),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// TransactionStatus
// ============================================================================

/// Transaction lifecycle
///
/// `Pending` moves to exactly one of the terminal states, exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum TransactionStatus {
    #[default]
    Pending = 0,
    Completed = 1,
    Failed = 2,
}

impl TransactionStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    #[inline]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(Self::Pending),
            1 => Some(Self::Completed),
            2 => Some(Self::Failed),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// WalletType
// ============================================================================

/// Sub-wallet selector
///
/// `Auto` draws from mining first and takes the remainder from purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum WalletType {
    Mining = 0,
    Purchase = 1,
    #[default]
    Auto = 2,
}

impl WalletType {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Mining => "mining",
            Self::Purchase => "purchase",
            Self::Auto => "auto",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(Self::Mining),
            1 => Some(Self::Purchase),
            2 => Some(Self::Auto),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "mining" => Some(Self::Mining),
            "purchase" => Some(Self::Purchase),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
