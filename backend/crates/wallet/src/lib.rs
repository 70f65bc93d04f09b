//! Wallet & Settlement Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Wallet, ledger and payment-proof entities, repository traits
//! - `application/` - Settlement use cases and read-side queries
//! - `infra/` - PostgreSQL and in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Features
//! - Per-user wallet split into mining (earned) and purchase sub-wallets
//! - Withdrawals lock coins until an admin approves (commit) or rejects (refund)
//! - Payment proofs (bank transfer UTR) and crypto deposits credit purchases
//!   after admin approval
//! - Mining rewards and referral bonuses credit the earned sub-wallet
//!
//! ## Consistency Model
//! - Each operation commits one changeset atomically
//! - Wallet rows carry a version; a lost race is re-read and retried
//! - Review transitions only apply while the record is still pending

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::SettlementConfig;
pub use domain::services::displayed_total_mined;
pub use error::{WalletError, WalletResult};
pub use infra::postgres::{PgNotificationSink, PgSettlementRepository};
pub use presentation::router::{admin_router, wallet_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

#[cfg(test)]
mod tests;
