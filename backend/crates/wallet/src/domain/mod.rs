//! Domain Layer
//!
//! Contains entities, value objects, repository traits and domain services.

pub mod entity;
pub mod repository;
pub mod services;
pub mod value_object;

// Re-exports
pub use entity::{Notification, PaymentProof, Transaction, Wallet};
pub use repository::{
    Changeset, NotificationSink, PaymentProofRepository, SettlementRepository, SettlementStore,
    TransactionRepository, WalletRepository,
};
pub use services::displayed_total_mined;
