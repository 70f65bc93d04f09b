//! Infrastructure Layer
//!
//! Database implementations and the in-memory stand-ins used by tests.

pub mod memory;
pub mod postgres;

pub use memory::{MemoryNotificationSink, MemorySettlementRepository};
pub use postgres::{PgNotificationSink, PgSettlementRepository};

use crate::domain::value_object::TransactionType;

/// Message for a second transaction with the same (type, reference)
pub(crate) fn duplicate_reference_message(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::CryptoDeposit => "This transaction hash has already been submitted",
        TransactionType::Mining => "This mining session has already been credited",
        TransactionType::Referral => "This referral bonus has already been credited",
        TransactionType::Purchase | TransactionType::Withdrawal => {
            "This transaction has already been recorded"
        }
    }
}
