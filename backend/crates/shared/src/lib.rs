//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary every backend crate agrees on:
//! - Unified error type ([`error::app_error::AppError`]) and its HTTP classification
//! - Typed identifiers for users, admins, transactions and payment proofs
//! - Pagination primitives for admin listings
//!
//! Only things whose meaning is identical across crates belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod page;
