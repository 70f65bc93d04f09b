//! Value Objects

pub mod coins;
pub mod ledger;
pub mod lock_allocation;
pub mod review;

pub use coins::Coins;
pub use ledger::{TransactionStatus, TransactionType, WalletType};
pub use lock_allocation::LockAllocation;
pub use review::{ProofStatus, ReviewReason, Utr};
