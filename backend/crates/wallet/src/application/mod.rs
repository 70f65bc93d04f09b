//! Application Layer
//!
//! Use cases that orchestrate domain logic and repositories.

pub mod config;
pub mod credit_earnings;
pub mod crypto_deposit;
pub mod crypto_networks;
pub mod queries;
pub mod request_withdrawal;
pub mod review_payment_proof;
pub mod review_withdrawal;
pub mod submit_payment_proof;

pub(crate) mod support;

// Re-exports
pub use config::SettlementConfig;
pub use credit_earnings::{
    CreditEarningsUseCase, MiningSessionCompletedInput, ReferralBonusInput,
};
pub use crypto_deposit::{
    ApproveCryptoDepositInput, CryptoDepositUseCase, RecordCryptoDepositInput,
    RejectCryptoDepositInput,
};
pub use crypto_networks::CryptoNetworkUseCase;
pub use queries::{MinedReport, WalletQueries};
pub use request_withdrawal::{
    RequestWithdrawalInput, RequestWithdrawalOutput, RequestWithdrawalUseCase,
};
pub use review_payment_proof::{
    ApprovePaymentInput, ApprovePaymentOutput, RejectPaymentInput, ReviewPaymentProofUseCase,
};
pub use review_withdrawal::{ApproveWithdrawalInput, RejectWithdrawalInput, ReviewWithdrawalUseCase};
pub use submit_payment_proof::{DUPLICATE_UTR_MESSAGE, SubmitPaymentProofInput, SubmitPaymentProofUseCase};
