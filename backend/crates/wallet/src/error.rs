//! Wallet Error Types
//!
//! Settlement-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Every variant carries a stable reason
//! code so clients can react without parsing messages.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::client::PrincipalError;
use thiserror::Error;

/// Wallet-specific result type alias
pub type WalletResult<T> = Result<T, WalletError>;

/// Wallet-specific error variants
///
/// All of them are raised before any state is written; a failed operation
/// leaves wallets, transactions and proofs untouched.
#[derive(Debug, Error)]
pub enum WalletError {
    /// Amount is zero, negative or out of the accepted range
    #[error("{0}")]
    InvalidAmount(String),

    /// Request field is missing or malformed
    #[error("{0}")]
    InvalidInput(String),

    /// Rejection without a reason
    #[error("Please provide a rejection reason")]
    ReasonRequired,

    /// Not enough available coins to lock
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: u64, available: u64 },

    /// Internal inconsistency, e.g. unlocking more than is locked
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Record is not in a state that permits the action
    #[error("{0}")]
    InvalidState(String),

    /// Reference (utr, session id, tx hash) already used
    #[error("{0}")]
    DuplicateReference(String),

    /// Referenced record does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Wallet changed between read and commit
    #[error("Wallet was modified concurrently, please retry")]
    ConcurrentModification,

    /// Gateway did not forward a principal
    #[error("Missing required header: {0}")]
    MissingPrincipal(&'static str),

    /// Gateway forwarded something that is not a UUID
    #[error("Malformed header: {0}")]
    MalformedPrincipal(&'static str),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WalletError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        WalletError::InvalidState(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        WalletError::InvalidInput(message.into())
    }

    pub fn invalid_amount(message: impl Into<String>) -> Self {
        WalletError::InvalidAmount(message.into())
    }

    /// Internal inconsistency, logged at error level when raised
    pub fn invariant_violation(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!(message = %message, "Wallet invariant violated");
        WalletError::InvariantViolation(message)
    }

    /// Stable machine-readable reason code
    pub fn code(&self) -> &'static str {
        match self {
            WalletError::InvalidAmount(_) => "invalid_amount",
            WalletError::InvalidInput(_) | WalletError::MalformedPrincipal(_) => "invalid_input",
            WalletError::ReasonRequired => "reason_required",
            WalletError::InsufficientFunds { .. } => "insufficient_funds",
            WalletError::InvariantViolation(_) => "invariant_violation",
            WalletError::InvalidState(_) => "already_processed",
            WalletError::DuplicateReference(_) => "duplicate_reference",
            WalletError::NotFound(_) => "not_found",
            WalletError::ConcurrentModification => "concurrent_modification",
            WalletError::MissingPrincipal(_) => "unauthenticated",
            WalletError::Database(_) | WalletError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            WalletError::InvalidAmount(_)
            | WalletError::InvalidInput(_)
            | WalletError::ReasonRequired
            | WalletError::InvalidState(_)
            | WalletError::MalformedPrincipal(_) => ErrorKind::BadRequest,
            WalletError::InsufficientFunds { .. } => ErrorKind::UnprocessableEntity,
            WalletError::DuplicateReference(_) | WalletError::ConcurrentModification => {
                ErrorKind::Conflict
            }
            WalletError::NotFound(_) => ErrorKind::NotFound,
            WalletError::MissingPrincipal(_) => ErrorKind::Unauthorized,
            WalletError::InvariantViolation(_)
            | WalletError::Database(_)
            | WalletError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Whether re-reading and re-applying the operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, WalletError::ConcurrentModification)
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            // storage details never leave the process
            WalletError::Database(_) => AppError::internal("Database error").with_code(self.code()),
            WalletError::InsufficientFunds { .. } => AppError::new(self.kind(), self.to_string())
                .with_code(self.code())
                .with_action("Reduce the amount or choose another wallet"),
            WalletError::ConcurrentModification => AppError::new(self.kind(), self.to_string())
                .with_code(self.code())
                .with_action("Retry the request"),
            _ => AppError::new(self.kind(), self.to_string()).with_code(self.code()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            WalletError::Database(e) => {
                tracing::error!(error = %e, "Wallet database error");
            }
            WalletError::Internal(msg) => {
                tracing::error!(message = %msg, "Wallet internal error");
            }
            // already logged at error level where raised
            WalletError::InvariantViolation(msg) => {
                tracing::debug!(message = %msg, "Invariant violation returned to client");
            }
            WalletError::ConcurrentModification => {
                tracing::warn!("Wallet commit lost optimistic concurrency race");
            }
            WalletError::DuplicateReference(msg) => {
                tracing::warn!(message = %msg, "Duplicate reference rejected");
            }
            _ => {
                tracing::debug!(error = %self, code = self.code(), "Wallet error");
            }
        }
    }
}

impl From<WalletError> for AppError {
    fn from(err: WalletError) -> Self {
        match err {
            // pool exhaustion and outages become 503 there
            WalletError::Database(e) => AppError::from(e),
            other => other.to_app_error(),
        }
    }
}

impl IntoResponse for WalletError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

impl From<PrincipalError> for WalletError {
    fn from(err: PrincipalError) -> Self {
        match err {
            PrincipalError::MissingHeader(header) => WalletError::MissingPrincipal(header),
            PrincipalError::MalformedHeader(header) => WalletError::MalformedPrincipal(header),
        }
    }
}
