//! Use-case plumbing shared by the settlement operations.

use std::future::Future;

use crate::domain::entity::{Notification, Transaction};
use crate::domain::repository::NotificationSink;
use crate::error::{WalletError, WalletResult};

/// Run `attempt` until it succeeds, fails for good, or `max_attempts` is hit.
///
/// Only `ConcurrentModification` is retried. Each attempt must re-read
/// everything it decides on.
pub(crate) async fn with_retry<T, F, Fut>(
    max_attempts: u32,
    operation: &'static str,
    mut attempt: F,
) -> WalletResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = WalletResult<T>>,
{
    let mut tries = 1;
    loop {
        match attempt().await {
            Err(e) if e.is_retryable() && tries < max_attempts => {
                tracing::debug!(operation, attempt = tries, "Retrying after concurrent wallet update");
                tries += 1;
            }
            other => return other,
        }
    }
}

/// Deliver a notification after commit. Failures are logged, never returned.
pub(crate) async fn dispatch<N>(sink: &N, notification: Notification)
where
    N: NotificationSink,
{
    if let Err(e) = sink.notify(&notification).await {
        tracing::warn!(
            error = %e,
            user_id = %notification.user_id,
            title = %notification.title,
            "Notification delivery failed"
        );
    }
}

/// Trimmed external reference (session id, referral id, tx hash)
pub(crate) fn required_reference<'a>(raw: &'a str, field: &str) -> WalletResult<&'a str> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(WalletError::invalid_input(format!("{field} is required")));
    }
    if value.chars().count() > Transaction::MAX_REFERENCE_LEN {
        return Err(WalletError::invalid_input(format!(
            "{field} must be at most {} characters",
            Transaction::MAX_REFERENCE_LEN
        )));
    }
    Ok(value)
}
