//! Notification Entity
//!
//! Message handed to the notification sink after a settlement commits.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::entity::{payment_proof::PaymentProof, transaction::Transaction};
use crate::domain::value_object::{ReviewReason, Utr};

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum NotificationType {
    Transaction = 0,
    System = 1,
}

impl NotificationType {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Transaction => "transaction",
            Self::System => "system",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(Self::Transaction),
            1 => Some(Self::System),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "transaction" => Some(Self::Transaction),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: UserId,
        notification_type: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            message: message.into(),
            notification_type,
            created_at: Utc::now(),
        }
    }

    pub fn withdrawal_approved(tx: &Transaction) -> Self {
        Self::new(
            tx.user_id,
            NotificationType::Transaction,
            "Withdrawal Approved",
            format!(
                "Your withdrawal of {} coins has been approved and processed.",
                tx.coins
            ),
        )
    }

    pub fn withdrawal_rejected(tx: &Transaction, reason: &ReviewReason) -> Self {
        Self::new(
            tx.user_id,
            NotificationType::Transaction,
            "Withdrawal Rejected",
            format!(
                "Your withdrawal of {} coins was rejected. Reason: {}. Coins have been refunded to your wallet.",
                tx.coins, reason
            ),
        )
    }

    pub fn payment_submitted(user_id: UserId, utr: &Utr) -> Self {
        Self::new(
            user_id,
            NotificationType::System,
            "Payment Submitted",
            format!(
                "Your payment proof (UTR: {utr}) has been submitted and is pending admin verification."
            ),
        )
    }

    pub fn payment_approved(proof: &PaymentProof) -> Self {
        Self::new(
            proof.user_id,
            NotificationType::Transaction,
            "Payment Approved",
            format!(
                "Your payment of ₹{} has been verified. {} coins have been credited to your Purchase Wallet.",
                proof.amount, proof.coins_to_credit
            ),
        )
    }

    pub fn payment_rejected(proof: &PaymentProof, reason: &ReviewReason) -> Self {
        Self::new(
            proof.user_id,
            NotificationType::Transaction,
            "Payment Rejected",
            format!(
                "Your payment of ₹{} was rejected. Reason: {}",
                proof.amount, reason
            ),
        )
    }

    pub fn crypto_deposit_approved(tx: &Transaction) -> Self {
        Self::new(
            tx.user_id,
            NotificationType::Transaction,
            "Crypto Deposit Approved",
            format!(
                "Your crypto deposit of ${} has been approved and coins credited.",
                tx.amount
            ),
        )
    }

    pub fn crypto_deposit_rejected(tx: &Transaction, reason: &ReviewReason) -> Self {
        Self::new(
            tx.user_id,
            NotificationType::Transaction,
            "Crypto Deposit Rejected",
            format!("Your crypto deposit was rejected. Reason: {reason}"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{Coins, LockAllocation, WalletType};

    #[test]
    fn test_withdrawal_rejected_message() {
        let tx = Transaction::withdrawal(
            UserId::new(),
            WalletType::Mining,
            Coins::new(200).unwrap(),
            LockAllocation::mining(200),
        );
        let reason = ReviewReason::new(Some("bank details invalid")).unwrap();
        let n = Notification::withdrawal_rejected(&tx, &reason);

        assert_eq!(n.title, "Withdrawal Rejected");
        assert_eq!(
            n.message,
            "Your withdrawal of 200 coins was rejected. Reason: bank details invalid. Coins have been refunded to your wallet."
        );
        assert_eq!(n.notification_type, NotificationType::Transaction);
        assert_eq!(n.user_id, tx.user_id);
    }

    #[test]
    fn test_payment_submitted_is_system() {
        let n = Notification::payment_submitted(UserId::new(), &Utr::new("TXN123").unwrap());
        assert_eq!(n.notification_type, NotificationType::System);
        assert!(n.message.contains("UTR: TXN123"));
    }

    #[test]
    fn test_notification_type_codes() {
        assert_eq!(NotificationType::from_id(1), Some(NotificationType::System));
        assert_eq!(
            NotificationType::from_code("transaction"),
            Some(NotificationType::Transaction)
        );
        assert_eq!(NotificationType::from_code("email"), None);
    }
}
