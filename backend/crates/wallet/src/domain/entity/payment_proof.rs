//! Payment Proof Entity
//!
//! A user's claim that they paid by bank transfer, identified by the
//! transfer's UTR. An admin verifies it against the bank statement.

use chrono::{DateTime, Utc};
use kernel::id::{AdminId, PaymentProofId, UserId};

use crate::domain::value_object::{Coins, ProofStatus, ReviewReason, Utr};
use crate::error::{WalletError, WalletResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentProof {
    pub id: PaymentProofId,
    pub user_id: UserId,
    pub utr: Utr,
    /// Paid amount in whole currency units
    pub amount: u64,
    pub coins_to_credit: u64,
    /// Opaque reference to the uploaded screenshot
    pub screenshot_ref: String,
    pub coin_package: Option<String>,
    pub created_at: DateTime<Utc>,
    pub(crate) status: ProofStatus,
    pub(crate) reviewed_by: Option<AdminId>,
    pub(crate) reviewed_at: Option<DateTime<Utc>>,
    pub(crate) rejection_reason: Option<String>,
    pub(crate) admin_notes: Option<String>,
}

impl PaymentProof {
    pub fn submit(
        user_id: UserId,
        utr: Utr,
        amount: u64,
        coins_to_credit: Coins,
        screenshot_ref: String,
        coin_package: Option<String>,
    ) -> Self {
        Self {
            id: PaymentProofId::new(),
            user_id,
            utr,
            amount,
            coins_to_credit: coins_to_credit.get(),
            screenshot_ref,
            coin_package,
            created_at: Utc::now(),
            status: ProofStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            rejection_reason: None,
            admin_notes: None,
        }
    }

    pub fn status(&self) -> ProofStatus {
        self.status
    }

    pub fn reviewed_by(&self) -> Option<AdminId> {
        self.reviewed_by
    }

    pub fn reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.reviewed_at
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    pub fn admin_notes(&self) -> Option<&str> {
        self.admin_notes.as_deref()
    }

    /// Coins to credit on approval; `None` for zero-credit proofs
    pub fn credit(&self) -> Option<Coins> {
        Coins::from_u64(self.coins_to_credit).ok()
    }

    fn ensure_pending(&self) -> WalletResult<()> {
        if self.status != ProofStatus::Pending {
            return Err(WalletError::invalid_state(
                "Payment has already been processed",
            ));
        }
        Ok(())
    }

    pub fn approve(&mut self, admin: AdminId, notes: Option<String>) -> WalletResult<()> {
        self.ensure_pending()?;
        self.status = ProofStatus::Approved;
        self.reviewed_by = Some(admin);
        self.reviewed_at = Some(Utc::now());
        if notes.is_some() {
            self.admin_notes = notes;
        }
        Ok(())
    }

    pub fn reject(&mut self, admin: AdminId, reason: &ReviewReason) -> WalletResult<()> {
        self.ensure_pending()?;
        self.status = ProofStatus::Rejected;
        self.reviewed_by = Some(admin);
        self.reviewed_at = Some(Utc::now());
        self.rejection_reason = Some(reason.as_str().to_string());
        Ok(())
    }
}
