//! Read-side queries
//!
//! Balances, transaction history, the admin review queues and the mined-coin
//! report. Nothing here writes.

use std::sync::Arc;

use kernel::id::{PaymentProofId, UserId};
use kernel::page::{Page, PageRequest};

use crate::domain::entity::{PaymentProof, Transaction, Wallet};
use crate::domain::repository::{
    MiningReportRepository, PaymentProofRepository, TransactionFilter, TransactionRepository,
    WalletRepository,
};
use crate::domain::value_object::ProofStatus;
use crate::error::{WalletError, WalletResult};

/// Mined coins as reported to dashboards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinedReport {
    pub session_total: u64,
    pub user_total: u64,
    pub displayed: u64,
}

pub struct WalletQueries<R>
where
    R: WalletRepository + TransactionRepository + PaymentProofRepository + MiningReportRepository,
{
    repo: Arc<R>,
}

impl<R> WalletQueries<R>
where
    R: WalletRepository + TransactionRepository + PaymentProofRepository + MiningReportRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// A user who never received coins sees an empty wallet
    pub async fn wallet(&self, user_id: UserId) -> WalletResult<Wallet> {
        Ok(self
            .repo
            .find_wallet(&user_id)
            .await?
            .unwrap_or_else(|| Wallet::new(user_id)))
    }

    pub async fn transactions(
        &self,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> WalletResult<Page<Transaction>> {
        self.repo.list_transactions(&filter, page).await
    }

    /// Admin withdrawal queue
    pub async fn pending_withdrawals(&self, page: PageRequest) -> WalletResult<Page<Transaction>> {
        self.repo
            .list_transactions(&TransactionFilter::pending_withdrawals(), page)
            .await
    }

    pub async fn payment_proofs(
        &self,
        status: Option<ProofStatus>,
        page: PageRequest,
    ) -> WalletResult<Page<PaymentProof>> {
        self.repo.list_proofs(status, page).await
    }

    pub async fn payment_proof(&self, id: PaymentProofId) -> WalletResult<PaymentProof> {
        self.repo
            .find_proof(&id)
            .await?
            .ok_or(WalletError::NotFound("Payment proof"))
    }

    /// Both mined aggregates and the value to display
    pub async fn mined_report(&self, user_id: Option<UserId>) -> WalletResult<MinedReport> {
        let aggregates = self.repo.mined_aggregates(user_id.as_ref()).await?;

        if aggregates.discrepancy() > 0 {
            tracing::debug!(
                user_id = ?user_id,
                session_total = aggregates.session_total,
                user_total = aggregates.user_total,
                "Mined-coin aggregates disagree"
            );
        }

        Ok(MinedReport {
            session_total: aggregates.session_total,
            user_total: aggregates.user_total,
            displayed: aggregates.displayed(),
        })
    }
}
