//! Review Payment Proof Use Case
//!
//! Approval credits the purchase wallet and records a completed purchase;
//! proof update, wallet credit and transaction insert commit together.
//! Rejection only closes the proof.

use std::sync::Arc;

use kernel::id::{AdminId, PaymentProofId};

use crate::application::config::SettlementConfig;
use crate::application::support::{dispatch, with_retry};
use crate::domain::entity::{Notification, PaymentProof, Transaction, Wallet};
use crate::domain::repository::{
    Changeset, NotificationSink, PaymentProofRepository, ProofWrite, SettlementStore,
    WalletRepository,
};
use crate::domain::value_object::ReviewReason;
use crate::domain::value_object::review::normalize_note;
use crate::error::{WalletError, WalletResult};

#[derive(Debug, Clone)]
pub struct ApprovePaymentInput {
    pub proof_id: PaymentProofId,
    pub admin_id: AdminId,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RejectPaymentInput {
    pub proof_id: PaymentProofId,
    pub admin_id: AdminId,
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApprovePaymentOutput {
    pub proof: PaymentProof,
    /// Absent for zero-credit proofs
    pub transaction: Option<Transaction>,
}

pub struct ReviewPaymentProofUseCase<R, N>
where
    R: WalletRepository + PaymentProofRepository + SettlementStore,
    N: NotificationSink,
{
    repo: Arc<R>,
    notifier: Arc<N>,
    config: Arc<SettlementConfig>,
}

impl<R, N> ReviewPaymentProofUseCase<R, N>
where
    R: WalletRepository + PaymentProofRepository + SettlementStore,
    N: NotificationSink,
{
    pub fn new(repo: Arc<R>, notifier: Arc<N>, config: Arc<SettlementConfig>) -> Self {
        Self {
            repo,
            notifier,
            config,
        }
    }

    pub async fn approve(&self, input: ApprovePaymentInput) -> WalletResult<ApprovePaymentOutput> {
        let input = &ApprovePaymentInput {
            notes: normalize_note(input.notes),
            ..input
        };

        let output = with_retry(self.config.max_commit_attempts, "approve_payment", move || {
            self.try_approve(input)
        })
        .await?;

        tracing::info!(
            proof_id = %output.proof.id,
            user_id = %output.proof.user_id,
            admin_id = %input.admin_id,
            coins = output.proof.coins_to_credit,
            transaction_id = ?output.transaction.as_ref().map(|t| t.id),
            "Payment approved and coins credited to purchase wallet"
        );

        dispatch(
            self.notifier.as_ref(),
            Notification::payment_approved(&output.proof),
        )
        .await;

        Ok(output)
    }

    pub async fn reject(&self, input: RejectPaymentInput) -> WalletResult<PaymentProof> {
        let reason = ReviewReason::new(input.reason.as_deref())?;

        let mut proof = self.load(&input.proof_id).await?;
        proof.reject(input.admin_id, &reason)?;

        self.repo
            .commit(Changeset::new().with_proof(ProofWrite::Review(proof.clone())))
            .await?;

        tracing::info!(
            proof_id = %proof.id,
            user_id = %proof.user_id,
            admin_id = %input.admin_id,
            reason = %reason,
            "Payment rejected"
        );

        dispatch(
            self.notifier.as_ref(),
            Notification::payment_rejected(&proof, &reason),
        )
        .await;

        Ok(proof)
    }

    async fn try_approve(&self, input: &ApprovePaymentInput) -> WalletResult<ApprovePaymentOutput> {
        let mut proof = self.load(&input.proof_id).await?;
        proof.approve(input.admin_id, input.notes.clone())?;

        let mut changeset = Changeset::new();
        let mut transaction = None;

        if let Some(coins) = proof.credit() {
            let mut wallet = self
                .repo
                .find_wallet(&proof.user_id)
                .await?
                .unwrap_or_else(|| Wallet::new(proof.user_id));
            wallet.add_purchase_coins(coins)?;

            let tx = Transaction::purchase_credit(&proof, coins, input.admin_id);
            changeset = changeset.with_wallet(wallet).insert_transaction(tx.clone());
            transaction = Some(tx);
        }

        self.repo
            .commit(changeset.with_proof(ProofWrite::Review(proof.clone())))
            .await?;

        Ok(ApprovePaymentOutput { proof, transaction })
    }

    async fn load(&self, id: &PaymentProofId) -> WalletResult<PaymentProof> {
        self.repo
            .find_proof(id)
            .await?
            .ok_or(WalletError::NotFound("Payment proof"))
    }
}
