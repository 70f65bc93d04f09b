//! Submit Payment Proof Use Case
//!
//! A user reports a bank transfer (UTR + screenshot) for admin verification.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::SettlementConfig;
use crate::application::support::dispatch;
use crate::domain::entity::{Notification, PaymentProof};
use crate::domain::repository::{
    Changeset, NotificationSink, PaymentProofRepository, ProofWrite, SettlementStore,
};
use crate::domain::value_object::coins::{coins_for_amount, positive};
use crate::domain::value_object::review::normalize_note;
use crate::domain::value_object::{Coins, Utr};
use crate::error::{WalletError, WalletResult};

pub const DUPLICATE_UTR_MESSAGE: &str = "This UTR has already been submitted";

#[derive(Debug, Clone)]
pub struct SubmitPaymentProofInput {
    pub user_id: UserId,
    pub utr: String,
    pub amount: i64,
    /// Falls back to `amount * coins_per_currency_unit` when absent or ≤ 0
    pub coins_to_credit: Option<i64>,
    pub screenshot_ref: Option<String>,
    pub coin_package: Option<String>,
}

pub struct SubmitPaymentProofUseCase<R, N>
where
    R: PaymentProofRepository + SettlementStore,
    N: NotificationSink,
{
    repo: Arc<R>,
    notifier: Arc<N>,
    config: Arc<SettlementConfig>,
}

impl<R, N> SubmitPaymentProofUseCase<R, N>
where
    R: PaymentProofRepository + SettlementStore,
    N: NotificationSink,
{
    pub fn new(repo: Arc<R>, notifier: Arc<N>, config: Arc<SettlementConfig>) -> Self {
        Self {
            repo,
            notifier,
            config,
        }
    }

    pub async fn execute(&self, input: SubmitPaymentProofInput) -> WalletResult<PaymentProof> {
        let utr = Utr::new(&input.utr)?;
        let amount = positive(input.amount, "Amount")?;
        let screenshot_ref = normalize_note(input.screenshot_ref)
            .ok_or_else(|| WalletError::invalid_input("Payment screenshot is required"))?;

        if !self.config.deposit_in_range(amount) {
            return Err(WalletError::invalid_amount(format!(
                "Amount must be between {} and {}",
                self.config.min_deposit, self.config.max_deposit
            )));
        }

        let coins = match input.coins_to_credit {
            Some(c) if c > 0 => Coins::new(c)?,
            _ => coins_for_amount(amount, self.config.coins_per_currency_unit)?,
        };

        // checked again by the store's unique index
        if self.repo.exists_by_utr(&utr).await? {
            return Err(WalletError::DuplicateReference(DUPLICATE_UTR_MESSAGE.into()));
        }

        let proof = PaymentProof::submit(
            input.user_id,
            utr,
            amount,
            coins,
            screenshot_ref,
            normalize_note(input.coin_package),
        );

        self.repo
            .commit(Changeset::new().with_proof(ProofWrite::Insert(proof.clone())))
            .await?;

        tracing::info!(
            proof_id = %proof.id,
            user_id = %proof.user_id,
            utr = %proof.utr,
            amount = proof.amount,
            coins_to_credit = proof.coins_to_credit,
            "Payment proof submitted"
        );

        dispatch(
            self.notifier.as_ref(),
            Notification::payment_submitted(proof.user_id, &proof.utr),
        )
        .await;

        Ok(proof)
    }
}
