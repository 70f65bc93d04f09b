//! Review Withdrawal Use Case
//!
//! Admin settlement of a pending withdrawal.
//!
//! - approve: the locked coins leave the wallet for good
//! - reject: the locked coins go back to the sub-wallet(s) they came from
//!
//! The transaction update and the wallet update commit together. A second
//! review of the same transaction fails with `InvalidState` and changes
//! nothing.

use std::sync::Arc;

use kernel::id::{AdminId, TransactionId};

use crate::application::config::SettlementConfig;
use crate::application::support::{dispatch, with_retry};
use crate::domain::entity::{Notification, Transaction, Wallet};
use crate::domain::repository::{
    Changeset, NotificationSink, SettlementStore, TransactionRepository, WalletRepository,
};
use crate::domain::value_object::review::normalize_note;
use crate::domain::value_object::{ReviewReason, TransactionType, WalletType};
use crate::error::{WalletError, WalletResult};

#[derive(Debug, Clone)]
pub struct ApproveWithdrawalInput {
    pub transaction_id: TransactionId,
    pub admin_id: AdminId,
    /// Payout reference from the bank / payment provider
    pub external_transaction_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RejectWithdrawalInput {
    pub transaction_id: TransactionId,
    pub admin_id: AdminId,
    pub reason: Option<String>,
}

pub struct ReviewWithdrawalUseCase<R, N>
where
    R: WalletRepository + TransactionRepository + SettlementStore,
    N: NotificationSink,
{
    repo: Arc<R>,
    notifier: Arc<N>,
    config: Arc<SettlementConfig>,
}

impl<R, N> ReviewWithdrawalUseCase<R, N>
where
    R: WalletRepository + TransactionRepository + SettlementStore,
    N: NotificationSink,
{
    pub fn new(repo: Arc<R>, notifier: Arc<N>, config: Arc<SettlementConfig>) -> Self {
        Self {
            repo,
            notifier,
            config,
        }
    }

    pub async fn approve(&self, input: ApproveWithdrawalInput) -> WalletResult<Transaction> {
        let input = &ApproveWithdrawalInput {
            external_transaction_id: normalize_note(input.external_transaction_id),
            notes: normalize_note(input.notes),
            ..input
        };

        let transaction = with_retry(self.config.max_commit_attempts, "approve_withdrawal", move || {
            self.try_approve(input)
        })
        .await?;

        tracing::info!(
            transaction_id = %transaction.id,
            user_id = %transaction.user_id,
            admin_id = %input.admin_id,
            coins = transaction.coins,
            "Withdrawal approved"
        );

        dispatch(
            self.notifier.as_ref(),
            Notification::withdrawal_approved(&transaction),
        )
        .await;

        Ok(transaction)
    }

    pub async fn reject(&self, input: RejectWithdrawalInput) -> WalletResult<Transaction> {
        let reason = ReviewReason::new(input.reason.as_deref())?;
        let (input, reason) = (&input, &reason);

        let transaction = with_retry(self.config.max_commit_attempts, "reject_withdrawal", move || {
            self.try_reject(input, reason)
        })
        .await?;

        tracing::info!(
            transaction_id = %transaction.id,
            user_id = %transaction.user_id,
            admin_id = %input.admin_id,
            coins = transaction.coins,
            reason = %reason,
            "Withdrawal rejected and coins refunded"
        );

        dispatch(
            self.notifier.as_ref(),
            Notification::withdrawal_rejected(&transaction, reason),
        )
        .await;

        Ok(transaction)
    }

    async fn try_approve(&self, input: &ApproveWithdrawalInput) -> WalletResult<Transaction> {
        let mut transaction = self.load_pending(&input.transaction_id).await?;
        let mut wallet = self.load_wallet(&transaction).await?;

        match (transaction.wallet_type, transaction.lock_allocation) {
            (WalletType::Auto, Some(allocation)) => wallet.commit_allocation(&allocation)?,
            (wallet_type, _) => {
                wallet.commit_locked_coins(wallet_type, transaction.coin_amount()?)?
            }
        }

        transaction.complete(
            input.admin_id,
            input.external_transaction_id.clone(),
            input.notes.clone(),
        )?;

        self.repo
            .commit(
                Changeset::new()
                    .with_wallet(wallet)
                    .settle_transaction(transaction.clone()),
            )
            .await?;

        Ok(transaction)
    }

    async fn try_reject(
        &self,
        input: &RejectWithdrawalInput,
        reason: &ReviewReason,
    ) -> WalletResult<Transaction> {
        let mut transaction = self.load_pending(&input.transaction_id).await?;
        let mut wallet = self.load_wallet(&transaction).await?;

        let coins = transaction.coin_amount()?;
        match (transaction.wallet_type, transaction.lock_allocation) {
            (WalletType::Mining, _) => wallet.unlock_mining_coins(coins)?,
            (WalletType::Purchase, _) => wallet.unlock_purchase_coins(coins)?,
            (WalletType::Auto, Some(allocation)) => wallet.release_allocation(&allocation)?,
            (WalletType::Auto, None) => wallet.unlock_coins(coins)?,
        }

        transaction.fail(input.admin_id, reason)?;

        self.repo
            .commit(
                Changeset::new()
                    .with_wallet(wallet)
                    .settle_transaction(transaction.clone()),
            )
            .await?;

        Ok(transaction)
    }

    async fn load_pending(&self, id: &TransactionId) -> WalletResult<Transaction> {
        let transaction = self
            .repo
            .find_transaction(id)
            .await?
            .ok_or(WalletError::NotFound("Transaction"))?;
        transaction.ensure_reviewable(TransactionType::Withdrawal)?;
        Ok(transaction)
    }

    /// A pending withdrawal always has a wallet holding its locked coins.
    async fn load_wallet(&self, transaction: &Transaction) -> WalletResult<Wallet> {
        self.repo
            .find_wallet(&transaction.user_id)
            .await?
            .ok_or_else(|| {
                WalletError::invariant_violation(format!(
                    "No wallet for user {} of pending withdrawal {}",
                    transaction.user_id, transaction.id
                ))
            })
    }
}
