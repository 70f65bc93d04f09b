//! Crypto Deposit Use Cases
//!
//! A user records an on-chain transfer sent through one of the active
//! crypto networks; an admin later approves it, which credits the purchase
//! wallet, or rejects it.

use std::sync::Arc;

use kernel::id::{AdminId, CryptoNetworkId, TransactionId, UserId};

use crate::application::config::SettlementConfig;
use crate::application::support::{dispatch, required_reference, with_retry};
use crate::domain::entity::{Notification, Transaction, Wallet};
use crate::domain::repository::{
    Changeset, CryptoNetworkRepository, NotificationSink, SettlementStore, TransactionRepository,
    WalletRepository,
};
use crate::domain::value_object::coins::{coins_for_amount, positive};
use crate::domain::value_object::review::normalize_note;
use crate::domain::value_object::{Coins, ReviewReason, TransactionType};
use crate::error::{WalletError, WalletResult};

#[derive(Debug, Clone)]
pub struct RecordCryptoDepositInput {
    pub user_id: UserId,
    /// Whole currency units (USD)
    pub amount: i64,
    /// Falls back to `amount * coins_per_currency_unit` when absent or ≤ 0
    pub coins: Option<i64>,
    pub network_id: CryptoNetworkId,
    pub tx_hash: String,
}

#[derive(Debug, Clone)]
pub struct ApproveCryptoDepositInput {
    pub transaction_id: TransactionId,
    pub admin_id: AdminId,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RejectCryptoDepositInput {
    pub transaction_id: TransactionId,
    pub admin_id: AdminId,
    pub reason: Option<String>,
}

pub struct CryptoDepositUseCase<R, N>
where
    R: WalletRepository + TransactionRepository + CryptoNetworkRepository + SettlementStore,
    N: NotificationSink,
{
    repo: Arc<R>,
    notifier: Arc<N>,
    config: Arc<SettlementConfig>,
}

impl<R, N> CryptoDepositUseCase<R, N>
where
    R: WalletRepository + TransactionRepository + CryptoNetworkRepository + SettlementStore,
    N: NotificationSink,
{
    pub fn new(repo: Arc<R>, notifier: Arc<N>, config: Arc<SettlementConfig>) -> Self {
        Self {
            repo,
            notifier,
            config,
        }
    }

    /// Record a pending deposit; nothing is credited yet
    pub async fn record(&self, input: RecordCryptoDepositInput) -> WalletResult<Transaction> {
        let amount = positive(input.amount, "Deposit amount")?;
        let tx_hash = required_reference(&input.tx_hash, "Transaction hash")?;

        let network = self
            .repo
            .find_network(&input.network_id)
            .await?
            .ok_or(WalletError::NotFound("Crypto network"))?;
        network.ensure_accepts_deposits()?;

        let coins = match input.coins {
            Some(c) if c > 0 => Coins::new(c)?,
            _ => coins_for_amount(amount, self.config.coins_per_currency_unit)?,
        };

        let transaction = Transaction::crypto_deposit(input.user_id, amount, coins, &network, tx_hash);

        self.repo
            .commit(Changeset::new().insert_transaction(transaction.clone()))
            .await?;

        tracing::info!(
            transaction_id = %transaction.id,
            user_id = %transaction.user_id,
            network_id = %network.id,
            network = %network.name,
            tx_hash,
            amount,
            coins = coins.get(),
            "Crypto deposit recorded"
        );

        Ok(transaction)
    }

    pub async fn approve(&self, input: ApproveCryptoDepositInput) -> WalletResult<Transaction> {
        let input = &ApproveCryptoDepositInput {
            notes: normalize_note(input.notes),
            ..input
        };

        let transaction = with_retry(
            self.config.max_commit_attempts,
            "approve_crypto_deposit",
            move || self.try_approve(input),
        )
        .await?;

        tracing::info!(
            transaction_id = %transaction.id,
            user_id = %transaction.user_id,
            admin_id = %input.admin_id,
            coins = transaction.coins,
            "Crypto deposit approved"
        );

        dispatch(
            self.notifier.as_ref(),
            Notification::crypto_deposit_approved(&transaction),
        )
        .await;

        Ok(transaction)
    }

    pub async fn reject(&self, input: RejectCryptoDepositInput) -> WalletResult<Transaction> {
        let reason = ReviewReason::new(input.reason.as_deref())?;

        let mut transaction = self.load_pending(&input.transaction_id).await?;
        transaction.fail(input.admin_id, &reason)?;

        self.repo
            .commit(Changeset::new().settle_transaction(transaction.clone()))
            .await?;

        tracing::info!(
            transaction_id = %transaction.id,
            user_id = %transaction.user_id,
            admin_id = %input.admin_id,
            reason = %reason,
            "Crypto deposit rejected"
        );

        dispatch(
            self.notifier.as_ref(),
            Notification::crypto_deposit_rejected(&transaction, &reason),
        )
        .await;

        Ok(transaction)
    }

    async fn try_approve(&self, input: &ApproveCryptoDepositInput) -> WalletResult<Transaction> {
        let mut transaction = self.load_pending(&input.transaction_id).await?;

        let mut wallet = self
            .repo
            .find_wallet(&transaction.user_id)
            .await?
            .unwrap_or_else(|| Wallet::new(transaction.user_id));
        wallet.add_purchase_coins(transaction.coin_amount()?)?;

        transaction.complete(input.admin_id, None, input.notes.clone())?;

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
        transaction.ensure_reviewable(TransactionType::CryptoDeposit)?;
        Ok(transaction)
    }
}
