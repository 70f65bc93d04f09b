//! Request Withdrawal Use Case
//!
//! Locks the requested coins and records a pending withdrawal in one commit.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::SettlementConfig;
use crate::application::support::with_retry;
use crate::domain::entity::{Transaction, Wallet};
use crate::domain::repository::{Changeset, SettlementStore, WalletRepository};
use crate::domain::value_object::{Coins, WalletType};
use crate::error::WalletResult;

/// Input DTO for a withdrawal request
#[derive(Debug, Clone)]
pub struct RequestWithdrawalInput {
    pub user_id: UserId,
    pub wallet_type: WalletType,
    pub coins: i64,
}

/// Output DTO for a withdrawal request
#[derive(Debug, Clone)]
pub struct RequestWithdrawalOutput {
    pub transaction: Transaction,
    pub wallet: Wallet,
}

pub struct RequestWithdrawalUseCase<R>
where
    R: WalletRepository + SettlementStore,
{
    repo: Arc<R>,
    config: Arc<SettlementConfig>,
}

impl<R> RequestWithdrawalUseCase<R>
where
    R: WalletRepository + SettlementStore,
{
    pub fn new(repo: Arc<R>, config: Arc<SettlementConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: RequestWithdrawalInput) -> WalletResult<RequestWithdrawalOutput> {
        let coins = Coins::new(input.coins)?;
        let input = &input;

        with_retry(self.config.max_commit_attempts, "request_withdrawal", move || {
            self.attempt(input, coins)
        })
        .await
    }

    async fn attempt(
        &self,
        input: &RequestWithdrawalInput,
        coins: Coins,
    ) -> WalletResult<RequestWithdrawalOutput> {
        // A user without a wallet has nothing to lock; the lock below reports it.
        let mut wallet = self
            .repo
            .find_wallet(&input.user_id)
            .await?
            .unwrap_or_else(|| Wallet::new(input.user_id));

        let allocation = wallet.lock_coins(input.wallet_type, coins).inspect_err(|e| {
            tracing::info!(
                user_id = %input.user_id,
                wallet_type = %input.wallet_type,
                coins = coins.get(),
                error = %e,
                "Withdrawal request refused"
            );
        })?;

        let transaction = Transaction::withdrawal(input.user_id, input.wallet_type, coins, allocation);

        self.repo
            .commit(
                Changeset::new()
                    .with_wallet(wallet.clone())
                    .insert_transaction(transaction.clone()),
            )
            .await?;
        wallet.mark_committed();

        tracing::info!(
            user_id = %input.user_id,
            transaction_id = %transaction.id,
            wallet_type = %input.wallet_type,
            coins = coins.get(),
            locked_mining = allocation.mining,
            locked_purchase = allocation.purchase,
            "Withdrawal requested"
        );

        Ok(RequestWithdrawalOutput {
            transaction,
            wallet,
        })
    }
}
