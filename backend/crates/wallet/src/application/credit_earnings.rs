//! Credit Earnings Use Case
//!
//! Credits produced outside the wallet: finished mining sessions and
//! referral bonuses. Both land in the mining (earned) sub-wallet and are
//! recorded as completed transactions whose reference makes a replay fail
//! with `DuplicateReference`.

use std::sync::Arc;

use kernel::id::{AdminId, UserId};

use crate::application::config::SettlementConfig;
use crate::application::support::{required_reference, with_retry};
use crate::domain::entity::{Transaction, Wallet};
use crate::domain::repository::{Changeset, SettlementStore, WalletRepository};
use crate::domain::value_object::Coins;
use crate::error::{WalletError, WalletResult};

#[derive(Debug, Clone)]
pub struct MiningSessionCompletedInput {
    pub user_id: UserId,
    pub session_id: String,
    pub earned_coins: i64,
}

#[derive(Debug, Clone)]
pub struct ReferralBonusInput {
    pub referrer_id: UserId,
    pub referral_id: String,
    pub coins: i64,
    pub admin_id: AdminId,
}

pub struct CreditEarningsUseCase<R>
where
    R: WalletRepository + SettlementStore,
{
    repo: Arc<R>,
    config: Arc<SettlementConfig>,
}

impl<R> CreditEarningsUseCase<R>
where
    R: WalletRepository + SettlementStore,
{
    pub fn new(repo: Arc<R>, config: Arc<SettlementConfig>) -> Self {
        Self { repo, config }
    }

    /// Returns `None` when the session earned nothing.
    pub async fn mining_session_completed(
        &self,
        input: MiningSessionCompletedInput,
    ) -> WalletResult<Option<Transaction>> {
        let session_id = required_reference(&input.session_id, "Session id")?;
        if input.earned_coins < 0 {
            return Err(WalletError::invalid_amount("Earned coins must not be negative"));
        }
        if input.earned_coins == 0 {
            tracing::debug!(user_id = %input.user_id, session_id, "Mining session earned nothing");
            return Ok(None);
        }
        let coins = Coins::new(input.earned_coins)?;
        let user_id = input.user_id;

        let transaction = with_retry(self.config.max_commit_attempts, "mining_reward", move || {
            self.credit(user_id, Transaction::mining_reward(user_id, coins, session_id), move |w| {
                w.add_mining_coins(coins)
            })
        })
        .await?;

        tracing::info!(
            user_id = %user_id,
            session_id,
            coins = coins.get(),
            transaction_id = %transaction.id,
            "Mining reward credited"
        );

        Ok(Some(transaction))
    }

    pub async fn referral_bonus(&self, input: ReferralBonusInput) -> WalletResult<Transaction> {
        let referral_id = required_reference(&input.referral_id, "Referral id")?;
        let coins = Coins::new(input.coins)?;
        let (user_id, admin_id) = (input.referrer_id, input.admin_id);

        let transaction = with_retry(self.config.max_commit_attempts, "referral_bonus", move || {
            self.credit(
                user_id,
                Transaction::referral_bonus(user_id, coins, referral_id, admin_id),
                move |w| w.credit_referral(coins),
            )
        })
        .await?;

        tracing::info!(
            user_id = %user_id,
            referral_id,
            admin_id = %admin_id,
            coins = coins.get(),
            "Referral bonus credited"
        );

        Ok(transaction)
    }

    async fn credit(
        &self,
        user_id: UserId,
        transaction: Transaction,
        apply: impl FnOnce(&mut Wallet) -> WalletResult<()>,
    ) -> WalletResult<Transaction> {
        let mut wallet = self
            .repo
            .find_wallet(&user_id)
            .await?
            .unwrap_or_else(|| Wallet::new(user_id));
        apply(&mut wallet)?;

        self.repo
            .commit(
                Changeset::new()
                    .with_wallet(wallet)
                    .insert_transaction(transaction.clone()),
            )
            .await?;

        Ok(transaction)
    }
}
