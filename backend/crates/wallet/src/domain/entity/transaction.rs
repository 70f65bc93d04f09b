//! Transaction Entity
//!
//! Ledger record of one money movement. Withdrawals and crypto deposits are
//! created `pending` and settled by an admin; everything else is recorded
//! already `completed`.

use chrono::{DateTime, Utc};
use kernel::id::{AdminId, CryptoNetworkId, PaymentProofId, TransactionId, UserId};

use crate::domain::entity::crypto_network::CryptoNetwork;
use crate::domain::entity::payment_proof::PaymentProof;
use crate::domain::value_object::{
    Coins, LockAllocation, ReviewReason, TransactionStatus, TransactionType, WalletType,
};
use crate::error::{WalletError, WalletResult};

/// Ledger transaction
///
/// Lifecycle fields are private so that only [`Transaction::complete`] and
/// [`Transaction::fail`] can move a record out of `pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub transaction_type: TransactionType,
    /// Currency units for purchases and crypto deposits, coins otherwise
    pub amount: u64,
    pub coins: u64,
    pub wallet_type: WalletType,
    /// Per-sub-wallet split of a withdrawal lock
    pub lock_allocation: Option<LockAllocation>,
    pub description: Option<String>,
    /// Mining session id, crypto tx hash or referral id; unique per type
    pub reference: Option<String>,
    pub payment_proof_id: Option<PaymentProofId>,
    /// Network a crypto deposit was sent through
    pub crypto_network_id: Option<CryptoNetworkId>,
    pub created_at: DateTime<Utc>,
    pub(crate) status: TransactionStatus,
    pub(crate) processed_at: Option<DateTime<Utc>>,
    pub(crate) processed_by: Option<AdminId>,
    pub(crate) failure_reason: Option<String>,
    pub(crate) external_transaction_id: Option<String>,
    pub(crate) admin_notes: Option<String>,
}

impl Transaction {
    /// Longest accepted `reference`, matching the storage column
    pub const MAX_REFERENCE_LEN: usize = 128;

    fn base(
        user_id: UserId,
        transaction_type: TransactionType,
        amount: u64,
        coins: u64,
        wallet_type: WalletType,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            user_id,
            transaction_type,
            amount,
            coins,
            wallet_type,
            lock_allocation: None,
            description: None,
            reference: None,
            payment_proof_id: None,
            crypto_network_id: None,
            created_at: Utc::now(),
            status: TransactionStatus::Pending,
            processed_at: None,
            processed_by: None,
            failure_reason: None,
            external_transaction_id: None,
            admin_notes: None,
        }
    }

    fn completed_now(mut self, processed_by: Option<AdminId>) -> Self {
        self.status = TransactionStatus::Completed;
        self.processed_at = Some(self.created_at);
        self.processed_by = processed_by;
        self
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    /// Pending payout holding `allocation` locked coins
    pub fn withdrawal(
        user_id: UserId,
        wallet_type: WalletType,
        coins: Coins,
        allocation: LockAllocation,
    ) -> Self {
        let mut tx = Self::base(
            user_id,
            TransactionType::Withdrawal,
            coins.get(),
            coins.get(),
            wallet_type,
        );
        tx.lock_allocation = Some(allocation);
        tx.description = Some(format!("Withdrawal of {} coins", coins));
        tx
    }

    /// Completed purchase created when a payment proof is approved
    pub fn purchase_credit(proof: &PaymentProof, coins: Coins, approved_by: AdminId) -> Self {
        let mut tx = Self::base(
            proof.user_id,
            TransactionType::Purchase,
            proof.amount,
            coins.get(),
            WalletType::Purchase,
        );
        tx.description = Some(format!("Coin purchase - {} coins", coins));
        tx.payment_proof_id = Some(proof.id);
        tx.completed_now(Some(approved_by))
    }

    /// Pending on-chain deposit; `tx_hash` is the unique reference
    pub fn crypto_deposit(
        user_id: UserId,
        amount: u64,
        coins: Coins,
        network: &CryptoNetwork,
        tx_hash: &str,
    ) -> Self {
        let mut tx = Self::base(
            user_id,
            TransactionType::CryptoDeposit,
            amount,
            coins.get(),
            WalletType::Purchase,
        );
        tx.description = Some(format!(
            "Crypto deposit - {} via {} ({})",
            network.symbol, network.name, network.network
        ));
        tx.crypto_network_id = Some(network.id);
        tx.reference = Some(tx_hash.to_string());
        tx
    }

    /// Completed mining reward for one session
    pub fn mining_reward(user_id: UserId, coins: Coins, session_id: &str) -> Self {
        let mut tx = Self::base(
            user_id,
            TransactionType::Mining,
            coins.get(),
            coins.get(),
            WalletType::Mining,
        );
        tx.description = Some(format!("Mining reward - {} coins", coins));
        tx.reference = Some(session_id.to_string());
        tx.completed_now(None)
    }

    /// Completed referral bonus, credited to the earned wallet
    pub fn referral_bonus(
        user_id: UserId,
        coins: Coins,
        referral_id: &str,
        granted_by: AdminId,
    ) -> Self {
        let mut tx = Self::base(
            user_id,
            TransactionType::Referral,
            coins.get(),
            coins.get(),
            WalletType::Mining,
        );
        tx.description = Some(format!("Referral bonus - {} coins", coins));
        tx.reference = Some(referral_id.to_string());
        tx.completed_now(Some(granted_by))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn processed_at(&self) -> Option<DateTime<Utc>> {
        self.processed_at
    }

    pub fn processed_by(&self) -> Option<AdminId> {
        self.processed_by
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    pub fn external_transaction_id(&self) -> Option<&str> {
        self.external_transaction_id.as_deref()
    }

    pub fn admin_notes(&self) -> Option<&str> {
        self.admin_notes.as_deref()
    }

    /// `coins` as a positive amount; legacy zero rows are an invariant breach
    pub fn coin_amount(&self) -> WalletResult<Coins> {
        Coins::from_u64(self.coins).map_err(|_| {
            WalletError::invariant_violation(format!("Transaction {} carries no coins", self.id))
        })
    }

    // ========================================================================
    // State machine
    // ========================================================================

    /// Admin may act on this record as `expected`
    pub fn ensure_reviewable(&self, expected: TransactionType) -> WalletResult<()> {
        if self.transaction_type != expected {
            return Err(WalletError::invalid_state(format!(
                "Transaction is not a {expected}"
            )));
        }
        if self.status != TransactionStatus::Pending {
            return Err(WalletError::invalid_state(
                "Transaction has already been processed",
            ));
        }
        Ok(())
    }

    /// pending → completed
    pub fn complete(
        &mut self,
        admin: AdminId,
        external_transaction_id: Option<String>,
        notes: Option<String>,
    ) -> WalletResult<()> {
        self.ensure_reviewable(self.transaction_type)?;
        self.status = TransactionStatus::Completed;
        self.processed_at = Some(Utc::now());
        self.processed_by = Some(admin);
        if external_transaction_id.is_some() {
            self.external_transaction_id = external_transaction_id;
        }
        if notes.is_some() {
            self.admin_notes = notes;
        }
        Ok(())
    }

    /// pending → failed
    pub fn fail(&mut self, admin: AdminId, reason: &ReviewReason) -> WalletResult<()> {
        self.ensure_reviewable(self.transaction_type)?;
        self.status = TransactionStatus::Failed;
        self.processed_at = Some(Utc::now());
        self.processed_by = Some(admin);
        self.failure_reason = Some(reason.as_str().to_string());
        Ok(())
    }
}
