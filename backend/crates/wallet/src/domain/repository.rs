//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer (PostgreSQL and in-memory).
//!
//! Reads go through the per-aggregate repositories. Writes never do: a use
//! case decides everything in memory and hands one [`Changeset`] to
//! [`SettlementStore::commit`], which applies all of it or none of it.

use kernel::id::{CryptoNetworkId, PaymentProofId, TransactionId, UserId};
use kernel::page::{Page, PageRequest};

use crate::domain::entity::{CryptoNetwork, Notification, PaymentProof, Transaction, Wallet};
use crate::domain::value_object::{ProofStatus, TransactionStatus, TransactionType, Utr};
use crate::error::WalletResult;

/// Wallet reads
#[trait_variant::make(WalletRepository: Send)]
pub trait LocalWalletRepository {
    /// Find the wallet of a user
    async fn find_wallet(&self, user_id: &UserId) -> WalletResult<Option<Wallet>>;
}

/// Transaction reads
#[trait_variant::make(TransactionRepository: Send)]
pub trait LocalTransactionRepository {
    /// Find transaction by ID
    async fn find_transaction(&self, id: &TransactionId) -> WalletResult<Option<Transaction>>;

    /// List transactions, newest first
    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> WalletResult<Page<Transaction>>;
}

/// Payment proof reads
#[trait_variant::make(PaymentProofRepository: Send)]
pub trait LocalPaymentProofRepository {
    /// Find proof by ID
    async fn find_proof(&self, id: &PaymentProofId) -> WalletResult<Option<PaymentProof>>;

    /// Check if a UTR was already submitted
    async fn exists_by_utr(&self, utr: &Utr) -> WalletResult<bool>;

    /// List proofs, newest first
    async fn list_proofs(
        &self,
        status: Option<ProofStatus>,
        page: PageRequest,
    ) -> WalletResult<Page<PaymentProof>>;
}

/// Mined-coins aggregates for reporting
#[trait_variant::make(MiningReportRepository: Send)]
pub trait LocalMiningReportRepository {
    /// Both aggregates, for one user or across all users
    async fn mined_aggregates(&self, user_id: Option<&UserId>) -> WalletResult<MinedAggregates>;
}

/// Crypto deposit network registry
///
/// Administrative configuration, written directly rather than through a
/// [`Changeset`].
#[trait_variant::make(CryptoNetworkRepository: Send)]
pub trait LocalCryptoNetworkRepository {
    async fn find_network(&self, id: &CryptoNetworkId) -> WalletResult<Option<CryptoNetwork>>;

    /// Newest first
    async fn list_networks(&self, active_only: bool) -> WalletResult<Vec<CryptoNetwork>>;

    /// Insert or replace by id
    async fn save_network(&self, network: &CryptoNetwork) -> WalletResult<()>;

    /// Returns `false` when nothing was deleted
    async fn delete_network(&self, id: &CryptoNetworkId) -> WalletResult<bool>;
}

/// Atomic write side
#[trait_variant::make(SettlementStore: Send)]
pub trait LocalSettlementStore {
    /// Apply every write in `changeset` in one storage transaction
    ///
    /// ## Errors
    /// * `InvalidState` - a settled transaction or reviewed proof was no
    ///   longer pending
    /// * `ConcurrentModification` - the wallet version moved since it was read
    /// * `DuplicateReference` - utr or (type, reference) already stored
    async fn commit(&self, changeset: Changeset) -> WalletResult<()>;
}

/// Outbound notification delivery
#[trait_variant::make(NotificationSink: Send)]
pub trait LocalNotificationSink {
    async fn notify(&self, notification: &Notification) -> WalletResult<()>;
}

/// Everything the settlement use cases need from storage
pub trait SettlementRepository:
    WalletRepository
    + TransactionRepository
    + PaymentProofRepository
    + MiningReportRepository
    + CryptoNetworkRepository
    + SettlementStore
{
}

impl<T> SettlementRepository for T where
    T: WalletRepository
        + TransactionRepository
        + PaymentProofRepository
        + MiningReportRepository
        + CryptoNetworkRepository
        + SettlementStore
{
}

// ============================================================================
// Write model
// ============================================================================

/// Transaction write
#[derive(Debug, Clone)]
pub enum TransactionWrite {
    /// New record
    Insert(Transaction),
    /// Terminal transition; applies only while the stored row is pending
    Settle(Transaction),
}

/// Payment proof write
#[derive(Debug, Clone)]
pub enum ProofWrite {
    Insert(PaymentProof),
    /// Review outcome; applies only while the stored row is pending
    Review(PaymentProof),
}

/// One unit of work
///
/// `wallet` carries the version it was read at; the store bumps it.
#[derive(Debug, Clone, Default)]
pub struct Changeset {
    pub wallet: Option<Wallet>,
    pub transactions: Vec<TransactionWrite>,
    pub proof: Option<ProofWrite>,
}

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wallet(mut self, wallet: Wallet) -> Self {
        self.wallet = Some(wallet);
        self
    }

    pub fn insert_transaction(mut self, tx: Transaction) -> Self {
        self.transactions.push(TransactionWrite::Insert(tx));
        self
    }

    pub fn settle_transaction(mut self, tx: Transaction) -> Self {
        self.transactions.push(TransactionWrite::Settle(tx));
        self
    }

    pub fn with_proof(mut self, write: ProofWrite) -> Self {
        self.proof = Some(write);
        self
    }
}

// ============================================================================
// Query model
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub user_id: Option<UserId>,
    pub transaction_type: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
}

impl TransactionFilter {
    pub fn pending_withdrawals() -> Self {
        Self {
            user_id: None,
            transaction_type: Some(TransactionType::Withdrawal),
            status: Some(TransactionStatus::Pending),
        }
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.user_id.is_none_or(|u| u == tx.user_id)
            && self.transaction_type.is_none_or(|t| t == tx.transaction_type)
            && self.status.is_none_or(|s| s == tx.status())
    }
}

/// The two independently maintained mined-coin totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinedAggregates {
    /// Sum over completed mining sessions
    pub session_total: u64,
    /// Sum of per-user running totals
    pub user_total: u64,
}
