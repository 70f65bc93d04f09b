//! In-memory Repository Implementations
//!
//! Same commit semantics as the PostgreSQL store: every guard of a
//! changeset is checked under one lock before anything is applied.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::{CryptoNetworkId, PaymentProofId, TransactionId, UserId};
use kernel::page::{Page, PageRequest};
use tokio::sync::Mutex;

use crate::application::DUPLICATE_UTR_MESSAGE;
use crate::domain::entity::{CryptoNetwork, Notification, PaymentProof, Transaction, Wallet};
use crate::domain::repository::{
    Changeset, CryptoNetworkRepository, MinedAggregates, MiningReportRepository, NotificationSink, PaymentProofRepository,
    ProofWrite, SettlementStore, TransactionFilter, TransactionRepository, TransactionWrite,
    WalletRepository,
};
use crate::domain::value_object::{ProofStatus, TransactionStatus, TransactionType, Utr};
use crate::error::{WalletError, WalletResult};
use crate::infra::duplicate_reference_message;

#[derive(Default)]
struct State {
    wallets: HashMap<UserId, Wallet>,
    transactions: HashMap<TransactionId, Transaction>,
    proofs: HashMap<PaymentProofId, PaymentProof>,
    networks: HashMap<CryptoNetworkId, CryptoNetwork>,
    /// Commits still to be refused with `ConcurrentModification`
    injected_conflicts: u32,
}

impl State {
    fn check(&self, changeset: &Changeset) -> WalletResult<()> {
        for write in &changeset.transactions {
            match write {
                TransactionWrite::Settle(t) => {
                    let pending = self
                        .transactions
                        .get(&t.id)
                        .is_some_and(|stored| stored.status() == TransactionStatus::Pending);
                    if !pending {
                        return Err(WalletError::invalid_state(
                            "Transaction has already been processed",
                        ));
                    }
                }
                TransactionWrite::Insert(t) => {
                    let taken = t.reference.as_deref().is_some_and(|reference| {
                        self.transactions.values().any(|stored| {
                            stored.transaction_type == t.transaction_type
                                && stored.reference.as_deref() == Some(reference)
                        })
                    });
                    if taken || self.transactions.contains_key(&t.id) {
                        return Err(WalletError::DuplicateReference(
                            duplicate_reference_message(t.transaction_type).to_string(),
                        ));
                    }
                }
            }
        }

        match &changeset.proof {
            Some(ProofWrite::Insert(p)) => {
                if self.proofs.values().any(|stored| stored.utr == p.utr) {
                    return Err(WalletError::DuplicateReference(DUPLICATE_UTR_MESSAGE.into()));
                }
            }
            Some(ProofWrite::Review(p)) => {
                let pending = self
                    .proofs
                    .get(&p.id)
                    .is_some_and(|stored| stored.status() == ProofStatus::Pending);
                if !pending {
                    return Err(WalletError::invalid_state("Payment has already been processed"));
                }
            }
            None => {}
        }

        if let Some(wallet) = &changeset.wallet {
            let stored_version = self.wallets.get(&wallet.user_id()).map_or(0, Wallet::version);
            if stored_version != wallet.version() {
                return Err(WalletError::ConcurrentModification);
            }
        }

        Ok(())
    }

    fn apply(&mut self, changeset: Changeset) {
        for write in changeset.transactions {
            let (TransactionWrite::Insert(t) | TransactionWrite::Settle(t)) = write;
            self.transactions.insert(t.id, t);
        }

        if let Some(ProofWrite::Insert(p) | ProofWrite::Review(p)) = changeset.proof {
            self.proofs.insert(p.id, p);
        }

        if let Some(mut wallet) = changeset.wallet {
            wallet.mark_committed();
            self.wallets.insert(wallet.user_id(), wallet);
        }
    }
}

/// In-memory settlement repository for tests and local runs
#[derive(Clone, Default)]
pub struct MemorySettlementRepository {
    state: Arc<Mutex<State>>,
}

impl MemorySettlementRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse the next `count` commits as if another writer got there first
    pub async fn inject_conflicts(&self, count: u32) {
        self.state.lock().await.injected_conflicts = count;
    }

    /// Store a wallet as-is, bypassing the version check
    pub async fn seed_wallet(&self, mut wallet: Wallet) {
        if !wallet.is_persisted() {
            wallet.mark_committed();
        }
        self.state.lock().await.wallets.insert(wallet.user_id(), wallet);
    }

    /// Store a transaction as-is
    pub async fn seed_transaction(&self, transaction: Transaction) {
        self.state
            .lock()
            .await
            .transactions
            .insert(transaction.id, transaction);
    }

    pub async fn transaction_count(&self) -> usize {
        self.state.lock().await.transactions.len()
    }
}

impl WalletRepository for MemorySettlementRepository {
    async fn find_wallet(&self, user_id: &UserId) -> WalletResult<Option<Wallet>> {
        Ok(self.state.lock().await.wallets.get(user_id).cloned())
    }
}

impl TransactionRepository for MemorySettlementRepository {
    async fn find_transaction(&self, id: &TransactionId) -> WalletResult<Option<Transaction>> {
        Ok(self.state.lock().await.transactions.get(id).cloned())
    }

    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> WalletResult<Page<Transaction>> {
        let state = self.state.lock().await;
        let matching: Vec<Transaction> = state
            .transactions
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        Ok(paginate(matching, page, |t| (t.created_at, *t.id.as_uuid())))
    }
}

impl PaymentProofRepository for MemorySettlementRepository {
    async fn find_proof(&self, id: &PaymentProofId) -> WalletResult<Option<PaymentProof>> {
        Ok(self.state.lock().await.proofs.get(id).cloned())
    }

    async fn exists_by_utr(&self, utr: &Utr) -> WalletResult<bool> {
        Ok(self
            .state
            .lock()
            .await
            .proofs
            .values()
            .any(|p| &p.utr == utr))
    }

    async fn list_proofs(
        &self,
        status: Option<ProofStatus>,
        page: PageRequest,
    ) -> WalletResult<Page<PaymentProof>> {
        let state = self.state.lock().await;
        let matching: Vec<PaymentProof> = state
            .proofs
            .values()
            .filter(|p| status.is_none_or(|s| s == p.status()))
            .cloned()
            .collect();
        Ok(paginate(matching, page, |p| (p.created_at, *p.id.as_uuid())))
    }
}

impl MiningReportRepository for MemorySettlementRepository {
    async fn mined_aggregates(&self, user_id: Option<&UserId>) -> WalletResult<MinedAggregates> {
        let state = self.state.lock().await;
        let selected = |owner: &UserId| user_id.is_none_or(|u| u == owner);

        let session_total = state
            .transactions
            .values()
            .filter(|t| {
                t.transaction_type == TransactionType::Mining
                    && t.status() == TransactionStatus::Completed
                    && selected(&t.user_id)
            })
            .map(|t| t.coins)
            .sum();
        let user_total = state
            .wallets
            .values()
            .filter(|w| selected(&w.user_id()))
            .map(Wallet::total_mined)
            .sum();

        Ok(MinedAggregates {
            session_total,
            user_total,
        })
    }
}

impl SettlementStore for MemorySettlementRepository {
    async fn commit(&self, changeset: Changeset) -> WalletResult<()> {
        let mut state = self.state.lock().await;

        if state.injected_conflicts > 0 {
            state.injected_conflicts -= 1;
            return Err(WalletError::ConcurrentModification);
        }

        state.check(&changeset)?;
        state.apply(changeset);
        Ok(())
    }
}

impl CryptoNetworkRepository for MemorySettlementRepository {
    async fn find_network(&self, id: &CryptoNetworkId) -> WalletResult<Option<CryptoNetwork>> {
        Ok(self.state.lock().await.networks.get(id).cloned())
    }

    async fn list_networks(&self, active_only: bool) -> WalletResult<Vec<CryptoNetwork>> {
        let state = self.state.lock().await;
        let mut networks: Vec<CryptoNetwork> = state
            .networks
            .values()
            .filter(|n| !active_only || n.is_active)
            .cloned()
            .collect();
        networks.sort_by(|a, b| (b.created_at, b.id.as_uuid()).cmp(&(a.created_at, a.id.as_uuid())));
        Ok(networks)
    }

    async fn save_network(&self, network: &CryptoNetwork) -> WalletResult<()> {
        self.state
            .lock()
            .await
            .networks
            .insert(network.id, network.clone());
        Ok(())
    }

    async fn delete_network(&self, id: &CryptoNetworkId) -> WalletResult<bool> {
        let mut state = self.state.lock().await;
        if state.networks.remove(id).is_none() {
            return Ok(false);
        }
        // recorded deposits stay, unlinked
        for tx in state.transactions.values_mut() {
            if tx.crypto_network_id.as_ref() == Some(id) {
                tx.crypto_network_id = None;
            }
        }
        Ok(true)
    }
}

/// Newest first, ties broken by id
fn paginate<T, K: Ord>(mut items: Vec<T>, page: PageRequest, key: impl Fn(&T) -> K) -> Page<T> {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(page.limit() as usize)
        .collect();
    Page::new(items, total, page)
}

// ============================================================================
// Notification Sink
// ============================================================================

/// Records delivered notifications; can be switched to fail every delivery
#[derive(Clone, Default)]
pub struct MemoryNotificationSink {
    delivered: Arc<Mutex<Vec<Notification>>>,
    failing: bool,
}

impl MemoryNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub async fn delivered(&self) -> Vec<Notification> {
        self.delivered.lock().await.clone()
    }
}

impl NotificationSink for MemoryNotificationSink {
    async fn notify(&self, notification: &Notification) -> WalletResult<()> {
        if self.failing {
            return Err(WalletError::Internal("notification channel unavailable".into()));
        }
        self.delivered.lock().await.push(notification.clone());
        Ok(())
    }
}
