//! PostgreSQL Repository Implementations
//!
//! Coin amounts are `u64` in the domain and BIGINT in storage; rows holding
//! a negative amount are refused on load. Enum tags are SMALLINT ids.

use chrono::{DateTime, Utc};
use kernel::id::{AdminId, CryptoNetworkId, PaymentProofId, TransactionId, UserId};
use kernel::page::{Page, PageRequest};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::application::DUPLICATE_UTR_MESSAGE;
use crate::domain::entity::wallet::SubWallet;
use crate::domain::entity::{CryptoNetwork, Notification, PaymentProof, Transaction, Wallet};
use crate::domain::repository::{
    Changeset, CryptoNetworkRepository, MinedAggregates, MiningReportRepository, NotificationSink, PaymentProofRepository,
    ProofWrite, SettlementStore, TransactionFilter, TransactionRepository, TransactionWrite,
    WalletRepository,
};
use crate::domain::value_object::{
    LockAllocation, ProofStatus, TransactionStatus, TransactionType, Utr, WalletType,
};
use crate::error::{WalletError, WalletResult};
use crate::infra::duplicate_reference_message;

type PgTx<'c> = sqlx::Transaction<'c, Postgres>;

/// PostgreSQL-backed settlement repository
#[derive(Clone)]
pub struct PgSettlementRepository {
    pool: PgPool,
}

impl PgSettlementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Wallet Repository Implementation
// ============================================================================

impl WalletRepository for PgSettlementRepository {
    async fn find_wallet(&self, user_id: &UserId) -> WalletResult<Option<Wallet>> {
        let row = sqlx::query_as::<_, WalletRow>(
            r#"
            SELECT
                user_id,
                mining_available,
                mining_locked,
                purchase_available,
                purchase_locked,
                total_mined,
                total_withdrawn,
                version,
                created_at,
                updated_at
            FROM wallets
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_wallet()).transpose()
    }
}

// ============================================================================
// Transaction Repository Implementation
// ============================================================================

impl TransactionRepository for PgSettlementRepository {
    async fn find_transaction(&self, id: &TransactionId) -> WalletResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT
                id, user_id, transaction_type, status, amount, coins, wallet_type,
                locked_mining, locked_purchase, description, reference, payment_proof_id,
                processed_at, processed_by, failure_reason, external_transaction_id,
                admin_notes, crypto_network_id, created_at
            FROM transactions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_transaction()).transpose()
    }

    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> WalletResult<Page<Transaction>> {
        let user_id = filter.user_id.map(UserId::into_uuid);
        let transaction_type = filter.transaction_type.map(|t| t.id());
        let status = filter.status.map(|s| s.id());

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM transactions
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::smallint IS NULL OR transaction_type = $2)
              AND ($3::smallint IS NULL OR status = $3)
            "#,
        )
        .bind(user_id)
        .bind(transaction_type)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT
                id, user_id, transaction_type, status, amount, coins, wallet_type,
                locked_mining, locked_purchase, description, reference, payment_proof_id,
                processed_at, processed_by, failure_reason, external_transaction_id,
                admin_notes, crypto_network_id, created_at
            FROM transactions
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::smallint IS NULL OR transaction_type = $2)
              AND ($3::smallint IS NULL OR status = $3)
            ORDER BY created_at DESC, id
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(user_id)
        .bind(transaction_type)
        .bind(status)
        .bind(i64::from(page.limit()))
        .bind(to_db(page.offset())?)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(TransactionRow::into_transaction)
            .collect::<WalletResult<Vec<_>>>()?;

        Ok(Page::new(items, from_db(total, "count")?, page))
    }
}

// ============================================================================
// Payment Proof Repository Implementation
// ============================================================================

impl PaymentProofRepository for PgSettlementRepository {
    async fn find_proof(&self, id: &PaymentProofId) -> WalletResult<Option<PaymentProof>> {
        let row = sqlx::query_as::<_, PaymentProofRow>(
            r#"
            SELECT
                id, user_id, utr, amount, coins_to_credit, screenshot_ref, coin_package,
                status, reviewed_by, reviewed_at, rejection_reason, admin_notes, created_at
            FROM payment_proofs
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_proof()).transpose()
    }

    async fn exists_by_utr(&self, utr: &Utr) -> WalletResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM payment_proofs WHERE utr = $1)",
        )
        .bind(utr.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list_proofs(
        &self,
        status: Option<ProofStatus>,
        page: PageRequest,
    ) -> WalletResult<Page<PaymentProof>> {
        let status = status.map(|s| s.id());

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM payment_proofs WHERE ($1::smallint IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, PaymentProofRow>(
            r#"
            SELECT
                id, user_id, utr, amount, coins_to_credit, screenshot_ref, coin_package,
                status, reviewed_by, reviewed_at, rejection_reason, admin_notes, created_at
            FROM payment_proofs
            WHERE ($1::smallint IS NULL OR status = $1)
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(i64::from(page.limit()))
        .bind(to_db(page.offset())?)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(PaymentProofRow::into_proof)
            .collect::<WalletResult<Vec<_>>>()?;

        Ok(Page::new(items, from_db(total, "count")?, page))
    }
}

// ============================================================================
// Mining Report Implementation
// ============================================================================

impl MiningReportRepository for PgSettlementRepository {
    async fn mined_aggregates(&self, user_id: Option<&UserId>) -> WalletResult<MinedAggregates> {
        let user_id = user_id.map(|u| u.into_uuid());

        let (session_total, user_total) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                (SELECT COALESCE(SUM(coins), 0)::BIGINT
                   FROM transactions
                  WHERE transaction_type = $2
                    AND status = $3
                    AND ($1::uuid IS NULL OR user_id = $1)),
                (SELECT COALESCE(SUM(total_mined), 0)::BIGINT
                   FROM wallets
                  WHERE ($1::uuid IS NULL OR user_id = $1))
            "#,
        )
        .bind(user_id)
        .bind(TransactionType::Mining.id())
        .bind(TransactionStatus::Completed.id())
        .fetch_one(&self.pool)
        .await?;

        Ok(MinedAggregates {
            session_total: from_db(session_total, "session_total")?,
            user_total: from_db(user_total, "total_mined")?,
        })
    }
}

// ============================================================================
// Settlement Store Implementation
// ============================================================================

impl SettlementStore for PgSettlementRepository {
    async fn commit(&self, changeset: Changeset) -> WalletResult<()> {
        let mut tx = self.pool.begin().await?;

        // Guarded status updates first: a lost review race aborts before
        // the wallet row is touched.
        for write in &changeset.transactions {
            match write {
                TransactionWrite::Settle(t) => settle_transaction(&mut tx, t).await?,
                TransactionWrite::Insert(t) => insert_transaction(&mut tx, t).await?,
            }
        }

        match &changeset.proof {
            Some(ProofWrite::Insert(p)) => insert_proof(&mut tx, p).await?,
            Some(ProofWrite::Review(p)) => review_proof(&mut tx, p).await?,
            None => {}
        }

        if let Some(wallet) = &changeset.wallet {
            store_wallet(&mut tx, wallet).await?;
        }

        // Dropping `tx` on any early return above rolls everything back.
        tx.commit().await?;

        Ok(())
    }
}

async fn store_wallet(tx: &mut PgTx<'_>, wallet: &Wallet) -> WalletResult<()> {
    let mining = wallet.mining();
    let purchase = wallet.purchase();

    let affected = if wallet.is_persisted() {
        sqlx::query(
            r#"
            UPDATE wallets SET
                mining_available = $3,
                mining_locked = $4,
                purchase_available = $5,
                purchase_locked = $6,
                total_mined = $7,
                total_withdrawn = $8,
                version = version + 1,
                updated_at = NOW()
            WHERE user_id = $1 AND version = $2
            "#,
        )
        .bind(wallet.user_id().as_uuid())
        .bind(wallet.version())
        .bind(to_db(mining.available())?)
        .bind(to_db(mining.locked())?)
        .bind(to_db(purchase.available())?)
        .bind(to_db(purchase.locked())?)
        .bind(to_db(wallet.total_mined())?)
        .bind(to_db(wallet.total_withdrawn())?)
        .execute(&mut **tx)
        .await?
        .rows_affected()
    } else {
        sqlx::query(
            r#"
            INSERT INTO wallets (
                user_id,
                mining_available,
                mining_locked,
                purchase_available,
                purchase_locked,
                total_mined,
                total_withdrawn,
                version,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, 1, $8, $8)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(wallet.user_id().as_uuid())
        .bind(to_db(mining.available())?)
        .bind(to_db(mining.locked())?)
        .bind(to_db(purchase.available())?)
        .bind(to_db(purchase.locked())?)
        .bind(to_db(wallet.total_mined())?)
        .bind(to_db(wallet.total_withdrawn())?)
        .bind(wallet.created_at())
        .execute(&mut **tx)
        .await?
        .rows_affected()
    };

    if affected == 0 {
        return Err(WalletError::ConcurrentModification);
    }
    Ok(())
}

async fn insert_transaction(tx: &mut PgTx<'_>, t: &Transaction) -> WalletResult<()> {
    let allocation = t.lock_allocation;

    sqlx::query(
        r#"
        INSERT INTO transactions (
            id, user_id, transaction_type, status, amount, coins, wallet_type,
            locked_mining, locked_purchase, description, reference, payment_proof_id,
            processed_at, processed_by, failure_reason, external_transaction_id,
            admin_notes, crypto_network_id, created_at
        ) VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
            $11, $12, $13, $14, $15, $16, $17, $18, $19
        )
        "#,
    )
    .bind(t.id.as_uuid())
    .bind(t.user_id.as_uuid())
    .bind(t.transaction_type.id())
    .bind(t.status().id())
    .bind(to_db(t.amount)?)
    .bind(to_db(t.coins)?)
    .bind(t.wallet_type.id())
    .bind(allocation.map(|a| to_db(a.mining)).transpose()?)
    .bind(allocation.map(|a| to_db(a.purchase)).transpose()?)
    .bind(t.description.as_deref())
    .bind(t.reference.as_deref())
    .bind(t.payment_proof_id.map(PaymentProofId::into_uuid))
    .bind(t.processed_at())
    .bind(t.processed_by().map(AdminId::into_uuid))
    .bind(t.failure_reason())
    .bind(t.external_transaction_id())
    .bind(t.admin_notes())
    .bind(t.crypto_network_id.map(CryptoNetworkId::into_uuid))
    .bind(t.created_at)
    .execute(&mut **tx)
    .await
    .map_err(|e| on_unique_violation(e, duplicate_reference_message(t.transaction_type)))?;

    Ok(())
}

async fn settle_transaction(tx: &mut PgTx<'_>, t: &Transaction) -> WalletResult<()> {
    let affected = sqlx::query(
        r#"
        UPDATE transactions SET
            status = $2,
            processed_at = $3,
            processed_by = $4,
            failure_reason = $5,
            external_transaction_id = $6,
            admin_notes = $7,
            updated_at = NOW()
        WHERE id = $1 AND status = $8
        "#,
    )
    .bind(t.id.as_uuid())
    .bind(t.status().id())
    .bind(t.processed_at())
    .bind(t.processed_by().map(AdminId::into_uuid))
    .bind(t.failure_reason())
    .bind(t.external_transaction_id())
    .bind(t.admin_notes())
    .bind(TransactionStatus::Pending.id())
    .execute(&mut **tx)
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(WalletError::invalid_state(
            "Transaction has already been processed",
        ));
    }
    Ok(())
}

async fn insert_proof(tx: &mut PgTx<'_>, p: &PaymentProof) -> WalletResult<()> {
    sqlx::query(
        r#"
        INSERT INTO payment_proofs (
            id, user_id, utr, amount, coins_to_credit, screenshot_ref, coin_package,
            status, reviewed_by, reviewed_at, rejection_reason, admin_notes, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(p.id.as_uuid())
    .bind(p.user_id.as_uuid())
    .bind(p.utr.as_str())
    .bind(to_db(p.amount)?)
    .bind(to_db(p.coins_to_credit)?)
    .bind(p.screenshot_ref.as_str())
    .bind(p.coin_package.as_deref())
    .bind(p.status().id())
    .bind(p.reviewed_by().map(AdminId::into_uuid))
    .bind(p.reviewed_at())
    .bind(p.rejection_reason())
    .bind(p.admin_notes())
    .bind(p.created_at)
    .execute(&mut **tx)
    .await
    .map_err(|e| on_unique_violation(e, DUPLICATE_UTR_MESSAGE))?;

    Ok(())
}

async fn review_proof(tx: &mut PgTx<'_>, p: &PaymentProof) -> WalletResult<()> {
    let affected = sqlx::query(
        r#"
        UPDATE payment_proofs SET
            status = $2,
            reviewed_by = $3,
            reviewed_at = $4,
            rejection_reason = $5,
            admin_notes = $6
        WHERE id = $1 AND status = $7
        "#,
    )
    .bind(p.id.as_uuid())
    .bind(p.status().id())
    .bind(p.reviewed_by().map(AdminId::into_uuid))
    .bind(p.reviewed_at())
    .bind(p.rejection_reason())
    .bind(p.admin_notes())
    .bind(ProofStatus::Pending.id())
    .execute(&mut **tx)
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(WalletError::invalid_state("Payment has already been processed"));
    }
    Ok(())
}

fn on_unique_violation(err: sqlx::Error, message: &str) -> WalletError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => {
            WalletError::DuplicateReference(message.to_string())
        }
        _ => WalletError::Database(err),
    }
}

// ============================================================================
// Notification Sink Implementation
// ============================================================================

/// Writes notifications to the `notifications` table for the app to poll
#[derive(Clone)]
pub struct PgNotificationSink {
    pool: PgPool,
}

impl PgNotificationSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl NotificationSink for PgNotificationSink {
    async fn notify(&self, notification: &Notification) -> WalletResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (
                id,
                user_id,
                title,
                message,
                notification_type,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(notification.id)
        .bind(notification.user_id.as_uuid())
        .bind(notification.title.as_str())
        .bind(notification.message.as_str())
        .bind(notification.notification_type.id())
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Crypto Network Registry Implementation
// ============================================================================

impl CryptoNetworkRepository for PgSettlementRepository {
    async fn find_network(&self, id: &CryptoNetworkId) -> WalletResult<Option<CryptoNetwork>> {
        let row = sqlx::query_as::<_, CryptoNetworkRow>(
            r#"
            SELECT
                id, name, symbol, network, wallet_address, qr_code_url, is_active,
                created_at, updated_at
            FROM crypto_networks
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CryptoNetworkRow::into_network))
    }

    async fn list_networks(&self, active_only: bool) -> WalletResult<Vec<CryptoNetwork>> {
        let rows = sqlx::query_as::<_, CryptoNetworkRow>(
            r#"
            SELECT
                id, name, symbol, network, wallet_address, qr_code_url, is_active,
                created_at, updated_at
            FROM crypto_networks
            WHERE (NOT $1 OR is_active)
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CryptoNetworkRow::into_network).collect())
    }

    async fn save_network(&self, network: &CryptoNetwork) -> WalletResult<()> {
        sqlx::query(
            r#"
            INSERT INTO crypto_networks (
                id, name, symbol, network, wallet_address, qr_code_url, is_active,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                symbol = EXCLUDED.symbol,
                network = EXCLUDED.network,
                wallet_address = EXCLUDED.wallet_address,
                qr_code_url = EXCLUDED.qr_code_url,
                is_active = EXCLUDED.is_active,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(network.id.as_uuid())
        .bind(network.name.as_str())
        .bind(network.symbol.as_str())
        .bind(network.network.as_str())
        .bind(network.wallet_address.as_str())
        .bind(network.qr_code_url.as_deref())
        .bind(network.is_active)
        .bind(network.created_at)
        .bind(network.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_network(&self, id: &CryptoNetworkId) -> WalletResult<bool> {
        let result = sqlx::query("DELETE FROM crypto_networks WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

fn to_db(value: u64) -> WalletResult<i64> {
    i64::try_from(value)
        .map_err(|_| WalletError::invariant_violation(format!("Amount {value} exceeds storage range")))
}

fn from_db(value: i64, column: &str) -> WalletResult<u64> {
    u64::try_from(value)
        .map_err(|_| WalletError::invariant_violation(format!("Negative {column} in storage: {value}")))
}

fn unknown_tag(column: &str, id: i16) -> WalletError {
    WalletError::Internal(format!("Unknown {column}: {id}"))
}

#[derive(sqlx::FromRow)]
struct WalletRow {
    user_id: Uuid,
    mining_available: i64,
    mining_locked: i64,
    purchase_available: i64,
    purchase_locked: i64,
    total_mined: i64,
    total_withdrawn: i64,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WalletRow {
    fn into_wallet(self) -> WalletResult<Wallet> {
        Ok(Wallet::restore(
            UserId::from_uuid(self.user_id),
            SubWallet::new(
                from_db(self.mining_available, "mining_available")?,
                from_db(self.mining_locked, "mining_locked")?,
            ),
            SubWallet::new(
                from_db(self.purchase_available, "purchase_available")?,
                from_db(self.purchase_locked, "purchase_locked")?,
            ),
            from_db(self.total_mined, "total_mined")?,
            from_db(self.total_withdrawn, "total_withdrawn")?,
            self.version,
            self.created_at,
            self.updated_at,
        ))
    }
}

#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    user_id: Uuid,
    transaction_type: i16,
    status: i16,
    amount: i64,
    coins: i64,
    wallet_type: i16,
    locked_mining: Option<i64>,
    locked_purchase: Option<i64>,
    description: Option<String>,
    reference: Option<String>,
    payment_proof_id: Option<Uuid>,
    processed_at: Option<DateTime<Utc>>,
    processed_by: Option<Uuid>,
    failure_reason: Option<String>,
    external_transaction_id: Option<String>,
    admin_notes: Option<String>,
    crypto_network_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl TransactionRow {
    fn into_transaction(self) -> WalletResult<Transaction> {
        let lock_allocation = match (self.locked_mining, self.locked_purchase) {
            (None, None) => None,
            (mining, purchase) => Some(LockAllocation {
                mining: from_db(mining.unwrap_or(0), "locked_mining")?,
                purchase: from_db(purchase.unwrap_or(0), "locked_purchase")?,
            }),
        };

        Ok(Transaction {
            id: TransactionId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            transaction_type: TransactionType::from_id(self.transaction_type)
                .ok_or_else(|| unknown_tag("transaction_type", self.transaction_type))?,
            amount: from_db(self.amount, "amount")?,
            coins: from_db(self.coins, "coins")?,
            wallet_type: WalletType::from_id(self.wallet_type)
                .ok_or_else(|| unknown_tag("wallet_type", self.wallet_type))?,
            lock_allocation,
            description: self.description,
            reference: self.reference,
            payment_proof_id: self.payment_proof_id.map(PaymentProofId::from_uuid),
            crypto_network_id: self.crypto_network_id.map(CryptoNetworkId::from_uuid),
            created_at: self.created_at,
            status: TransactionStatus::from_id(self.status)
                .ok_or_else(|| unknown_tag("status", self.status))?,
            processed_at: self.processed_at,
            processed_by: self.processed_by.map(AdminId::from_uuid),
            failure_reason: self.failure_reason,
            external_transaction_id: self.external_transaction_id,
            admin_notes: self.admin_notes,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PaymentProofRow {
    id: Uuid,
    user_id: Uuid,
    utr: String,
    amount: i64,
    coins_to_credit: i64,
    screenshot_ref: String,
    coin_package: Option<String>,
    status: i16,
    reviewed_by: Option<Uuid>,
    reviewed_at: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
    admin_notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl PaymentProofRow {
    fn into_proof(self) -> WalletResult<PaymentProof> {
        Ok(PaymentProof {
            id: PaymentProofId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            utr: Utr::from_trusted(self.utr),
            amount: from_db(self.amount, "amount")?,
            coins_to_credit: from_db(self.coins_to_credit, "coins_to_credit")?,
            screenshot_ref: self.screenshot_ref,
            coin_package: self.coin_package,
            created_at: self.created_at,
            status: ProofStatus::from_id(self.status)
                .ok_or_else(|| unknown_tag("status", self.status))?,
            reviewed_by: self.reviewed_by.map(AdminId::from_uuid),
            reviewed_at: self.reviewed_at,
            rejection_reason: self.rejection_reason,
            admin_notes: self.admin_notes,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CryptoNetworkRow {
    id: Uuid,
    name: String,
    symbol: String,
    network: String,
    wallet_address: String,
    qr_code_url: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CryptoNetworkRow {
    fn into_network(self) -> CryptoNetwork {
        CryptoNetwork {
            id: CryptoNetworkId::from_uuid(self.id),
            name: self.name,
            symbol: self.symbol,
            network: self.network,
            wallet_address: self.wallet_address,
            qr_code_url: self.qr_code_url,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
