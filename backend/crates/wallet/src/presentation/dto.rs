//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::page::{Page, PageInfo};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::MinedReport;
use crate::domain::entity::{
    CryptoNetwork, CryptoNetworkChanges, NewCryptoNetwork, PaymentProof, Transaction, Wallet,
};
use crate::domain::value_object::{
    LockAllocation, ProofStatus, TransactionStatus, TransactionType, WalletType,
};
use crate::error::{WalletError, WalletResult};

// ============================================================================
// Shared
// ============================================================================

/// Paginated list response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> ListResponse<T> {
    pub fn from_page<U>(page: Page<U>, f: impl FnMut(U) -> T) -> Self {
        let pagination = page.info();
        Self {
            items: page.map(f).items,
            pagination,
        }
    }
}

/// Query string of list endpoints; `status`/`type` accept `all`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub user_id: Option<Uuid>,
}

/// Parse an optional enum filter; absent, empty and `all` mean no filter
pub fn parse_filter<T>(
    raw: Option<&str>,
    field: &str,
    from_code: impl Fn(&str) -> Option<T>,
) -> WalletResult<Option<T>> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(code) => from_code(code)
            .map(Some)
            .ok_or_else(|| WalletError::invalid_input(format!("Unknown {field}: {code}"))),
    }
}

/// Reject request (withdrawal, payment, crypto deposit)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    pub reason: Option<String>,
}

/// Approve request without payout reference
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    pub notes: Option<String>,
}

// ============================================================================
// Wallet
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletResponse {
    pub user_id: Uuid,
    pub mining_available: u64,
    pub mining_locked: u64,
    pub purchase_available: u64,
    pub purchase_locked: u64,
    pub total_available: u64,
    pub total_locked: u64,
    pub total_mined: u64,
    pub total_withdrawn: u64,
    pub updated_at: DateTime<Utc>,
}

impl From<&Wallet> for WalletResponse {
    fn from(w: &Wallet) -> Self {
        Self {
            user_id: w.user_id().into_uuid(),
            mining_available: w.mining().available(),
            mining_locked: w.mining().locked(),
            purchase_available: w.purchase().available(),
            purchase_locked: w.purchase().locked(),
            total_available: w.total_available(),
            total_locked: w.total_locked(),
            total_mined: w.total_mined(),
            total_withdrawn: w.total_withdrawn(),
            updated_at: w.updated_at(),
        }
    }
}

// ============================================================================
// Transactions
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub amount: u64,
    pub coins: u64,
    pub wallet_type: WalletType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_allocation: Option<LockAllocation>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub payment_proof_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crypto_network_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<Uuid>,
    pub failure_reason: Option<String>,
    pub external_transaction_id: Option<String>,
    pub admin_notes: Option<String>,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id.into_uuid(),
            user_id: t.user_id.into_uuid(),
            transaction_type: t.transaction_type,
            status: t.status(),
            amount: t.amount,
            coins: t.coins,
            wallet_type: t.wallet_type,
            lock_allocation: t.lock_allocation,
            processed_at: t.processed_at(),
            processed_by: t.processed_by().map(|a| a.into_uuid()),
            failure_reason: t.failure_reason().map(str::to_string),
            external_transaction_id: t.external_transaction_id().map(str::to_string),
            admin_notes: t.admin_notes().map(str::to_string),
            payment_proof_id: t.payment_proof_id.map(|p| p.into_uuid()),
            crypto_network_id: t.crypto_network_id.map(|n| n.into_uuid()),
            created_at: t.created_at,
            description: t.description,
            reference: t.reference,
        }
    }
}

/// Withdrawal request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    #[serde(default)]
    pub wallet_type: WalletType,
    pub coins: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalResponse {
    pub transaction: TransactionResponse,
    pub wallet: WalletResponse,
}

/// Withdrawal approval with optional payout reference
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveWithdrawalRequest {
    pub external_transaction_id: Option<String>,
    pub notes: Option<String>,
}

// ============================================================================
// Payment Proofs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPaymentProofRequest {
    #[serde(default)]
    pub utr: String,
    #[serde(default)]
    pub amount: i64,
    pub coins_to_credit: Option<i64>,
    pub screenshot_ref: Option<String>,
    pub coin_package: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProofResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub utr: String,
    pub amount: u64,
    pub coins_to_credit: u64,
    pub screenshot_ref: String,
    pub coin_package: Option<String>,
    pub status: ProofStatus,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentProof> for PaymentProofResponse {
    fn from(p: PaymentProof) -> Self {
        Self {
            id: p.id.into_uuid(),
            user_id: p.user_id.into_uuid(),
            utr: p.utr.as_str().to_string(),
            amount: p.amount,
            coins_to_credit: p.coins_to_credit,
            status: p.status(),
            reviewed_by: p.reviewed_by().map(|a| a.into_uuid()),
            reviewed_at: p.reviewed_at(),
            rejection_reason: p.rejection_reason().map(str::to_string),
            admin_notes: p.admin_notes().map(str::to_string),
            created_at: p.created_at,
            screenshot_ref: p.screenshot_ref,
            coin_package: p.coin_package,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovePaymentResponse {
    pub proof: PaymentProofResponse,
    pub transaction: Option<TransactionResponse>,
}

// ============================================================================
// Crypto Deposits
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoDepositRequest {
    pub amount: i64,
    pub coins: Option<i64>,
    pub network_id: Uuid,
    #[serde(default)]
    pub tx_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCryptoNetworkRequest {
    #[serde(default)]
    pub name: String,
    pub symbol: Option<String>,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub wallet_address: String,
    pub qr_code_url: Option<String>,
}

impl From<CreateCryptoNetworkRequest> for NewCryptoNetwork {
    fn from(req: CreateCryptoNetworkRequest) -> Self {
        Self {
            name: req.name,
            symbol: req.symbol,
            network: req.network,
            wallet_address: req.wallet_address,
            qr_code_url: req.qr_code_url,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCryptoNetworkRequest {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub network: Option<String>,
    pub wallet_address: Option<String>,
    pub qr_code_url: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UpdateCryptoNetworkRequest> for CryptoNetworkChanges {
    fn from(req: UpdateCryptoNetworkRequest) -> Self {
        Self {
            name: req.name,
            symbol: req.symbol,
            network: req.network,
            wallet_address: req.wallet_address,
            qr_code_url: req.qr_code_url,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoNetworkResponse {
    pub id: Uuid,
    pub name: String,
    pub symbol: String,
    pub network: String,
    pub wallet_address: String,
    pub qr_code_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CryptoNetwork> for CryptoNetworkResponse {
    fn from(n: CryptoNetwork) -> Self {
        Self {
            id: n.id.into_uuid(),
            name: n.name,
            symbol: n.symbol,
            network: n.network,
            wallet_address: n.wallet_address,
            qr_code_url: n.qr_code_url,
            is_active: n.is_active,
            created_at: n.created_at,
            updated_at: n.updated_at,
        }
    }
}

// ============================================================================
// Earnings
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiningSessionCompletedRequest {
    pub user_id: Uuid,
    pub session_id: String,
    pub earned_coins: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiningCreditResponse {
    /// Absent when the session earned nothing
    pub transaction: Option<TransactionResponse>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralBonusRequest {
    pub referrer_id: Uuid,
    pub referral_id: String,
    pub coins: i64,
}

// ============================================================================
// Reports
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinedReportQuery {
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinedCoinsResponse {
    pub session_total: u64,
    pub user_total: u64,
    pub total_mined: u64,
}

impl From<MinedReport> for MinedCoinsResponse {
    fn from(r: MinedReport) -> Self {
        Self {
            session_total: r.session_total,
            user_total: r.user_total,
            total_mined: r.displayed,
        }
    }
}
