//! HTTP Handlers
//!
//! The auth gateway in front of this service forwards the caller as
//! `X-User-Id` (user routes) or `X-Admin-Id` (admin routes).

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use std::sync::Arc;
use uuid::Uuid;

use kernel::id::{AdminId, CryptoNetworkId, PaymentProofId, TransactionId, UserId};
use kernel::page::PageRequest;
use platform::client::{ADMIN_ID_HEADER, USER_ID_HEADER, extract_client_ip, extract_principal};

use crate::application::{
    ApproveCryptoDepositInput, ApprovePaymentInput, ApproveWithdrawalInput, CreditEarningsUseCase,
    CryptoDepositUseCase, CryptoNetworkUseCase, MiningSessionCompletedInput, RecordCryptoDepositInput,
    ReferralBonusInput, RejectCryptoDepositInput, RejectPaymentInput, RejectWithdrawalInput,
    RequestWithdrawalInput, RequestWithdrawalUseCase, ReviewPaymentProofUseCase,
    ReviewWithdrawalUseCase, SettlementConfig, SubmitPaymentProofInput, SubmitPaymentProofUseCase,
    WalletQueries,
};
use crate::domain::repository::{NotificationSink, SettlementRepository, TransactionFilter};
use crate::domain::value_object::{ProofStatus, TransactionStatus, TransactionType};
use crate::error::WalletResult;
use crate::presentation::dto::{
    ApprovePaymentResponse, ApproveRequest, ApproveWithdrawalRequest, CreateCryptoNetworkRequest,
    CryptoDepositRequest, CryptoNetworkResponse, UpdateCryptoNetworkRequest,
    ListQuery, ListResponse, MinedCoinsResponse, MinedReportQuery, MiningCreditResponse,
    MiningSessionCompletedRequest, PaymentProofResponse, ReferralBonusRequest, RejectRequest,
    SubmitPaymentProofRequest, TransactionResponse, WalletResponse, WithdrawalRequest,
    WithdrawalResponse, parse_filter,
};

/// Shared state for wallet handlers
#[derive(Clone)]
pub struct WalletAppState<R, N>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub notifier: Arc<N>,
    pub config: Arc<SettlementConfig>,
}

fn user_principal(headers: &HeaderMap) -> WalletResult<UserId> {
    Ok(UserId::from_uuid(extract_principal(headers, USER_ID_HEADER)?))
}

fn admin_principal(headers: &HeaderMap) -> WalletResult<AdminId> {
    let admin_id = AdminId::from_uuid(extract_principal(headers, ADMIN_ID_HEADER)?);
    tracing::debug!(
        admin_id = %admin_id,
        client_ip = ?extract_client_ip(headers, None),
        "Admin request"
    );
    Ok(admin_id)
}

fn transaction_filter(query: &ListQuery) -> WalletResult<TransactionFilter> {
    Ok(TransactionFilter {
        user_id: query.user_id.map(UserId::from_uuid),
        transaction_type: parse_filter(
            query.transaction_type.as_deref(),
            "transaction type",
            TransactionType::from_code,
        )?,
        status: parse_filter(query.status.as_deref(), "status", TransactionStatus::from_code)?,
    })
}

// ============================================================================
// User: Wallet
// ============================================================================

/// GET /api/wallet
pub async fn get_wallet<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
) -> WalletResult<Json<WalletResponse>>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let user_id = user_principal(&headers)?;
    let wallet = WalletQueries::new(state.repo.clone()).wallet(user_id).await?;

    Ok(Json(WalletResponse::from(&wallet)))
}

/// GET /api/wallet/transactions
pub async fn list_own_transactions<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> WalletResult<Json<ListResponse<TransactionResponse>>>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let user_id = user_principal(&headers)?;
    // callers only ever see their own records
    let filter = TransactionFilter {
        user_id: Some(user_id),
        ..transaction_filter(&query)?
    };

    let page = WalletQueries::new(state.repo.clone())
        .transactions(filter, PageRequest::new(query.page, query.limit))
        .await?;

    Ok(Json(ListResponse::from_page(page, TransactionResponse::from)))
}

/// POST /api/wallet/withdrawals
pub async fn request_withdrawal<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
    Json(req): Json<WithdrawalRequest>,
) -> WalletResult<(StatusCode, Json<WithdrawalResponse>)>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let user_id = user_principal(&headers)?;
    let use_case = RequestWithdrawalUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(RequestWithdrawalInput {
            user_id,
            wallet_type: req.wallet_type,
            coins: req.coins,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(WithdrawalResponse {
            wallet: WalletResponse::from(&output.wallet),
            transaction: output.transaction.into(),
        }),
    ))
}

/// POST /api/wallet/payments/proof
pub async fn submit_payment_proof<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
    Json(req): Json<SubmitPaymentProofRequest>,
) -> WalletResult<(StatusCode, Json<PaymentProofResponse>)>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let user_id = user_principal(&headers)?;
    let use_case = SubmitPaymentProofUseCase::new(
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    let proof = use_case
        .execute(SubmitPaymentProofInput {
            user_id,
            utr: req.utr,
            amount: req.amount,
            coins_to_credit: req.coins_to_credit,
            screenshot_ref: req.screenshot_ref,
            coin_package: req.coin_package,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(proof.into())))
}

/// POST /api/wallet/crypto-deposits
pub async fn record_crypto_deposit<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
    Json(req): Json<CryptoDepositRequest>,
) -> WalletResult<(StatusCode, Json<TransactionResponse>)>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let user_id = user_principal(&headers)?;
    let use_case = CryptoDepositUseCase::new(
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    let transaction = use_case
        .record(RecordCryptoDepositInput {
            user_id,
            amount: req.amount,
            coins: req.coins,
            network_id: CryptoNetworkId::from_uuid(req.network_id),
            tx_hash: req.tx_hash,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(transaction.into())))
}

/// GET /api/wallet/crypto-networks
///
/// Active networks only.
pub async fn list_active_crypto_networks<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
) -> WalletResult<Json<Vec<CryptoNetworkResponse>>>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    user_principal(&headers)?;
    let networks = CryptoNetworkUseCase::new(state.repo.clone()).list(true).await?;
    Ok(Json(networks.into_iter().map(Into::into).collect()))
}

// ============================================================================
// Admin: Transactions
// ============================================================================

/// GET /api/admin/transactions
pub async fn list_transactions<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> WalletResult<Json<ListResponse<TransactionResponse>>>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    admin_principal(&headers)?;
    let filter = transaction_filter(&query)?;

    let page = WalletQueries::new(state.repo.clone())
        .transactions(filter, PageRequest::new(query.page, query.limit))
        .await?;

    Ok(Json(ListResponse::from_page(page, TransactionResponse::from)))
}

/// GET /api/admin/transactions/withdrawals/pending
pub async fn pending_withdrawals<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> WalletResult<Json<ListResponse<TransactionResponse>>>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    admin_principal(&headers)?;

    let page = WalletQueries::new(state.repo.clone())
        .pending_withdrawals(PageRequest::new(query.page, query.limit))
        .await?;

    Ok(Json(ListResponse::from_page(page, TransactionResponse::from)))
}

/// PUT /api/admin/transactions/withdrawals/{id}/approve
pub async fn approve_withdrawal<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<ApproveWithdrawalRequest>,
) -> WalletResult<Json<TransactionResponse>>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let admin_id = admin_principal(&headers)?;
    let use_case = ReviewWithdrawalUseCase::new(
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    let transaction = use_case
        .approve(ApproveWithdrawalInput {
            transaction_id: TransactionId::from_uuid(id),
            admin_id,
            external_transaction_id: req.external_transaction_id,
            notes: req.notes,
        })
        .await?;

    Ok(Json(transaction.into()))
}

/// PUT /api/admin/transactions/withdrawals/{id}/reject
pub async fn reject_withdrawal<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<RejectRequest>,
) -> WalletResult<Json<TransactionResponse>>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let admin_id = admin_principal(&headers)?;
    let use_case = ReviewWithdrawalUseCase::new(
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    let transaction = use_case
        .reject(RejectWithdrawalInput {
            transaction_id: TransactionId::from_uuid(id),
            admin_id,
            reason: req.reason,
        })
        .await?;

    Ok(Json(transaction.into()))
}

// ============================================================================
// Admin: Payment Proofs
// ============================================================================

/// GET /api/admin/payments
pub async fn list_payment_proofs<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> WalletResult<Json<ListResponse<PaymentProofResponse>>>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    admin_principal(&headers)?;
    let status = parse_filter(query.status.as_deref(), "status", ProofStatus::from_code)?;

    let page = WalletQueries::new(state.repo.clone())
        .payment_proofs(status, PageRequest::new(query.page, query.limit))
        .await?;

    Ok(Json(ListResponse::from_page(page, PaymentProofResponse::from)))
}

/// GET /api/admin/payments/{id}
pub async fn get_payment_proof<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> WalletResult<Json<PaymentProofResponse>>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    admin_principal(&headers)?;

    let proof = WalletQueries::new(state.repo.clone())
        .payment_proof(PaymentProofId::from_uuid(id))
        .await?;

    Ok(Json(proof.into()))
}

/// PUT /api/admin/payments/{id}/approve
pub async fn approve_payment_proof<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<ApproveRequest>,
) -> WalletResult<Json<ApprovePaymentResponse>>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let admin_id = admin_principal(&headers)?;
    let use_case = ReviewPaymentProofUseCase::new(
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    let output = use_case
        .approve(ApprovePaymentInput {
            proof_id: PaymentProofId::from_uuid(id),
            admin_id,
            notes: req.notes,
        })
        .await?;

    Ok(Json(ApprovePaymentResponse {
        proof: output.proof.into(),
        transaction: output.transaction.map(Into::into),
    }))
}

/// PUT /api/admin/payments/{id}/reject
pub async fn reject_payment_proof<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<RejectRequest>,
) -> WalletResult<Json<PaymentProofResponse>>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let admin_id = admin_principal(&headers)?;
    let use_case = ReviewPaymentProofUseCase::new(
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    let proof = use_case
        .reject(RejectPaymentInput {
            proof_id: PaymentProofId::from_uuid(id),
            admin_id,
            reason: req.reason,
        })
        .await?;

    Ok(Json(proof.into()))
}

// ============================================================================
// Admin: Crypto Networks
// ============================================================================

/// GET /api/admin/crypto-networks
pub async fn list_crypto_networks<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
) -> WalletResult<Json<Vec<CryptoNetworkResponse>>>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    admin_principal(&headers)?;
    let networks = CryptoNetworkUseCase::new(state.repo.clone()).list(false).await?;
    Ok(Json(networks.into_iter().map(Into::into).collect()))
}

/// POST /api/admin/crypto-networks
pub async fn create_crypto_network<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
    Json(req): Json<CreateCryptoNetworkRequest>,
) -> WalletResult<(StatusCode, Json<CryptoNetworkResponse>)>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let admin_id = admin_principal(&headers)?;
    let network = CryptoNetworkUseCase::new(state.repo.clone())
        .create(req.into(), admin_id)
        .await?;

    Ok((StatusCode::CREATED, Json(network.into())))
}

/// PUT /api/admin/crypto-networks/{id}
pub async fn update_crypto_network<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCryptoNetworkRequest>,
) -> WalletResult<Json<CryptoNetworkResponse>>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let admin_id = admin_principal(&headers)?;
    let network = CryptoNetworkUseCase::new(state.repo.clone())
        .update(CryptoNetworkId::from_uuid(id), req.into(), admin_id)
        .await?;

    Ok(Json(network.into()))
}

/// DELETE /api/admin/crypto-networks/{id}
pub async fn delete_crypto_network<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> WalletResult<StatusCode>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let admin_id = admin_principal(&headers)?;
    CryptoNetworkUseCase::new(state.repo.clone())
        .delete(CryptoNetworkId::from_uuid(id), admin_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Admin: Crypto Deposits
// ============================================================================

/// PUT /api/admin/crypto/{id}/approve
pub async fn approve_crypto_deposit<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<ApproveRequest>,
) -> WalletResult<Json<TransactionResponse>>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let admin_id = admin_principal(&headers)?;
    let use_case = CryptoDepositUseCase::new(
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    let transaction = use_case
        .approve(ApproveCryptoDepositInput {
            transaction_id: TransactionId::from_uuid(id),
            admin_id,
            notes: req.notes,
        })
        .await?;

    Ok(Json(transaction.into()))
}

/// PUT /api/admin/crypto/{id}/reject
pub async fn reject_crypto_deposit<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<RejectRequest>,
) -> WalletResult<Json<TransactionResponse>>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let admin_id = admin_principal(&headers)?;
    let use_case = CryptoDepositUseCase::new(
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    let transaction = use_case
        .reject(RejectCryptoDepositInput {
            transaction_id: TransactionId::from_uuid(id),
            admin_id,
            reason: req.reason,
        })
        .await?;

    Ok(Json(transaction.into()))
}

// ============================================================================
// Admin: Earnings
// ============================================================================

/// POST /api/admin/mining/sessions/completed
pub async fn mining_session_completed<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
    Json(req): Json<MiningSessionCompletedRequest>,
) -> WalletResult<Json<MiningCreditResponse>>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    admin_principal(&headers)?;
    let use_case = CreditEarningsUseCase::new(state.repo.clone(), state.config.clone());

    let transaction = use_case
        .mining_session_completed(MiningSessionCompletedInput {
            user_id: UserId::from_uuid(req.user_id),
            session_id: req.session_id,
            earned_coins: req.earned_coins,
        })
        .await?;

    Ok(Json(MiningCreditResponse {
        transaction: transaction.map(Into::into),
    }))
}

/// POST /api/admin/referrals/bonus
pub async fn referral_bonus<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
    Json(req): Json<ReferralBonusRequest>,
) -> WalletResult<(StatusCode, Json<TransactionResponse>)>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let admin_id = admin_principal(&headers)?;
    let use_case = CreditEarningsUseCase::new(state.repo.clone(), state.config.clone());

    let transaction = use_case
        .referral_bonus(ReferralBonusInput {
            referrer_id: UserId::from_uuid(req.referrer_id),
            referral_id: req.referral_id,
            coins: req.coins,
            admin_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(transaction.into())))
}

// ============================================================================
// Admin: Reports
// ============================================================================

/// GET /api/admin/reports/mined-coins
pub async fn mined_coins_report<R, N>(
    State(state): State<WalletAppState<R, N>>,
    headers: HeaderMap,
    Query(query): Query<MinedReportQuery>,
) -> WalletResult<Json<MinedCoinsResponse>>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    admin_principal(&headers)?;

    let report = WalletQueries::new(state.repo.clone())
        .mined_report(query.user_id.map(UserId::from_uuid))
        .await?;

    Ok(Json(report.into()))
}
