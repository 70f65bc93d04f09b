//! Wallet Routers
//!
//! `wallet_router` serves the user side (nested under `/api/wallet`),
//! `admin_router` the review side (nested under `/api/admin`).

use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::application::config::SettlementConfig;
use crate::domain::repository::{NotificationSink, SettlementRepository};
use crate::infra::postgres::{PgNotificationSink, PgSettlementRepository};
use crate::presentation::handlers::{self, WalletAppState};

fn state<R, N>(repo: R, notifier: N, config: SettlementConfig) -> WalletAppState<R, N>
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    WalletAppState {
        repo: Arc::new(repo),
        notifier: Arc::new(notifier),
        config: Arc::new(config),
    }
}

/// Create the user-facing wallet router with PostgreSQL storage
pub fn wallet_router(
    repo: PgSettlementRepository,
    notifier: PgNotificationSink,
    config: SettlementConfig,
) -> Router {
    wallet_router_generic(repo, notifier, config)
}

/// Create the admin router with PostgreSQL storage
pub fn admin_router(
    repo: PgSettlementRepository,
    notifier: PgNotificationSink,
    config: SettlementConfig,
) -> Router {
    admin_router_generic(repo, notifier, config)
}

/// Create a generic wallet router for any repository implementation
pub fn wallet_router_generic<R, N>(repo: R, notifier: N, config: SettlementConfig) -> Router
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(handlers::get_wallet::<R, N>))
        .route("/transactions", get(handlers::list_own_transactions::<R, N>))
        .route("/withdrawals", post(handlers::request_withdrawal::<R, N>))
        .route("/payments/proof", post(handlers::submit_payment_proof::<R, N>))
        .route("/crypto-deposits", post(handlers::record_crypto_deposit::<R, N>))
        .route(
            "/crypto-networks",
            get(handlers::list_active_crypto_networks::<R, N>),
        )
        .with_state(state(repo, notifier, config))
}

/// Create a generic admin router for any repository implementation
pub fn admin_router_generic<R, N>(repo: R, notifier: N, config: SettlementConfig) -> Router
where
    R: SettlementRepository + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/transactions", get(handlers::list_transactions::<R, N>))
        .route(
            "/transactions/withdrawals/pending",
            get(handlers::pending_withdrawals::<R, N>),
        )
        .route(
            "/transactions/withdrawals/{id}/approve",
            put(handlers::approve_withdrawal::<R, N>),
        )
        .route(
            "/transactions/withdrawals/{id}/reject",
            put(handlers::reject_withdrawal::<R, N>),
        )
        .route("/payments", get(handlers::list_payment_proofs::<R, N>))
        .route("/payments/{id}", get(handlers::get_payment_proof::<R, N>))
        .route("/payments/{id}/approve", put(handlers::approve_payment_proof::<R, N>))
        .route("/payments/{id}/reject", put(handlers::reject_payment_proof::<R, N>))
        .route(
            "/crypto-networks",
            get(handlers::list_crypto_networks::<R, N>)
                .post(handlers::create_crypto_network::<R, N>),
        )
        .route(
            "/crypto-networks/{id}",
            put(handlers::update_crypto_network::<R, N>)
                .delete(handlers::delete_crypto_network::<R, N>),
        )
        .route("/crypto/{id}/approve", put(handlers::approve_crypto_deposit::<R, N>))
        .route("/crypto/{id}/reject", put(handlers::reject_crypto_deposit::<R, N>))
        .route(
            "/mining/sessions/completed",
            post(handlers::mining_session_completed::<R, N>),
        )
        .route("/referrals/bonus", post(handlers::referral_bonus::<R, N>))
        .route("/reports/mined-coins", get(handlers::mined_coins_report::<R, N>))
        .with_state(state(repo, notifier, config))
}
