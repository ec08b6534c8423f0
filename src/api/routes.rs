use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::services::LedgerService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<LedgerService>,
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(ledger: Arc<LedgerService>) -> Self {
        Self {
            ledger,
            metrics_handle: None,
        }
    }

    /// Adds metrics handle to the state.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}

/// Creates the main API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        .route("/live", get(handlers::liveness_check))
        // Metrics endpoint
        .route("/metrics", get(handlers::metrics_endpoint))
        // Ledger endpoints
        .route("/api/ledger/balance/:account_id", get(handlers::get_balance))
        .route("/api/ledger/statement/:account_id", get(handlers::get_statement))
        .route("/api/ledger/transaction/:transaction_id", get(handlers::get_transaction))
        .route("/api/ledger/verify/account/:account_id", post(handlers::verify_account))
        .route(
            "/api/ledger/verify/transaction/:transaction_id",
            post(handlers::verify_transaction),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
