use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::responses::{
    AccountVerificationResponse, ApiResponse, BalanceResponse, ErrorResponse, HealthResponse,
    StatementResponse, TransactionDetailsResponse, TransactionVerificationResponse,
};
use crate::error::AppError;

use super::routes::AppState;

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

/// Maps a ledger error to its HTTP status and envelope.
pub fn error_response(error: AppError) -> ApiError {
    let status = match &error {
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        AppError::InvalidEntryType(_)
        | AppError::InvalidDebitAmount { .. }
        | AppError::InvalidCreditAmount { .. }
        | AppError::TransactionNotBalanced { .. }
        | AppError::Validation(_) => StatusCode::BAD_REQUEST,
        AppError::InsufficientBalance { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Request failed: {}", error);
        "An internal error occurred".to_string()
    } else {
        error.to_string()
    };

    (
        status,
        Json(ApiResponse::<()>::error(ErrorResponse::new(error.code(), message))),
    )
}

/// Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        entry_count: state.ledger.repository().entry_count(),
    };

    Json(ApiResponse::success(response))
}

/// Liveness check endpoint.
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

/// Prometheus scrape endpoint.
pub async fn metrics_endpoint(State(state): State<AppState>) -> (StatusCode, String) {
    match &state.metrics_handle {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}

// ============================================================================
// Ledger Handlers
// ============================================================================

/// Get the cached balance of an account.
pub async fn get_balance(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<ApiResponse<BalanceResponse>>, ApiError> {
    let balance = state.ledger.get_balance(&account_id).map_err(error_response)?;
    Ok(Json(ApiResponse::success(BalanceResponse::from(balance))))
}

/// Get every entry posted to an account.
pub async fn get_statement(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Json<ApiResponse<StatementResponse>> {
    let entries = state.ledger.get_account_statement(&account_id);
    Json(ApiResponse::success(StatementResponse::new(account_id, entries)))
}

/// Get the entries of a transaction.
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<ApiResponse<TransactionDetailsResponse>>, ApiError> {
    let entries = state.ledger.get_transaction_details(&transaction_id);
    if entries.is_empty() {
        return Err(error_response(AppError::TransactionNotFound(transaction_id)));
    }
    Ok(Json(ApiResponse::success(TransactionDetailsResponse::new(
        transaction_id,
        entries,
    ))))
}

/// Reconcile an account's cached balance against its entries.
pub async fn verify_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<ApiResponse<AccountVerificationResponse>>, ApiError> {
    let verified = state
        .ledger
        .verify_account_balance(&account_id)
        .map_err(error_response)?;

    let message = if verified {
        "cached balance matches ledger entries"
    } else {
        "cached balance does not match ledger entries"
    };

    Ok(Json(ApiResponse::success(AccountVerificationResponse {
        account_id,
        verified,
        message: message.to_string(),
    })))
}

/// Check that a transaction's entries sum to zero.
pub async fn verify_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<ApiResponse<TransactionVerificationResponse>>, ApiError> {
    let (verified, message) = match state.ledger.verify_transaction(&transaction_id) {
        Ok(()) => (true, "transaction entries sum to zero".to_string()),
        Err(e @ AppError::TransactionNotBalanced { .. }) => (false, e.to_string()),
        Err(e) => return Err(error_response(e)),
    };

    Ok(Json(ApiResponse::success(TransactionVerificationResponse {
        transaction_id,
        verified,
        message,
    })))
}
