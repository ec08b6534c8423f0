use thiserror::Error;

/// Result type used throughout the ledger.
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors surfaced by the ledger core and its ambient layers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("entry type must be DEBIT or CREDIT, got '{0}'")]
    InvalidEntryType(String),

    #[error("debit entries must have negative amounts, got {amount}")]
    InvalidDebitAmount { amount: i64 },

    #[error("credit entries must have positive amounts, got {amount}")]
    InvalidCreditAmount { amount: i64 },

    #[error("transaction entries do not sum to zero (sum: {sum})")]
    TransactionNotBalanced { sum: i128 },

    #[error("insufficient balance in account '{account_id}': available {available}, required {required}")]
    InsufficientBalance {
        account_id: String,
        available: i64,
        required: i64,
    },

    #[error("account balance not found: {0}")]
    BalanceNotFound(String),

    #[error("ledger entry not found: {0}")]
    EntryNotFound(String),

    #[error("transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code, shared by the HTTP layer and metrics labels.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidEntryType(_) => "INVALID_ENTRY_TYPE",
            AppError::InvalidDebitAmount { .. } => "INVALID_DEBIT_AMOUNT",
            AppError::InvalidCreditAmount { .. } => "INVALID_CREDIT_AMOUNT",
            AppError::TransactionNotBalanced { .. } => "TRANSACTION_NOT_BALANCED",
            AppError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            AppError::BalanceNotFound(_) => "BALANCE_NOT_FOUND",
            AppError::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            AppError::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true for the lookup failures (unknown balance, entry or transaction).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::BalanceNotFound(_)
                | AppError::EntryNotFound(_)
                | AppError::TransactionNotFound(_)
        )
    }
}
