use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AccountBalance, AccountType, EntryType, LedgerEntry, TransactionType};

/// Standard API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(error: ErrorResponse) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub entry_count: usize,
}

/// Ledger entry DTO with the amount in standard units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntryResponse {
    pub id: String,
    pub account_id: String,
    pub account_type: AccountType,
    pub transaction_id: String,
    pub transaction_type: TransactionType,
    pub entry_type: EntryType,
    pub amount: Decimal,
    pub amount_minor: i64,
    pub formatted_amount: String,
    pub currency: String,
    pub description: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl From<LedgerEntry> for LedgerEntryResponse {
    fn from(entry: LedgerEntry) -> Self {
        Self {
            amount: entry.display_amount(),
            formatted_amount: entry.formatted_amount(),
            amount_minor: entry.amount,
            id: entry.id,
            account_id: entry.account_id,
            account_type: entry.account_type,
            transaction_id: entry.transaction_id,
            transaction_type: entry.transaction_type,
            entry_type: entry.entry_type,
            currency: entry.currency,
            description: entry.description,
            created_by: entry.created_by,
            created_at: entry.created_at,
            metadata: entry.metadata,
        }
    }
}

/// Balance DTO.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub account_id: String,
    pub account_type: AccountType,
    pub balance: Decimal,
    pub balance_minor: i64,
    pub formatted_balance: String,
    pub currency: String,
    pub last_entry_id: String,
    pub updated_at: DateTime<Utc>,
}

impl From<AccountBalance> for BalanceResponse {
    fn from(balance: AccountBalance) -> Self {
        Self {
            balance: balance.display_balance(),
            formatted_balance: balance.formatted_balance(),
            balance_minor: balance.balance,
            account_id: balance.account_id,
            account_type: balance.account_type,
            currency: balance.currency,
            last_entry_id: balance.last_entry_id,
            updated_at: balance.updated_at,
        }
    }
}

/// Account statement, oldest entry first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementResponse {
    pub account_id: String,
    pub entries: Vec<LedgerEntryResponse>,
    pub count: usize,
}

impl StatementResponse {
    pub fn new(account_id: impl Into<String>, entries: Vec<LedgerEntry>) -> Self {
        let entries: Vec<LedgerEntryResponse> = entries.into_iter().map(Into::into).collect();
        Self {
            account_id: account_id.into(),
            count: entries.len(),
            entries,
        }
    }
}

/// All entries of one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDetailsResponse {
    pub transaction_id: String,
    pub entries: Vec<LedgerEntryResponse>,
    pub count: usize,
}

impl TransactionDetailsResponse {
    pub fn new(transaction_id: impl Into<String>, entries: Vec<LedgerEntry>) -> Self {
        let entries: Vec<LedgerEntryResponse> = entries.into_iter().map(Into::into).collect();
        Self {
            transaction_id: transaction_id.into(),
            count: entries.len(),
            entries,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountVerificationResponse {
    pub account_id: String,
    pub verified: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionVerificationResponse {
    pub transaction_id: String,
    pub verified: bool,
    pub message: String,
}
