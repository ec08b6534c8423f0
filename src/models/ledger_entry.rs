use crate::error::{AppError, Result};
use crate::models::currency::{format_amount, minor_to_standard};
use crate::models::AccountType;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Entry type for double-entry bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    /// Money leaving the account; the amount is negative.
    Debit,
    /// Money entering the account; the amount is positive.
    Credit,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Debit => "DEBIT",
            EntryType::Credit => "CREDIT",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "DEBIT" => Ok(EntryType::Debit),
            "CREDIT" => Ok(EntryType::Credit),
            other => Err(AppError::InvalidEntryType(other.to_string())),
        }
    }
}

/// The logical operation an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// User-to-user transfer.
    Transfer,
    /// External funds coming in.
    Deposit,
    /// Funds going out to an external account.
    Withdrawal,
    /// Platform fee charge.
    Fee,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Transfer => "TRANSFER",
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdrawal => "WITHDRAWAL",
            TransactionType::Fee => "FEE",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single immutable entry in the ledger.
/// Every transaction creates at least two entries whose amounts sum to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Assigned by the repository when left empty.
    #[serde(default)]
    pub id: String,
    pub account_id: String,
    pub account_type: AccountType,
    /// Signed amount in minor units: negative for debit, positive for credit.
    pub amount: i64,
    pub currency: String,
    pub entry_type: EntryType,
    pub transaction_id: String,
    pub transaction_type: TransactionType,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl LedgerEntry {
    /// Creates a debit of `amount` minor units. `amount` is the positive
    /// magnitude; the stored amount is its negation. The negation saturates,
    /// so a non-positive `amount` yields an entry that fails [`validate`](Self::validate).
    pub fn debit(
        transaction_id: impl Into<String>,
        transaction_type: TransactionType,
        account_id: impl Into<String>,
        account_type: AccountType,
        amount: i64,
        currency: impl Into<String>,
    ) -> Self {
        Self::new(
            transaction_id.into(),
            transaction_type,
            account_id.into(),
            account_type,
            EntryType::Debit,
            amount.saturating_neg(),
            currency.into(),
        )
    }

    /// Creates a credit of `amount` minor units.
    pub fn credit(
        transaction_id: impl Into<String>,
        transaction_type: TransactionType,
        account_id: impl Into<String>,
        account_type: AccountType,
        amount: i64,
        currency: impl Into<String>,
    ) -> Self {
        Self::new(
            transaction_id.into(),
            transaction_type,
            account_id.into(),
            account_type,
            EntryType::Credit,
            amount,
            currency.into(),
        )
    }

    fn new(
        transaction_id: String,
        transaction_type: TransactionType,
        account_id: String,
        account_type: AccountType,
        entry_type: EntryType,
        amount: i64,
        currency: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            account_id,
            account_type,
            amount,
            currency,
            entry_type,
            transaction_id,
            transaction_type,
            created_at: Utc::now(),
            created_by: String::new(),
            description: String::new(),
            metadata: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = created_by.into();
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Checks the double-entry sign rule: debits are negative, credits are
    /// positive. Zero is invalid for both.
    pub fn validate(&self) -> Result<()> {
        match self.entry_type {
            EntryType::Debit if self.amount >= 0 => Err(AppError::InvalidDebitAmount {
                amount: self.amount,
            }),
            EntryType::Credit if self.amount <= 0 => Err(AppError::InvalidCreditAmount {
                amount: self.amount,
            }),
            _ => Ok(()),
        }
    }

    /// Amount in standard units, e.g. -5000 -> -50.00.
    pub fn display_amount(&self) -> Decimal {
        minor_to_standard(self.amount)
    }

    /// Amount formatted with the currency symbol, e.g. "$50.00".
    pub fn formatted_amount(&self) -> String {
        format_amount(self.amount, &self.currency)
    }
}
