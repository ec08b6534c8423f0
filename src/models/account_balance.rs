use crate::models::currency::{format_amount, minor_to_standard};
use crate::models::{AccountType, LedgerEntry};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cached running balance of an account.
/// Always reconcilable against the sum of the account's ledger entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub account_id: String,
    pub account_type: AccountType,
    /// Balance in minor units.
    pub balance: i64,
    pub currency: String,
    pub updated_at: DateTime<Utc>,
    /// Id of the most recent entry applied to this balance.
    pub last_entry_id: String,
}

impl AccountBalance {
    /// Opens a balance from the first entry posted to an account.
    pub fn opened_by(entry: &LedgerEntry) -> Self {
        Self {
            account_id: entry.account_id.clone(),
            account_type: entry.account_type,
            balance: entry.amount,
            currency: entry.currency.clone(),
            updated_at: Utc::now(),
            last_entry_id: entry.id.clone(),
        }
    }

    /// Moves the balance to `new_balance` as a result of `entry`.
    /// The caller computes `new_balance` with checked arithmetic.
    pub fn apply(&mut self, entry: &LedgerEntry, new_balance: i64) {
        self.balance = new_balance;
        self.updated_at = Utc::now();
        self.last_entry_id = entry.id.clone();
    }

    /// Checks if the balance covers a debit of `amount` minor units.
    pub fn has_sufficient_funds(&self, amount: i64) -> bool {
        self.balance >= amount
    }

    /// Balance in standard units.
    pub fn display_balance(&self) -> Decimal {
        minor_to_standard(self.balance)
    }

    pub fn formatted_balance(&self) -> String {
        format_amount(self.balance, &self.currency)
    }
}
