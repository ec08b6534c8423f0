use crate::config::LedgerSettings;
use crate::error::{AppError, Result};
use crate::models::{AccountBalance, AccountType, LedgerEntry, TransactionType};
use crate::observability::{get_metrics, mask_account_id};
use crate::repositories::{FundsCheck, LedgerRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Account that collects platform fees.
pub const SYSTEM_FEE_ACCOUNT_ID: &str = "system-fee-account";

/// Pool account on the other side of every deposit and withdrawal.
pub const EXTERNAL_BANK_ACCOUNT_ID: &str = "external-bank-pool";

/// Request to move money between two wallets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from_account_id: String,
    pub to_account_id: String,
    /// Minor units, must be positive.
    pub amount: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

impl TransferRequest {
    pub fn new(
        from_account_id: impl Into<String>,
        to_account_id: impl Into<String>,
        amount: i64,
    ) -> Self {
        Self {
            from_account_id: from_account_id.into(),
            to_account_id: to_account_id.into(),
            amount,
            description: String::new(),
            currency: None,
            transaction_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }
}

/// Request to bring external funds into a wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositRequest {
    pub account_id: String,
    pub amount: i64,
    /// Where the money came from, e.g. "external_bank" or "stripe".
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

impl DepositRequest {
    pub fn new(account_id: impl Into<String>, amount: i64, source: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            amount,
            source: source.into(),
            description: String::new(),
            currency: None,
            transaction_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }
}

/// Request to send wallet funds to an external destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub account_id: String,
    pub amount: i64,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

impl WithdrawalRequest {
    pub fn new(
        account_id: impl Into<String>,
        amount: i64,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            amount,
            destination: destination.into(),
            description: String::new(),
            currency: None,
            transaction_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }
}

/// Builds balanced entry sets for wallet operations and hands them to the
/// repository for atomic commit.
pub struct LedgerService {
    repository: Arc<LedgerRepository>,
    settings: LedgerSettings,
}

impl LedgerService {
    pub fn new(repository: Arc<LedgerRepository>, settings: LedgerSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub fn repository(&self) -> &Arc<LedgerRepository> {
        &self.repository
    }

    /// Records a wallet-to-wallet transfer. Returns the transaction id.
    pub fn record_transfer(&self, req: &TransferRequest) -> Result<String> {
        let result = self.transfer(req, 0);
        self.observe(TransactionType::Transfer, req.currency.as_deref(), result)
    }

    /// Records a transfer where the sender also pays `fee_amount` to the
    /// system fee account. A zero fee posts no fee entry.
    pub fn record_transfer_with_fee(&self, req: &TransferRequest, fee_amount: i64) -> Result<String> {
        let result = if fee_amount < 0 {
            Err(AppError::Validation(format!(
                "fee amount must not be negative, got {}",
                fee_amount
            )))
        } else {
            self.transfer(req, fee_amount)
        };
        self.observe(TransactionType::Transfer, req.currency.as_deref(), result)
    }

    /// Records money arriving from outside. No balance precondition applies.
    pub fn record_deposit(&self, req: &DepositRequest) -> Result<String> {
        let result = self.deposit(req);
        self.observe(TransactionType::Deposit, req.currency.as_deref(), result)
    }

    /// Records money leaving to an external destination.
    pub fn record_withdrawal(&self, req: &WithdrawalRequest) -> Result<String> {
        let result = self.withdrawal(req);
        self.observe(TransactionType::Withdrawal, req.currency.as_deref(), result)
    }

    fn transfer(&self, req: &TransferRequest, fee_amount: i64) -> Result<String> {
        require_wallet("from_account_id", &req.from_account_id)?;
        require_wallet("to_account_id", &req.to_account_id)?;
        require_positive(req.amount)?;
        if req.from_account_id == req.to_account_id {
            return Err(AppError::Validation(
                "cannot transfer to the same account".to_string(),
            ));
        }

        let total = req.amount.checked_add(fee_amount).ok_or_else(|| {
            AppError::Validation("amount plus fee exceeds the representable range".to_string())
        })?;

        let transaction_id = self.transaction_id(req.transaction_id.as_deref());
        let currency = self.currency(req.currency.as_deref());

        let debit_description = if fee_amount > 0 {
            format!("Transfer to {} (incl. fee): {}", req.to_account_id, req.description)
        } else {
            format!("Transfer to {}: {}", req.to_account_id, req.description)
        };

        let mut entries = vec![
            self.stamp(LedgerEntry::debit(
                &transaction_id,
                TransactionType::Transfer,
                &req.from_account_id,
                AccountType::UserWallet,
                total,
                &currency,
            ))
            .with_description(debit_description),
            self.stamp(LedgerEntry::credit(
                &transaction_id,
                TransactionType::Transfer,
                &req.to_account_id,
                AccountType::UserWallet,
                req.amount,
                &currency,
            ))
            .with_description(format!(
                "Transfer from {}: {}",
                req.from_account_id, req.description
            )),
        ];

        if fee_amount > 0 {
            entries.push(
                self.stamp(LedgerEntry::credit(
                    &transaction_id,
                    TransactionType::Fee,
                    SYSTEM_FEE_ACCOUNT_ID,
                    AccountType::SystemFee,
                    fee_amount,
                    &currency,
                ))
                .with_description(format!("Transfer fee from {}", req.from_account_id)),
            );
        }

        self.repository
            .create_entries_with_funds_check(entries, &FundsCheck::new(&req.from_account_id, total))?;

        tracing::info!(
            transaction_id = %transaction_id,
            from_account_id = %req.from_account_id,
            to_account_id = %req.to_account_id,
            amount = req.amount,
            fee_amount = fee_amount,
            "Transfer recorded"
        );

        Ok(transaction_id)
    }

    fn deposit(&self, req: &DepositRequest) -> Result<String> {
        require_wallet("account_id", &req.account_id)?;
        require_positive(req.amount)?;

        let transaction_id = self.transaction_id(req.transaction_id.as_deref());
        let currency = self.currency(req.currency.as_deref());

        let entries = vec![
            self.stamp(LedgerEntry::credit(
                &transaction_id,
                TransactionType::Deposit,
                &req.account_id,
                AccountType::UserWallet,
                req.amount,
                &currency,
            ))
            .with_description(format!("Deposit from {}: {}", req.source, req.description)),
            self.stamp(LedgerEntry::debit(
                &transaction_id,
                TransactionType::Deposit,
                EXTERNAL_BANK_ACCOUNT_ID,
                AccountType::ExternalBank,
                req.amount,
                &currency,
            ))
            .with_description(format!("External deposit to {}", req.account_id)),
        ];

        self.repository.create_entries(entries)?;

        tracing::info!(
            transaction_id = %transaction_id,
            account_id = %req.account_id,
            amount = req.amount,
            source = %req.source,
            "Deposit recorded"
        );

        Ok(transaction_id)
    }

    fn withdrawal(&self, req: &WithdrawalRequest) -> Result<String> {
        require_wallet("account_id", &req.account_id)?;
        require_positive(req.amount)?;

        let transaction_id = self.transaction_id(req.transaction_id.as_deref());
        let currency = self.currency(req.currency.as_deref());

        let entries = vec![
            self.stamp(LedgerEntry::debit(
                &transaction_id,
                TransactionType::Withdrawal,
                &req.account_id,
                AccountType::UserWallet,
                req.amount,
                &currency,
            ))
            .with_description(format!(
                "Withdrawal to {}: {}",
                req.destination, req.description
            )),
            self.stamp(LedgerEntry::credit(
                &transaction_id,
                TransactionType::Withdrawal,
                EXTERNAL_BANK_ACCOUNT_ID,
                AccountType::ExternalBank,
                req.amount,
                &currency,
            ))
            .with_description(format!("External withdrawal from {}", req.account_id)),
        ];

        self.repository
            .create_entries_with_funds_check(entries, &FundsCheck::new(&req.account_id, req.amount))?;

        tracing::info!(
            transaction_id = %transaction_id,
            account_id = %req.account_id,
            amount = req.amount,
            destination = %req.destination,
            "Withdrawal recorded"
        );

        Ok(transaction_id)
    }

    /// Cached balance of an account.
    pub fn get_balance(&self, account_id: &str) -> Result<AccountBalance> {
        self.repository.get_balance(account_id)
    }

    /// Every entry posted to an account, oldest first.
    pub fn get_account_statement(&self, account_id: &str) -> Vec<LedgerEntry> {
        self.repository.get_entries_by_account_id(account_id)
    }

    /// Every entry of a transaction, in the order they were built.
    pub fn get_transaction_details(&self, transaction_id: &str) -> Vec<LedgerEntry> {
        self.repository.get_entries_by_transaction_id(transaction_id)
    }

    /// Compares the cached balance with the sum of the account's entries.
    /// A mismatch is reported as `Ok(false)` and left uncorrected.
    pub fn verify_account_balance(&self, account_id: &str) -> Result<bool> {
        let (cached, calculated) = self.repository.reconcile_balance(account_id)?;

        if cached != calculated {
            tracing::warn!(
                account_id = %mask_account_id(account_id, 3),
                cached = cached,
                calculated = calculated,
                "Balance mismatch"
            );
            get_metrics().record_integrity_failure("account_balance");
            return Ok(false);
        }

        Ok(true)
    }

    /// Confirms a transaction's entries sum to zero.
    pub fn verify_transaction(&self, transaction_id: &str) -> Result<()> {
        self.repository.verify_transaction_balance(transaction_id)
    }

    fn stamp(&self, entry: LedgerEntry) -> LedgerEntry {
        entry.with_created_by(&self.settings.created_by)
    }

    fn transaction_id(&self, requested: Option<&str>) -> String {
        match requested {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        }
    }

    fn currency(&self, requested: Option<&str>) -> String {
        match requested {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => self.settings.default_currency.clone(),
        }
    }

    fn observe(
        &self,
        transaction_type: TransactionType,
        currency: Option<&str>,
        result: Result<String>,
    ) -> Result<String> {
        let metrics = get_metrics();
        match &result {
            Ok(_) => {
                metrics.record_transaction_recorded(transaction_type.as_str(), &self.currency(currency))
            }
            Err(e) => {
                tracing::warn!(transaction_type = %transaction_type, error = %e, "Ledger operation rejected");
                metrics.record_transaction_rejected(transaction_type.as_str(), e.code());
            }
        }
        result
    }
}

/// Request account ids must name a user wallet; the system accounts are only
/// posted to by the service itself.
fn require_wallet(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    if value == SYSTEM_FEE_ACCOUNT_ID || value == EXTERNAL_BANK_ACCOUNT_ID {
        return Err(AppError::Validation(format!(
            "{} must be a wallet account, got system account '{}'",
            field, value
        )));
    }
    Ok(())
}

fn require_positive(amount: i64) -> Result<()> {
    if amount <= 0 {
        return Err(AppError::Validation(format!(
            "amount must be positive, got {}",
            amount
        )));
    }
    Ok(())
}
