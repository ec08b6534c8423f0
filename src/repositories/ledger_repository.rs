use crate::error::{AppError, Result};
use crate::models::{AccountBalance, LedgerEntry};
use crate::observability::{get_metrics, mask_account_id, LatencyTimer};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// A balance precondition checked under the same write lock as the commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundsCheck {
    pub account_id: String,
    /// Minor units the account must hold.
    pub required: i64,
}

impl FundsCheck {
    pub fn new(account_id: impl Into<String>, required: i64) -> Self {
        Self {
            account_id: account_id.into(),
            required,
        }
    }
}

/// Append-only entry log with per-key indices into it, plus the balance cache.
#[derive(Debug, Default)]
struct LedgerState {
    entries: Vec<LedgerEntry>,
    by_id: HashMap<String, usize>,
    by_account: HashMap<String, Vec<usize>>,
    by_transaction: HashMap<String, Vec<usize>>,
    balances: HashMap<String, AccountBalance>,
}

impl LedgerState {
    fn collect(&self, positions: Option<&Vec<usize>>) -> Vec<LedgerEntry> {
        positions
            .map(|idx| idx.iter().map(|&i| self.entries[i].clone()).collect())
            .unwrap_or_default()
    }

    fn check_funds(&self, check: &FundsCheck) -> Result<()> {
        // An account with no balance record has nothing to spend.
        let balance = self.balances.get(&check.account_id);
        if balance.map_or(true, |b| !b.has_sufficient_funds(check.required)) {
            let available = balance.map(|b| b.balance).unwrap_or(0);
            tracing::warn!(
                account_id = %mask_account_id(&check.account_id, 3),
                available = available,
                required = check.required,
                "Insufficient balance"
            );
            return Err(AppError::InsufficientBalance {
                account_id: check.account_id.clone(),
                available,
                required: check.required,
            });
        }
        Ok(())
    }

    /// Validates a whole set, assigns missing ids, and computes each entry's
    /// post-balance. Leaves the ledger state untouched.
    fn prepare(
        &self,
        entries: &mut [LedgerEntry],
        enforce_zero_sum: bool,
    ) -> Result<Vec<i64>> {
        if entries.is_empty() {
            return Err(AppError::Validation("entry set is empty".to_string()));
        }

        for (i, entry) in entries.iter().enumerate() {
            if let Err(e) = entry.validate() {
                tracing::warn!(index = i, transaction_id = %entry.transaction_id, "Invalid ledger entry: {}", e);
                return Err(e);
            }
        }

        if enforce_zero_sum {
            let sum: i128 = entries.iter().map(|e| e.amount as i128).sum();
            if sum != 0 {
                tracing::warn!(sum = %sum, "Entry set does not balance");
                return Err(AppError::TransactionNotBalanced { sum });
            }
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in entries.iter_mut() {
            if entry.id.is_empty() {
                entry.id = Uuid::new_v4().to_string();
            }
            if self.by_id.contains_key(&entry.id) || !seen.insert(entry.id.clone()) {
                return Err(AppError::Validation(format!(
                    "duplicate ledger entry id '{}'",
                    entry.id
                )));
            }
        }

        let mut running: HashMap<&str, i64> = HashMap::new();
        let mut post_balances = Vec::with_capacity(entries.len());
        for entry in entries.iter() {
            let prior = running
                .get(entry.account_id.as_str())
                .copied()
                .or_else(|| self.balances.get(&entry.account_id).map(|b| b.balance))
                .unwrap_or(0);
            let next = prior.checked_add(entry.amount).ok_or_else(|| {
                AppError::Validation(format!(
                    "balance of account '{}' would overflow",
                    entry.account_id
                ))
            })?;
            running.insert(entry.account_id.as_str(), next);
            post_balances.push(next);
        }

        Ok(post_balances)
    }

    /// Appends a prepared set, then updates the balance of every affected account.
    fn append(&mut self, entries: Vec<LedgerEntry>, post_balances: Vec<i64>) -> Vec<LedgerEntry> {
        let first = self.entries.len();

        for entry in entries {
            let position = self.entries.len();
            self.by_id.insert(entry.id.clone(), position);
            self.by_account
                .entry(entry.account_id.clone())
                .or_default()
                .push(position);
            self.by_transaction
                .entry(entry.transaction_id.clone())
                .or_default()
                .push(position);
            self.entries.push(entry);
        }

        for (entry, new_balance) in self.entries[first..].iter().zip(post_balances) {
            match self.balances.get_mut(&entry.account_id) {
                Some(balance) => {
                    balance.apply(entry, new_balance);
                    tracing::debug!(
                        account_id = %entry.account_id,
                        balance = new_balance,
                        "Account balance updated"
                    );
                }
                None => {
                    self.balances
                        .insert(entry.account_id.clone(), AccountBalance::opened_by(entry));
                    tracing::debug!(
                        account_id = %entry.account_id,
                        balance = new_balance,
                        "Account balance created"
                    );
                }
            }
        }

        self.entries[first..].to_vec()
    }
}

/// In-memory ledger store. The only component that mutates the entry log or
/// the balance cache; every write holds the lock for its whole
/// validate-append-update sequence.
#[derive(Debug, Default)]
pub struct LedgerRepository {
    state: RwLock<LedgerState>,
}

impl LedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a single entry. Checks the sign rule but not the zero-sum rule.
    pub fn create_entry(&self, entry: LedgerEntry) -> Result<LedgerEntry> {
        let mut created = self.commit(vec![entry], false, None)?;
        created
            .pop()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("single entry commit returned nothing")))
    }

    /// Appends a balanced set of entries atomically: either all are stored and
    /// all affected balances updated, or nothing changes.
    pub fn create_entries(&self, entries: Vec<LedgerEntry>) -> Result<Vec<LedgerEntry>> {
        self.commit(entries, true, None)
    }

    /// Like [`create_entries`](Self::create_entries), but first requires the
    /// cached balance of `check.account_id` to cover `check.required`.
    pub fn create_entries_with_funds_check(
        &self,
        entries: Vec<LedgerEntry>,
        check: &FundsCheck,
    ) -> Result<Vec<LedgerEntry>> {
        self.commit(entries, true, Some(check))
    }

    fn commit(
        &self,
        mut entries: Vec<LedgerEntry>,
        enforce_zero_sum: bool,
        check: Option<&FundsCheck>,
    ) -> Result<Vec<LedgerEntry>> {
        let timer = LatencyTimer::new();
        let mut state = self.state.write();

        if let Some(check) = check {
            state.check_funds(check)?;
        }
        let post_balances = state.prepare(&mut entries, enforce_zero_sum)?;
        let created = state.append(entries, post_balances);
        drop(state);

        for entry in &created {
            tracing::info!(
                entry_id = %entry.id,
                account_id = %entry.account_id,
                amount = entry.amount,
                entry_type = %entry.entry_type,
                transaction_id = %entry.transaction_id,
                "Ledger entry created"
            );
        }

        let metrics = get_metrics();
        metrics.record_entries_appended(created.len());
        metrics.record_ledger_write_latency(timer.elapsed_ms());

        Ok(created)
    }

    /// Finds a ledger entry by ID.
    pub fn get_entry_by_id(&self, id: &str) -> Result<LedgerEntry> {
        let state = self.state.read();
        state
            .by_id
            .get(id)
            .map(|&i| state.entries[i].clone())
            .ok_or_else(|| AppError::EntryNotFound(id.to_string()))
    }

    /// All entries for an account, in insertion order. Empty for unknown accounts.
    pub fn get_entries_by_account_id(&self, account_id: &str) -> Vec<LedgerEntry> {
        let state = self.state.read();
        let entries = state.collect(state.by_account.get(account_id));
        tracing::debug!(account_id = %account_id, count = entries.len(), "Fetched account entries");
        entries
    }

    /// All entries for a transaction, in insertion order.
    pub fn get_entries_by_transaction_id(&self, transaction_id: &str) -> Vec<LedgerEntry> {
        let state = self.state.read();
        let entries = state.collect(state.by_transaction.get(transaction_id));
        tracing::debug!(transaction_id = %transaction_id, count = entries.len(), "Fetched transaction entries");
        entries
    }

    /// Returns the cached balance without recomputing it.
    pub fn get_balance(&self, account_id: &str) -> Result<AccountBalance> {
        self.state
            .read()
            .balances
            .get(account_id)
            .cloned()
            .ok_or_else(|| AppError::BalanceNotFound(account_id.to_string()))
    }

    /// Recomputes an account's balance from the entry log. Zero for unknown accounts.
    pub fn calculate_balance_from_entries(&self, account_id: &str) -> i64 {
        let state = self.state.read();
        state
            .by_account
            .get(account_id)
            .map(|idx| idx.iter().map(|&i| state.entries[i].amount).sum())
            .unwrap_or(0)
    }

    /// Cached and recomputed balance of an account, read under one lock.
    pub fn reconcile_balance(&self, account_id: &str) -> Result<(i64, i64)> {
        let state = self.state.read();
        let cached = state
            .balances
            .get(account_id)
            .map(|b| b.balance)
            .ok_or_else(|| AppError::BalanceNotFound(account_id.to_string()))?;
        let calculated = state
            .by_account
            .get(account_id)
            .map(|idx| idx.iter().map(|&i| state.entries[i].amount).sum())
            .unwrap_or(0);
        Ok((cached, calculated))
    }

    /// Confirms that the entries of a transaction sum to zero.
    pub fn verify_transaction_balance(&self, transaction_id: &str) -> Result<()> {
        let state = self.state.read();
        let sum: i128 = state
            .by_transaction
            .get(transaction_id)
            .map(|idx| idx.iter().map(|&i| state.entries[i].amount as i128).sum())
            .unwrap_or(0);

        if sum != 0 {
            tracing::warn!(transaction_id = %transaction_id, sum = %sum, "Transaction does not balance");
            get_metrics().record_integrity_failure("transaction_balance");
            return Err(AppError::TransactionNotBalanced { sum });
        }

        tracing::debug!(transaction_id = %transaction_id, "Transaction verified");
        Ok(())
    }

    /// Number of entries in the log.
    pub fn entry_count(&self) -> usize {
        self.state.read().entries.len()
    }

    #[cfg(test)]
    pub(crate) fn overwrite_cached_balance(&self, account_id: &str, balance: i64) {
        if let Some(cached) = self.state.write().balances.get_mut(account_id) {
            cached.balance = balance;
        }
    }
}
