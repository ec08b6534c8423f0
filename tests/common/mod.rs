#![allow(dead_code)]

use std::sync::Arc;

use wallet_ledger::config::LedgerSettings;
use wallet_ledger::repositories::LedgerRepository;
use wallet_ledger::services::{DepositRequest, LedgerService};

/// Fresh store and service for one test.
pub fn setup_ledger() -> (Arc<LedgerRepository>, LedgerService) {
    let repository = Arc::new(LedgerRepository::new());
    let service = LedgerService::new(Arc::clone(&repository), LedgerSettings::default());
    (repository, service)
}

/// Deposits `amount` minor units into `account_id`, returning the transaction id.
pub fn fund(service: &LedgerService, account_id: &str, amount: i64) -> String {
    service
        .record_deposit(&DepositRequest::new(account_id, amount, "external_bank"))
        .expect("Failed to fund account")
}
