mod common;

use std::sync::Arc;
use std::thread;

use wallet_ledger::error::AppError;
use wallet_ledger::models::{AccountType, EntryType, LedgerEntry, TransactionType};
use wallet_ledger::repositories::{FundsCheck, LedgerRepository};
use wallet_ledger::services::TransferRequest;

fn transfer_entries(txn: &str, from: &str, to: &str, amount: i64) -> Vec<LedgerEntry> {
    vec![
        LedgerEntry::debit(txn, TransactionType::Transfer, from, AccountType::UserWallet, amount, "USD"),
        LedgerEntry::credit(txn, TransactionType::Transfer, to, AccountType::UserWallet, amount, "USD"),
    ]
}

#[test]
fn test_create_entries_updates_every_balance() {
    let repo = LedgerRepository::new();
    let created = repo
        .create_entries(transfer_entries("t1", "alice", "bob", 2_500))
        .expect("Failed to create entries");

    assert_eq!(created.len(), 2);
    assert_eq!(repo.entry_count(), 2);

    let alice = repo.get_balance("alice").unwrap();
    assert_eq!(alice.balance, -2_500);
    assert_eq!(alice.last_entry_id, created[0].id);
    assert_eq!(alice.currency, "USD");

    let bob = repo.get_balance("bob").unwrap();
    assert_eq!(bob.balance, 2_500);
    assert_eq!(bob.last_entry_id, created[1].id);
}

#[test]
fn test_unbalanced_set_rejected_atomically() {
    let repo = LedgerRepository::new();
    let mut entries = transfer_entries("t1", "alice", "bob", 1_000);
    entries[1].amount = 900;

    let result = repo.create_entries(entries);
    assert!(matches!(result, Err(AppError::TransactionNotBalanced { sum: -100 })));
    assert_eq!(repo.entry_count(), 0);
    assert!(repo.get_balance("alice").is_err());
    assert!(repo.get_entries_by_transaction_id("t1").is_empty());
}

#[test]
fn test_invalid_entry_in_set_rejects_whole_set() {
    let repo = LedgerRepository::new();
    let mut entries = transfer_entries("t1", "alice", "bob", 1_000);
    entries[0].entry_type = EntryType::Credit;

    let result = repo.create_entries(entries);
    assert!(matches!(result, Err(AppError::InvalidCreditAmount { amount: -1_000 })));
    assert_eq!(repo.entry_count(), 0);
}

#[test]
fn test_create_entry_skips_zero_sum_rule() {
    let repo = LedgerRepository::new();
    let entry = LedgerEntry::credit("t1", TransactionType::Deposit, "alice", AccountType::UserWallet, 700, "EUR");
    let created = repo.create_entry(entry).expect("Failed to create entry");

    assert_eq!(repo.get_entry_by_id(&created.id).unwrap(), created);
    assert_eq!(repo.get_balance("alice").unwrap().balance, 700);
    assert!(matches!(
        repo.verify_transaction_balance("t1"),
        Err(AppError::TransactionNotBalanced { sum: 700 })
    ));
}

#[test]
fn test_create_entry_rejects_zero_amount() {
    let repo = LedgerRepository::new();
    let entry = LedgerEntry::debit("t1", TransactionType::Fee, "alice", AccountType::UserWallet, 0, "USD");
    assert!(matches!(
        repo.create_entry(entry),
        Err(AppError::InvalidDebitAmount { amount: 0 })
    ));
    assert_eq!(repo.entry_count(), 0);
}

#[test]
fn test_unknown_lookups() {
    let repo = LedgerRepository::new();
    assert!(matches!(repo.get_entry_by_id("missing"), Err(AppError::EntryNotFound(_))));
    assert!(matches!(repo.get_balance("missing"), Err(AppError::BalanceNotFound(_))));
    assert!(repo.get_entries_by_account_id("missing").is_empty());
    assert_eq!(repo.calculate_balance_from_entries("missing"), 0);
    assert!(repo.verify_transaction_balance("missing").is_ok());
}

#[test]
fn test_indices_follow_insertion_order() {
    let repo = LedgerRepository::new();
    repo.create_entries(transfer_entries("t1", "alice", "bob", 100)).unwrap();
    repo.create_entries(transfer_entries("t2", "bob", "alice", 40)).unwrap();
    repo.create_entries(transfer_entries("t3", "alice", "carol", 10)).unwrap();

    let alice: Vec<_> = repo
        .get_entries_by_account_id("alice")
        .into_iter()
        .map(|e| e.transaction_id)
        .collect();
    assert_eq!(alice, vec!["t1", "t2", "t3"]);
    assert_eq!(repo.calculate_balance_from_entries("alice"), -70);
    assert_eq!(repo.get_balance("alice").unwrap().balance, -70);

    let t2 = repo.get_entries_by_transaction_id("t2");
    assert_eq!(t2.len(), 2);
    assert_eq!(t2[0].account_id, "bob");
    assert_eq!(t2[1].account_id, "alice");
}

#[test]
fn test_funds_check_rejects_shortfall() {
    let repo = LedgerRepository::new();
    repo.create_entries(transfer_entries("seed", "pool", "alice", 500)).unwrap();

    let result = repo.create_entries_with_funds_check(
        transfer_entries("t1", "alice", "bob", 600),
        &FundsCheck::new("alice", 600),
    );
    assert!(matches!(
        result,
        Err(AppError::InsufficientBalance { available: 500, required: 600, .. })
    ));

    repo.create_entries_with_funds_check(
        transfer_entries("t2", "alice", "bob", 500),
        &FundsCheck::new("alice", 500),
    )
    .expect("Exact balance should be spendable");
    assert_eq!(repo.get_balance("alice").unwrap().balance, 0);
}

#[test]
fn test_concurrent_transfers_never_overdraw() {
    let (repo, service) = common::setup_ledger();
    common::fund(&service, "alice", 10_000);
    let service = Arc::new(service);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                (0..10)
                    .filter(|_| {
                        service
                            .record_transfer(&TransferRequest::new("alice", format!("user-{}", i), 300))
                            .is_ok()
                    })
                    .count()
            })
        })
        .collect();

    let succeeded: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    // 10_000 / 300 = 33 transfers fit.
    assert_eq!(succeeded, 33);
    let alice = repo.get_balance("alice").unwrap();
    assert_eq!(alice.balance, 100);
    assert_eq!(alice.balance, repo.calculate_balance_from_entries("alice"));
}
