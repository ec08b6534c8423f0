mod common;

use wallet_ledger::error::AppError;
use wallet_ledger::models::{AccountType, EntryType, TransactionType};
use wallet_ledger::services::{
    DepositRequest, TransferRequest, WithdrawalRequest, EXTERNAL_BANK_ACCOUNT_ID,
    SYSTEM_FEE_ACCOUNT_ID,
};

#[test]
fn test_deposit_then_transfer() {
    let (_repo, service) = common::setup_ledger();

    let deposit_txn = service
        .record_deposit(&DepositRequest::new("alice", 10_000, "external_bank").with_description("Initial deposit"))
        .expect("Failed to deposit");

    let transfer_txn = service
        .record_transfer(&TransferRequest::new("alice", "bob", 3_000).with_description("Dinner"))
        .expect("Failed to transfer");

    assert_eq!(service.get_balance("alice").unwrap().balance, 7_000);
    assert_eq!(service.get_balance("bob").unwrap().balance, 3_000);
    assert_eq!(service.get_balance(EXTERNAL_BANK_ACCOUNT_ID).unwrap().balance, -10_000);

    let entries = service.get_transaction_details(&transfer_txn);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].account_id, "alice");
    assert_eq!(entries[0].entry_type, EntryType::Debit);
    assert_eq!(entries[0].amount, -3_000);
    assert_eq!(entries[0].description, "Transfer to bob: Dinner");
    assert_eq!(entries[1].account_id, "bob");
    assert_eq!(entries[1].entry_type, EntryType::Credit);
    assert_eq!(entries[1].amount, 3_000);
    assert_eq!(entries[1].description, "Transfer from alice: Dinner");
    assert!(entries.iter().all(|e| e.transaction_type == TransactionType::Transfer));
    assert!(entries.iter().all(|e| e.created_by == "ledger-service"));

    assert!(service.verify_transaction(&deposit_txn).is_ok());
    assert!(service.verify_transaction(&transfer_txn).is_ok());
    assert!(service.verify_account_balance("alice").unwrap());
    assert!(service.verify_account_balance("bob").unwrap());
}

#[test]
fn test_transfer_with_fee() {
    let (_repo, service) = common::setup_ledger();
    common::fund(&service, "alice", 10_000);

    let txn = service
        .record_transfer_with_fee(&TransferRequest::new("alice", "bob", 5_000), 100)
        .expect("Failed to transfer with fee");

    assert_eq!(service.get_balance("alice").unwrap().balance, 4_900);
    assert_eq!(service.get_balance("bob").unwrap().balance, 5_000);

    let fee_balance = service.get_balance(SYSTEM_FEE_ACCOUNT_ID).unwrap();
    assert_eq!(fee_balance.balance, 100);
    assert_eq!(fee_balance.account_type, AccountType::SystemFee);

    let entries = service.get_transaction_details(&txn);
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].amount, -5_100);
    assert_eq!(entries[2].account_id, SYSTEM_FEE_ACCOUNT_ID);
    assert_eq!(entries[2].transaction_type, TransactionType::Fee);
    assert_eq!(entries[2].description, "Transfer fee from alice");
    assert_eq!(entries.iter().map(|e| e.amount).sum::<i64>(), 0);
    assert!(service.verify_transaction(&txn).is_ok());
}

#[test]
fn test_fee_counts_toward_funds_check() {
    let (repo, service) = common::setup_ledger();
    common::fund(&service, "alice", 5_000);

    let result = service.record_transfer_with_fee(&TransferRequest::new("alice", "bob", 5_000), 1);
    assert!(matches!(
        result,
        Err(AppError::InsufficientBalance { available: 5_000, required: 5_001, .. })
    ));
    assert_eq!(repo.entry_count(), 2);
}

#[test]
fn test_insufficient_funds_without_balance_record() {
    let (repo, service) = common::setup_ledger();

    let result = service.record_transfer(&TransferRequest::new("alice", "bob", 5_000));
    assert!(matches!(
        result,
        Err(AppError::InsufficientBalance { available: 0, required: 5_000, .. })
    ));

    assert!(matches!(service.get_balance("alice"), Err(AppError::BalanceNotFound(_))));
    assert!(matches!(service.get_balance("bob"), Err(AppError::BalanceNotFound(_))));
    assert_eq!(repo.entry_count(), 0);
}

#[test]
fn test_insufficient_funds_leaves_balances_untouched() {
    let (_repo, service) = common::setup_ledger();
    common::fund(&service, "alice", 3_000);

    let result = service.record_transfer(&TransferRequest::new("alice", "bob", 5_000));
    assert!(matches!(result, Err(AppError::InsufficientBalance { .. })));

    assert_eq!(service.get_balance("alice").unwrap().balance, 3_000);
    assert!(service.get_balance("bob").is_err());
    assert_eq!(service.get_account_statement("alice").len(), 1);
}

#[test]
fn test_withdrawal() {
    let (_repo, service) = common::setup_ledger();
    common::fund(&service, "alice", 10_000);

    let txn = service
        .record_withdrawal(
            &WithdrawalRequest::new("alice", 4_000, "bank_account").with_description("Rent"),
        )
        .expect("Failed to withdraw");

    assert_eq!(service.get_balance("alice").unwrap().balance, 6_000);
    assert_eq!(service.get_balance(EXTERNAL_BANK_ACCOUNT_ID).unwrap().balance, -6_000);

    let entries = service.get_transaction_details(&txn);
    assert_eq!(entries[0].description, "Withdrawal to bank_account: Rent");
    assert_eq!(entries[1].description, "External withdrawal from alice");

    let result = service.record_withdrawal(&WithdrawalRequest::new("alice", 6_001, "bank_account"));
    assert!(matches!(result, Err(AppError::InsufficientBalance { .. })));
}

#[test]
fn test_statement_ordering() {
    let (_repo, service) = common::setup_ledger();

    let deposit = common::fund(&service, "alice", 10_000);
    let transfer = service
        .record_transfer(&TransferRequest::new("alice", "bob", 2_000))
        .unwrap();
    let withdrawal = service
        .record_withdrawal(&WithdrawalRequest::new("alice", 1_000, "bank_account"))
        .unwrap();

    let statement = service.get_account_statement("alice");
    assert_eq!(statement.len(), 3);
    assert_eq!(statement[0].transaction_id, deposit);
    assert_eq!(statement[1].transaction_id, transfer);
    assert_eq!(statement[2].transaction_id, withdrawal);
    assert_eq!(
        statement.iter().map(|e| e.amount).collect::<Vec<_>>(),
        vec![10_000, -2_000, -1_000]
    );
    assert_eq!(service.get_balance("alice").unwrap().balance, 7_000);
}

#[test]
fn test_unknown_account_statement_is_empty() {
    let (_repo, service) = common::setup_ledger();
    assert!(service.get_account_statement("nobody").is_empty());
    assert!(service.get_transaction_details("nothing").is_empty());
}

#[test]
fn test_transaction_ids_are_unique() {
    let (_repo, service) = common::setup_ledger();
    let first = common::fund(&service, "alice", 100);
    let second = common::fund(&service, "alice", 100);
    assert_ne!(first, second);
    assert_eq!(service.get_balance("alice").unwrap().balance, 200);
}
