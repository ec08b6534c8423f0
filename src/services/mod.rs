pub mod ledger_service;

pub use ledger_service::{
    DepositRequest, LedgerService, TransferRequest, WithdrawalRequest, EXTERNAL_BANK_ACCOUNT_ID,
    SYSTEM_FEE_ACCOUNT_ID,
};
