pub mod account;
pub mod account_balance;
pub mod currency;
pub mod ledger_entry;

pub use account::AccountType;
pub use account_balance::AccountBalance;
pub use currency::{format_amount, minor_to_standard, standard_to_minor, Currency};
pub use ledger_entry::{EntryType, LedgerEntry, TransactionType};
