use serde::{Deserialize, Serialize};
use std::fmt;

/// Classifies the account an entry is posted to. Used for reporting only;
/// balance arithmetic is the same for every type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// An individual user's wallet.
    UserWallet,
    /// Platform fee revenue.
    SystemFee,
    /// Pool tracking money held at external banks.
    ExternalBank,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::UserWallet => "USER_WALLET",
            AccountType::SystemFee => "SYSTEM_FEE",
            AccountType::ExternalBank => "EXTERNAL_BANK",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
