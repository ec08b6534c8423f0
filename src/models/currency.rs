use crate::error::{AppError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of decimal places between minor and standard units.
/// Fixed at 2 for every currency; the currency code is not consulted.
pub const MINOR_UNIT_EXPONENT: u32 = 2;

/// Symbol used when formatting a currency without a known symbol.
pub const GENERIC_CURRENCY_SYMBOL: &str = "\u{a4}";

/// Currencies with a dedicated display symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    USD,
    EUR,
    GBP,
}

impl Currency {
    /// Returns the currency symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{a3}",
        }
    }

    /// Returns the ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = CurrencyParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            _ => Err(CurrencyParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown currency code: {0}")]
pub struct CurrencyParseError(String);

/// Converts minor units (cents) into a standard decimal amount: 5000 -> 50.00.
pub fn minor_to_standard(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNIT_EXPONENT)
}

/// Converts a standard decimal amount into minor units: 50.00 -> 5000.
/// Fractions of a minor unit are truncated toward zero.
pub fn standard_to_minor(amount: Decimal) -> Result<i64> {
    amount
        .checked_mul(Decimal::from(10i64.pow(MINOR_UNIT_EXPONENT)))
        .and_then(|scaled| scaled.trunc().to_i64())
        .ok_or_else(|| {
            AppError::Validation(format!("amount {} is out of range for minor units", amount))
        })
}

/// Formats minor units with the currency symbol: (5000, "USD") -> "$50.00".
pub fn format_amount(minor: i64, currency: &str) -> String {
    let symbol = Currency::from_str(currency)
        .map(|c| c.symbol())
        .unwrap_or(GENERIC_CURRENCY_SYMBOL);
    let standard = minor_to_standard(minor);

    if standard.is_sign_negative() {
        format!("-{}{}", symbol, standard.abs())
    } else {
        format!("{}{}", symbol, standard)
    }
}
