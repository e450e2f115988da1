//! The closed set of supported currencies.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_EUR_BALANCE;
use crate::errors::Error;

/// A supported currency. The set is closed: conversions to or from anything
/// else are rejected at the parsing boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    EUR,
    USD,
    JPY,
}

impl Currency {
    /// All supported currencies, in presentation order.
    pub fn all() -> &'static [Currency] {
        &[Currency::EUR, Currency::USD, Currency::JPY]
    }

    /// The ISO 4217 code, e.g. "EUR".
    pub fn code(&self) -> &'static str {
        match self {
            Currency::EUR => "EUR",
            Currency::USD => "USD",
            Currency::JPY => "JPY",
        }
    }

    /// Human-readable name, used in user-facing messages and as part of
    /// the persisted balance key.
    pub fn display_name(&self) -> &'static str {
        match self {
            Currency::EUR => "Euro",
            Currency::USD => "US Dollar",
            Currency::JPY => "Japanese Yen",
        }
    }

    /// Opening balance for an account that has never been written.
    /// The default is returned on read but never persisted by reading.
    pub fn default_balance(&self) -> Decimal {
        match self {
            Currency::EUR => DEFAULT_EUR_BALANCE,
            Currency::USD | Currency::JPY => Decimal::ZERO,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EUR" => Ok(Currency::EUR),
            "USD" => Ok(Currency::USD),
            "JPY" => Ok(Currency::JPY),
            other => Err(Error::UnsupportedCurrency(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_balances() {
        assert_eq!(Currency::EUR.default_balance(), dec!(1000));
        assert_eq!(Currency::USD.default_balance(), Decimal::ZERO);
        assert_eq!(Currency::JPY.default_balance(), Decimal::ZERO);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Currency::EUR.display_name(), "Euro");
        assert_eq!(Currency::USD.display_name(), "US Dollar");
        assert_eq!(Currency::JPY.display_name(), "Japanese Yen");
    }

    #[test]
    fn test_parse_round_trip() {
        for currency in Currency::all() {
            assert_eq!(currency.code().parse::<Currency>().unwrap(), *currency);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_code() {
        assert!("GBP".parse::<Currency>().is_err());
        assert!("eur".parse::<Currency>().is_err());
    }

    #[test]
    fn test_presentation_order() {
        assert_eq!(
            Currency::all(),
            &[Currency::EUR, Currency::USD, Currency::JPY]
        );
    }
}
