//! Key derivation for the persisted state layout.
//!
//! The layout is part of the external contract: balances are keyed
//! `<CurrencyDisplayName><userId>`, the quota counter `<userId>`, and
//! cumulative commission fees `commissionFees<CODE><userId>`.

use centavo_core::fx::Currency;

/// Key of the persisted balance for (user, currency), e.g. "EurofirstUserID".
pub fn balance_key(user_id: &str, currency: Currency) -> String {
    format!("{}{}", currency.display_name(), user_id)
}

/// Key of the free-transfer counter for a user.
pub fn quota_key(user_id: &str) -> String {
    user_id.to_string()
}

/// Key of the cumulative commission total for (user, currency).
pub fn commission_key(user_id: &str, currency: Currency) -> String {
    format!("commissionFees{}{}", currency.code(), user_id)
}
