//! Ledger event types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fx::Currency;

/// Events emitted by the ledger service after successful mutations.
///
/// These represent facts about persisted state changes. The presentation
/// layer translates them into display updates.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// One or more balances were overwritten.
    BalancesChanged {
        user_id: String,
        currencies: Vec<Currency>,
    },

    /// A conversion settled: both the debit and the credit are persisted.
    ConversionSettled {
        user_id: String,
        from: Currency,
        to: Currency,
        amount: Decimal,
        converted_amount: Decimal,
        /// Commission charged in the source currency, if the free quota
        /// was exhausted.
        commission: Option<Decimal>,
    },
}

impl LedgerEvent {
    /// Creates a BalancesChanged event.
    pub fn balances_changed(user_id: impl Into<String>, currencies: Vec<Currency>) -> Self {
        Self::BalancesChanged {
            user_id: user_id.into(),
            currencies,
        }
    }

    /// Creates a ConversionSettled event.
    pub fn conversion_settled(
        user_id: impl Into<String>,
        from: Currency,
        to: Currency,
        amount: Decimal,
        converted_amount: Decimal,
        commission: Option<Decimal>,
    ) -> Self {
        Self::ConversionSettled {
            user_id: user_id.into(),
            from,
            to,
            amount,
            converted_amount,
            commission,
        }
    }
}
