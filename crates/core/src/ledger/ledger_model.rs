use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fx::Currency;

/// A conversion request. Transient; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub amount: Decimal,
    pub from: Currency,
    pub to: Currency,
}

impl ConversionRequest {
    pub fn new(amount: Decimal, from: Currency, to: Currency) -> Self {
        Self { amount, from, to }
    }
}

/// Outcome of a conversion attempt, reported exactly once per attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub success: bool,
    pub message: String,
    pub converted_amount: Option<Decimal>,
    pub commission_charged: Option<Decimal>,
}

impl ConversionResult {
    /// A settled conversion.
    pub fn settled(
        message: impl Into<String>,
        converted_amount: Decimal,
        commission_charged: Option<Decimal>,
    ) -> Self {
        Self {
            success: true,
            message: message.into(),
            converted_amount: Some(converted_amount),
            commission_charged,
        }
    }

    /// A rejected conversion. Terminal; no retry follows.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            converted_amount: None,
            commission_charged: None,
        }
    }
}

/// When the free-transfer quota is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuotaPolicy {
    /// Source-faithful: the pre-flight quota check is destructive, so even
    /// a rejected attempt burns a free transfer.
    #[default]
    ConsumeOnCheck,
    /// Corrected: the guard peeks read-only; a unit is consumed only once
    /// settlement succeeds.
    ConsumeOnSettle,
}

/// Whether the commission is actually debited from the source balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommissionPolicy {
    /// Source-faithful: the commission appears in the result message and in
    /// the commission ledger, but only the raw amount is debited.
    #[default]
    NarrativeOnly,
    /// Corrected: `amount + commission` is debited from the source balance
    /// once the free quota is exhausted.
    DebitSource,
}

/// Policy knobs for the two known quirks of the original design.
/// Defaults preserve the original behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerPolicy {
    pub quota: QuotaPolicy,
    pub commission: CommissionPolicy,
}

impl LedgerPolicy {
    /// Both corrections enabled: non-destructive quota check and a real
    /// commission debit.
    pub fn corrected() -> Self {
        Self {
            quota: QuotaPolicy::ConsumeOnSettle,
            commission: CommissionPolicy::DebitSource,
        }
    }
}
