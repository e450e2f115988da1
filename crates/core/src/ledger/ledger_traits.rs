use async_trait::async_trait;
use rust_decimal::Decimal;

use super::ledger_model::{ConversionRequest, ConversionResult};
use crate::errors::Result;
use crate::fx::Currency;

/// The presentation-facing contract of the ledger service.
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    /// Runs one conversion attempt end to end. The rate lookup is the only
    /// suspension point; rejections are reported through the returned
    /// `ConversionResult`, persistence failures through `Err`.
    async fn convert(&self, request: ConversionRequest) -> Result<ConversionResult>;

    /// Current balance of the session user in `currency`.
    fn get_balance(&self, currency: Currency) -> Result<Decimal>;

    /// Cumulative commission the session user has been charged in `currency`.
    fn get_total_commission_fees(&self, currency: Currency) -> Result<Decimal>;

    /// Supported currencies, in presentation order.
    fn available_currencies(&self) -> Vec<Currency>;

    /// Human-readable currency name.
    fn display_name(&self, currency: Currency) -> &'static str;
}
