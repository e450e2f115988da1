use async_trait::async_trait;
use rust_decimal::Decimal;

use super::currency::Currency;
use super::fx_model::RateQuote;
use crate::errors::Result;

/// Trait defining the contract for rate lookup operations.
///
/// Implementations resolve a (amount, from, to) triple into a converted
/// amount in the resolved target currency, or fail. No caching and no
/// retries are expected from implementations.
#[async_trait]
pub trait RateLookupTrait: Send + Sync {
    async fn lookup(&self, amount: Decimal, from: Currency, to: Currency) -> Result<RateQuote>;
}
