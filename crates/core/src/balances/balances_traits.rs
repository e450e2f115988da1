use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::fx::Currency;

/// Trait defining the contract for the balance store.
///
/// Balances are keyed by (user, currency). Reads fall back to the currency's
/// opening default without persisting it. Writes overwrite unconditionally;
/// the store accepts negative input - non-negativity is enforced by the
/// ledger service before settlement, not by this layer.
#[async_trait]
pub trait BalanceRepositoryTrait: Send + Sync {
    /// Returns the persisted balance, or the currency default if none exists.
    fn get_balance(&self, user_id: &str, currency: Currency) -> Result<Decimal>;

    /// Overwrites the persisted balance unconditionally.
    async fn set_balance(&self, user_id: &str, currency: Currency, amount: Decimal) -> Result<()>;

    /// Returns the cumulative commission charged in `currency`, or zero.
    fn get_commission_total(&self, user_id: &str, currency: Currency) -> Result<Decimal>;

    /// Adds `amount` to the cumulative commission total for `currency`.
    async fn add_commission(&self, user_id: &str, currency: Currency, amount: Decimal)
        -> Result<()>;
}
