//! Balance store - durable per-currency balances and commission totals.

mod balances_traits;

pub use balances_traits::BalanceRepositoryTrait;
