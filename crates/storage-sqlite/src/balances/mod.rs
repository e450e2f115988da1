//! SQLite storage implementation for balances and commission totals.

mod repository;

pub use repository::BalanceRepository;

// Re-export trait from core for convenience
pub use centavo_core::balances::BalanceRepositoryTrait;
