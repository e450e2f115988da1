//! SQLite storage implementation for the free-transfer quota.

mod repository;

pub use repository::QuotaRepository;

// Re-export trait from core for convenience
pub use centavo_core::quota::QuotaRepositoryTrait;
