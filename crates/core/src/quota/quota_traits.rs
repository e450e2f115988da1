use async_trait::async_trait;

use crate::errors::Result;

/// Trait defining the contract for the free-transfer quota tracker.
///
/// The counter is created lazily: the first `consume_free_transfer` call
/// initializes it to the default allotment and returns it without counting
/// as a use. Every later call persists and returns the decremented value,
/// clamped at zero. For a fresh user the returned sequence is
/// 5, 4, 3, 2, 1, 0, 0, ... A returned 0 means no free transfer is
/// available for the current operation.
#[async_trait]
pub trait QuotaRepositoryTrait: Send + Sync {
    /// Destructive read: decrements the counter and returns the number of
    /// free transfers still available, including the one being granted.
    async fn consume_free_transfer(&self, user_id: &str) -> Result<i32>;

    /// Read-only variant: returns the counter without touching it.
    /// Used by the corrected quota policy to check availability before
    /// committing a unit.
    fn peek_free_transfers(&self, user_id: &str) -> Result<i32>;
}
