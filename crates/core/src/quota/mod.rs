//! Quota tracker - per-user pool of commission-free transfers.

mod quota_traits;

pub use quota_traits::QuotaRepositoryTrait;
