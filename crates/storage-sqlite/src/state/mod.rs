//! The string-keyed state table shared by all repositories.

mod keys;
mod kv;
mod model;

pub use keys::{balance_key, commission_key, quota_key};
pub(crate) use kv::{get_value, set_value};
pub use model::LedgerStateDb;
