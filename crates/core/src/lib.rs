//! Centavo Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for the balance tracker.
//! It is database-agnostic and defines repository traits that are
//! implemented by the `storage-sqlite` crate.

pub mod balances;
pub mod constants;
pub mod errors;
pub mod events;
pub mod fx;
pub mod ledger;
pub mod quota;

// Re-export common types
pub use fx::Currency;
pub use ledger::{ConversionRequest, ConversionResult, LedgerService};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
