//! SQLite storage implementation for the balance tracker.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `centavo-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for balances and the free-transfer quota
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. The core crate is database-agnostic and works with traits. All
//! persisted state lives in one string-keyed table (`ledger_state`); reads go
//! through the pool, writes are serialized through a single writer actor.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod balances;
pub mod quota;
pub mod state;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, spawn_writer, DbPool, WriteHandle};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from centavo-core for convenience
pub use centavo_core::errors::{DatabaseError, Error, Result};
