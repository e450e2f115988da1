//! Ledger module - the conversion orchestration core.
//!
//! Validates funds, invokes the rate lookup client, accounts for the
//! free-transfer quota and commission, and settles the dual-balance update.

mod ledger_errors;
mod ledger_model;
mod ledger_service;
mod ledger_traits;

pub use ledger_errors::LedgerError;
pub use ledger_model::{
    CommissionPolicy, ConversionRequest, ConversionResult, LedgerPolicy, QuotaPolicy,
};
pub use ledger_service::LedgerService;
pub use ledger_traits::LedgerServiceTrait;
