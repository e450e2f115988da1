use thiserror::Error;

/// Errors from the ledger service that are not user-facing conversion
/// outcomes. Rejected conversions (insufficient funds, failed lookup,
/// invalid settlement) are reported through `ConversionResult`, not here.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Conversion amount must be positive, got {0}")]
    InvalidAmount(String),
}
