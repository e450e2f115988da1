use thiserror::Error;

/// Errors from the rate lookup client.
///
/// The ledger treats every variant uniformly as a failed lookup; the split
/// exists for logging and tests.
#[derive(Error, Debug)]
pub enum FxError {
    #[error("Invalid lookup URL: {0}")]
    InvalidUrl(String),

    #[error("Rate lookup request failed: {0}")]
    Request(String),

    #[error("Invalid rate lookup response: {0}")]
    InvalidResponse(String),

    #[error("Unsupported currency in response: {0}")]
    UnsupportedCurrency(String),
}
