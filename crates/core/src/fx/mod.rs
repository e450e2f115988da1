//! FX (Foreign Exchange) module - currencies and the rate lookup client.

pub mod currency;
mod fx_client;
mod fx_errors;
mod fx_model;
mod fx_traits;

pub use currency::Currency;
pub use fx_client::ExchangeRateClient;
pub use fx_errors::FxError;
pub use fx_model::RateQuote;
pub use fx_traits::RateLookupTrait;
