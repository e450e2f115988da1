//! HTTP rate lookup client.
//!
//! Fetches a converted amount from the commercial exchange endpoint:
//! `GET <base>/{amount}-{FROM}/{TO}/latest`. The response body must be a
//! JSON object with string fields `currency` and `amount`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use rust_decimal::Decimal;

use super::currency::Currency;
use super::fx_errors::FxError;
use super::fx_model::{ExchangeResponse, RateQuote};
use super::fx_traits::RateLookupTrait;
use crate::errors::Result;

const DEFAULT_BASE_URL: &str = "http://api.evp.lt/currency/commercial/exchange";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Rate lookup client backed by the commercial exchange HTTP API.
pub struct ExchangeRateClient {
    client: Client,
    base_url: String,
}

impl Default for ExchangeRateClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ExchangeRateClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn lookup_url(&self, amount: Decimal, from: Currency, to: Currency) -> Result<Url> {
        let raw = format!(
            "{}/{}-{}/{}/latest",
            self.base_url,
            amount,
            from.code(),
            to.code()
        );
        let url = Url::parse(&raw).map_err(|e| FxError::InvalidUrl(e.to_string()))?;
        Ok(url)
    }
}

#[async_trait]
impl RateLookupTrait for ExchangeRateClient {
    async fn lookup(&self, amount: Decimal, from: Currency, to: Currency) -> Result<RateQuote> {
        let url = self.lookup_url(amount, from, to)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FxError::Request(e.to_string()))?;

        let body: ExchangeResponse = response
            .json()
            .await
            .map_err(|e| FxError::InvalidResponse(e.to_string()))?;

        let quote = RateQuote::try_from(body)?;
        Ok(quote)
    }
}
