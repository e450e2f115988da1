use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::currency::Currency;
use super::fx_errors::FxError;

/// A resolved rate lookup: the converted amount in the resolved target
/// currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateQuote {
    pub amount: Decimal,
    pub currency: Currency,
}

/// Wire shape of the exchange endpoint response. The amount is a decimal
/// number encoded as a string; any other shape is a lookup failure.
#[derive(Debug, Deserialize)]
pub(crate) struct ExchangeResponse {
    pub currency: String,
    pub amount: String,
}

impl TryFrom<ExchangeResponse> for RateQuote {
    type Error = FxError;

    fn try_from(response: ExchangeResponse) -> Result<Self, Self::Error> {
        let currency = Currency::from_str(&response.currency)
            .map_err(|_| FxError::UnsupportedCurrency(response.currency.clone()))?;
        let amount = Decimal::from_str(&response.amount).map_err(|e| {
            FxError::InvalidResponse(format!(
                "amount '{}' is not a decimal: {}",
                response.amount, e
            ))
        })?;

        Ok(RateQuote { amount, currency })
    }
}
