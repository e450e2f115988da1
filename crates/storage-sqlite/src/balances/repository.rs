use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::state::{balance_key, commission_key, get_value, set_value};
use centavo_core::balances::BalanceRepositoryTrait;
use centavo_core::errors::Result;
use centavo_core::fx::Currency;

pub struct BalanceRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BalanceRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        BalanceRepository { pool, writer }
    }

    fn read_decimal(&self, key: &str) -> Result<Option<Decimal>> {
        let mut conn = get_connection(&self.pool)?;
        let stored = get_value(&mut conn, key).into_core()?;
        stored
            .map(|raw| parse_decimal(key, &raw))
            .transpose()
    }
}

fn parse_decimal(key: &str, raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw).map_err(|e| {
        log::warn!("Malformed balance value '{}' under key '{}': {}", raw, key, e);
        StorageError::MalformedValue(format!("'{}' under key '{}': {}", raw, key, e)).into()
    })
}

#[async_trait]
impl BalanceRepositoryTrait for BalanceRepository {
    fn get_balance(&self, user_id: &str, currency: Currency) -> Result<Decimal> {
        // The default is returned, never written: a fresh account has no row.
        Ok(self
            .read_decimal(&balance_key(user_id, currency))?
            .unwrap_or_else(|| currency.default_balance()))
    }

    async fn set_balance(&self, user_id: &str, currency: Currency, amount: Decimal) -> Result<()> {
        let key = balance_key(user_id, currency);
        self.writer
            .exec(move |conn| set_value(conn, &key, &amount.to_string()).into_core())
            .await
    }

    fn get_commission_total(&self, user_id: &str, currency: Currency) -> Result<Decimal> {
        Ok(self
            .read_decimal(&commission_key(user_id, currency))?
            .unwrap_or(Decimal::ZERO))
    }

    async fn add_commission(
        &self,
        user_id: &str,
        currency: Currency,
        amount: Decimal,
    ) -> Result<()> {
        let key = commission_key(user_id, currency);
        // Read-modify-write runs as one writer job, inside one transaction.
        self.writer
            .exec(move |conn| {
                let current = get_value(conn, &key)
                    .into_core()?
                    .map(|raw| parse_decimal(&key, &raw))
                    .transpose()?
                    .unwrap_or(Decimal::ZERO);
                set_value(conn, &key, &(current + amount).to_string()).into_core()
            })
            .await
    }
}
