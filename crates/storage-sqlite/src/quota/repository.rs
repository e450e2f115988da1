use std::sync::Arc;

use async_trait::async_trait;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::state::{get_value, quota_key, set_value};
use centavo_core::constants::DEFAULT_FREE_TRANSFERS;
use centavo_core::errors::Result;
use centavo_core::quota::QuotaRepositoryTrait;

pub struct QuotaRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl QuotaRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        QuotaRepository { pool, writer }
    }
}

fn parse_counter(key: &str, raw: &str) -> Result<i32> {
    raw.parse::<i32>().map_err(|e| {
        log::warn!("Malformed quota counter '{}' under key '{}': {}", raw, key, e);
        StorageError::MalformedValue(format!("'{}' under key '{}': {}", raw, key, e)).into()
    })
}

#[async_trait]
impl QuotaRepositoryTrait for QuotaRepository {
    async fn consume_free_transfer(&self, user_id: &str) -> Result<i32> {
        let key = quota_key(user_id);
        // The read and the decrement must not be split across writer jobs.
        self.writer
            .exec(move |conn| {
                let remaining = match get_value(conn, &key).into_core()? {
                    // First use: grant the full allotment; this call does
                    // not count.
                    None => DEFAULT_FREE_TRANSFERS,
                    Some(raw) => (parse_counter(&key, &raw)? - 1).max(0),
                };
                set_value(conn, &key, &remaining.to_string()).into_core()?;
                Ok(remaining)
            })
            .await
    }

    fn peek_free_transfers(&self, user_id: &str) -> Result<i32> {
        let key = quota_key(user_id);
        let mut conn = get_connection(&self.pool)?;
        match get_value(&mut conn, &key).into_core()? {
            None => Ok(DEFAULT_FREE_TRANSFERS),
            Some(raw) => parse_counter(&key, &raw),
        }
    }
}
