//! Get/set primitives over the `ledger_state` table.
//!
//! These operate on a raw connection so they can run both through the read
//! pool and inside writer-actor jobs.

use diesel::prelude::*;

use super::model::LedgerStateDb;
use crate::schema::ledger_state::dsl::*;

/// Reads the value stored under `key`, if any.
pub(crate) fn get_value(conn: &mut SqliteConnection, key: &str) -> QueryResult<Option<String>> {
    ledger_state
        .filter(state_key.eq(key))
        .select(state_value)
        .first::<String>(conn)
        .optional()
}

/// Writes `value` under `key`, replacing any existing row.
pub(crate) fn set_value(conn: &mut SqliteConnection, key: &str, value: &str) -> QueryResult<()> {
    diesel::replace_into(ledger_state)
        .values(&LedgerStateDb {
            state_key: key.to_string(),
            state_value: value.to_string(),
        })
        .execute(conn)
        .map(|_| ())
}
