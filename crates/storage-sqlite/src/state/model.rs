//! Database model for the ledger state key-value pairs.

use diesel::prelude::*;

/// One row of the process-wide string-keyed store.
#[derive(Queryable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::ledger_state)]
pub struct LedgerStateDb {
    pub state_key: String,
    pub state_value: String,
}
