//! SurrealDB repository implementations.

mod resource;
mod role;

pub use resource::SurrealResourceRepository;
pub use role::SurrealRoleRepository;

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SeqRow {
    next: u64,
}

/// Allocate the next numeric id for `table` from its `_seq` counter.
pub(crate) async fn next_id<C: Connection>(db: &Surreal<C>, table: &str) -> Result<u64, DbError> {
    let mut result = db
        .query("UPSERT type::record('_seq', $table) SET next = (next ?? 0) + 1 RETURN next")
        .bind(("table", table.to_string()))
        .await?;

    let rows: Vec<SeqRow> = result.take(0)?;
    rows.into_iter()
        .next()
        .map(|row| row.next)
        .ok_or_else(|| DbError::Decode(format!("sequence for '{table}' returned no row")))
}
