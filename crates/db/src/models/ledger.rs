use analytics_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row of the `migrations` ledger: one per successfully applied unit.
///
/// `applied_at` is nullable in the schema (it only has a default), so it is
/// decoded as an `Option`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LedgerEntry {
    pub id: DbId,
    pub name: String,
    pub applied_at: Option<Timestamp>,
}
