//! Repository for the `migrations` ledger table.
//!
//! Entries are append-only: nothing in this module updates or deletes rows.

use std::collections::HashSet;

use sqlx::PgExecutor;

use crate::models::ledger::LedgerEntry;

/// Column list for ledger queries.
const COLUMNS: &str = "id, name, applied_at";

/// Ledger DDL. Column names, types and the `name` uniqueness are fixed.
pub const CREATE_LEDGER_TABLE: &str = "\
    CREATE TABLE IF NOT EXISTS migrations (\
        id SERIAL PRIMARY KEY, \
        name TEXT NOT NULL UNIQUE, \
        applied_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()\
    )";

/// Provides query operations for the migrations ledger.
pub struct LedgerRepo;

impl LedgerRepo {
    /// Create the ledger table if it does not already exist.
    pub async fn ensure_table<'e, E>(executor: E) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(CREATE_LEDGER_TABLE).execute(executor).await?;
        Ok(())
    }

    /// Names of every unit recorded as applied.
    pub async fn applied_names<'e, E>(executor: E) -> Result<HashSet<String>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM migrations")
            .fetch_all(executor)
            .await?;
        Ok(names.into_iter().collect())
    }

    /// Append a ledger entry for `name`.
    ///
    /// Fails with a unique-violation if `name` is already recorded.
    pub async fn record<'e, E>(executor: E, name: &str) -> Result<LedgerEntry, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("INSERT INTO migrations (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, LedgerEntry>(&query)
            .bind(name)
            .fetch_one(executor)
            .await
    }

    /// All ledger entries in the order they were applied.
    pub async fn list<'e, E>(executor: E) -> Result<Vec<LedgerEntry>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM migrations ORDER BY id");
        sqlx::query_as::<_, LedgerEntry>(&query)
            .fetch_all(executor)
            .await
    }
}
