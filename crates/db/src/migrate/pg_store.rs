//! PostgreSQL-backed [`MigrationStore`].

use std::collections::HashSet;

use sqlx::pool::PoolConnection;
use sqlx::{Executor, PgPool, Postgres};
use tokio::sync::Mutex;

use super::discovery::MigrationUnit;
use super::store::MigrationStore;
use crate::repositories::LedgerRepo;

/// Key for `pg_advisory_lock`. ASCII "analytic" packed into an `i64`.
pub const ADVISORY_LOCK_KEY: i64 = 0x616e_616c_7974_6963;

/// Applies migrations through a connection pool.
///
/// Each unit gets its own transaction from the pool. The advisory lock, when
/// used, lives on a separate connection held for the duration of the run,
/// since session locks belong to the connection that took them.
pub struct PgMigrationStore {
    pool: PgPool,
    lock_conn: Mutex<Option<PoolConnection<Postgres>>>,
}

impl PgMigrationStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            lock_conn: Mutex::new(None),
        }
    }
}

impl MigrationStore for PgMigrationStore {
    async fn ensure_ledger(&self) -> Result<(), sqlx::Error> {
        LedgerRepo::ensure_table(&self.pool).await
    }

    async fn applied_names(&self) -> Result<HashSet<String>, sqlx::Error> {
        LedgerRepo::applied_names(&self.pool).await
    }

    async fn apply_unit(&self, unit: &MigrationUnit) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // The body may hold several statements, so it goes over the simple
        // query protocol rather than as a prepared statement.
        let outcome = match Executor::execute(&mut *tx, sqlx::raw_sql(&unit.sql)).await {
            Ok(_) => LedgerRepo::record(&mut *tx, &unit.name).await.map(|_| ()),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(()) => tx.commit().await,
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(
                        name = %unit.name,
                        error = %rollback_err,
                        "Rollback failed; the connection will be discarded",
                    );
                }
                Err(err)
            }
        }
    }

    async fn acquire_lock(&self) -> Result<(), sqlx::Error> {
        let mut guard = self.lock_conn.lock().await;
        if guard.is_some() {
            return Ok(());
        }
        let mut conn = self.pool.acquire().await?;
        tracing::info!(key = ADVISORY_LOCK_KEY, "Waiting for migration advisory lock");
        sqlx::query("SELECT pg_advisory_lock($1)")
            .bind(ADVISORY_LOCK_KEY)
            .execute(&mut *conn)
            .await?;
        tracing::info!("Migration advisory lock acquired");
        *guard = Some(conn);
        Ok(())
    }

    async fn release_lock(&self) -> Result<(), sqlx::Error> {
        let Some(mut conn) = self.lock_conn.lock().await.take() else {
            return Ok(());
        };
        let released: bool = sqlx::query_scalar("SELECT pg_advisory_unlock($1)")
            .bind(ADVISORY_LOCK_KEY)
            .fetch_one(&mut *conn)
            .await?;
        if !released {
            tracing::warn!("Migration advisory lock was not held at release time");
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), sqlx::Error> {
        // A lock connection still checked out would make `close` wait forever.
        drop(self.lock_conn.lock().await.take());
        self.pool.close().await;
        Ok(())
    }
}
