use std::collections::HashSet;
use std::future::Future;

use super::discovery::MigrationUnit;

/// The persistence operations the migration applier needs.
///
/// [`PgMigrationStore`](super::PgMigrationStore) is the production
/// implementation. The applier only talks to the database through this
/// trait, so tests can substitute an in-memory double.
pub trait MigrationStore: Send + Sync {
    /// Create the ledger table if it is absent. Must be idempotent.
    fn ensure_ledger(&self) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    /// Load the names of every unit already recorded in the ledger.
    fn applied_names(&self) -> impl Future<Output = Result<HashSet<String>, sqlx::Error>> + Send;

    /// Apply one unit inside a transaction scoped to that unit alone.
    ///
    /// The unit's statements run first, then its ledger entry is inserted,
    /// then the transaction commits. On any failure the transaction is
    /// rolled back in full and the error returned: neither the statements'
    /// effects nor the ledger entry may persist.
    fn apply_unit(
        &self,
        unit: &MigrationUnit,
    ) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    /// Take the run-wide exclusive lock. Held until [`release_lock`].
    ///
    /// [`release_lock`]: MigrationStore::release_lock
    fn acquire_lock(&self) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    /// Drop the run-wide lock. A no-op if it is not held.
    fn release_lock(&self) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    /// Release every connection held by the store. Called exactly once at
    /// the end of a run, on success and failure alike.
    fn close(&self) -> impl Future<Output = Result<(), sqlx::Error>> + Send;
}
