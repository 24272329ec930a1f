//! Apply-once SQL migrations.
//!
//! [`discover_units`] reads `*.sql` files from a directory in lexicographic
//! order, and [`apply_migrations`] applies each pending unit in its own
//! transaction against a [`MigrationStore`], recording it in the
//! `migrations` ledger.
//!
//! The applier assumes a single runner per database. Concurrent runners are
//! only stopped by the ledger's unique constraint on `name`, unless the
//! advisory lock is enabled via [`ApplyOptions::advisory_lock`].

mod applier;
mod discovery;
mod error;
mod pg_store;
mod store;

pub use applier::{apply_migrations, ApplyOptions, RunSummary};
pub use discovery::{discover_units, MigrationUnit, MIGRATION_SUFFIX};
pub use error::MigrateError;
pub use pg_store::{PgMigrationStore, ADVISORY_LOCK_KEY};
pub use store::MigrationStore;
