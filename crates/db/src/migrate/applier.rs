//! The apply-once run loop.

use std::path::PathBuf;

use super::discovery::{discover_units, MigrationUnit};
use super::error::MigrateError;
use super::store::MigrationStore;

/// Options for a single migration run.
#[derive(Debug, Clone)]
pub struct ApplyOptions {
    /// Directory scanned for `*.sql` units.
    pub migrations_dir: PathBuf,
    /// Hold a database advisory lock for the whole run so that concurrent
    /// runners serialize instead of racing on the ledger.
    pub advisory_lock: bool,
}

/// What a successful run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of `*.sql` units found on disk.
    pub discovered: usize,
    /// Units applied by this run, in order.
    pub applied: Vec<String>,
    /// Units skipped because the ledger already had them.
    pub skipped: Vec<String>,
}

/// Apply every pending unit in `options.migrations_dir` against `store`.
///
/// Units run strictly one after another in file-name order, each in its
/// own transaction. The first failure stops the run: earlier units stay
/// committed, later ones are not attempted. `store` is closed before
/// returning on every path; a close failure is logged and never replaces
/// the run's own result.
pub async fn apply_migrations<S>(
    store: &S,
    options: &ApplyOptions,
) -> Result<RunSummary, MigrateError>
where
    S: MigrationStore,
{
    tracing::info!(
        dir = %options.migrations_dir.display(),
        "Starting database migration process",
    );

    let result = run(store, options).await;

    if let Err(err) = store.close().await {
        tracing::error!(error = %err, "Failed to close database connections");
    }

    match &result {
        Ok(summary) => tracing::info!(
            applied = summary.applied.len(),
            skipped = summary.skipped.len(),
            "Database migration completed successfully",
        ),
        Err(err) => tracing::error!(error = %err, "Error during migration process"),
    }

    result
}

async fn run<S: MigrationStore>(
    store: &S,
    options: &ApplyOptions,
) -> Result<RunSummary, MigrateError> {
    let units = discover_units(&options.migrations_dir).await?;

    if units.is_empty() {
        tracing::info!("No migration files found");
        return Ok(RunSummary::default());
    }

    tracing::info!(count = units.len(), "Found migration files to process");

    store.ensure_ledger().await.map_err(MigrateError::Bootstrap)?;

    if !options.advisory_lock {
        return apply_pending(store, &units).await;
    }

    store.acquire_lock().await.map_err(MigrateError::Lock)?;
    let result = apply_pending(store, &units).await;
    if let Err(err) = store.release_lock().await {
        tracing::warn!(error = %err, "Failed to release migration advisory lock");
    }
    result
}

async fn apply_pending<S: MigrationStore>(
    store: &S,
    units: &[MigrationUnit],
) -> Result<RunSummary, MigrateError> {
    // Loaded once; writes by other runners after this point are not seen.
    let applied_names = store
        .applied_names()
        .await
        .map_err(MigrateError::LoadLedger)?;

    let mut summary = RunSummary {
        discovered: units.len(),
        ..RunSummary::default()
    };

    for unit in units {
        if applied_names.contains(&unit.name) {
            tracing::info!(name = %unit.name, "Migration already applied, skipping");
            summary.skipped.push(unit.name.clone());
            continue;
        }

        tracing::info!(name = %unit.name, "Applying migration");

        if let Err(source) = store.apply_unit(unit).await {
            tracing::error!(name = %unit.name, error = %source, "Error applying migration");
            return Err(MigrateError::Apply {
                name: unit.name.clone(),
                source,
            });
        }

        tracing::info!(name = %unit.name, "Successfully applied migration");
        summary.applied.push(unit.name.clone());
    }

    Ok(summary)
}
