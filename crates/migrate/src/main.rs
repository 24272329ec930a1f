//! `analytics-migrate` -- applies pending SQL migrations and exits.
//!
//! Run it from exactly one place (e.g. a single deploy step). Without
//! `MIGRATIONS_ADVISORY_LOCK`, two concurrent runs can race on the same
//! unit and only the ledger's unique constraint stops the second one.
//!
//! # Environment variables
//!
//! | Variable                   | Required | Default      |
//! |----------------------------|----------|--------------|
//! | `DATABASE_URL`             | yes      | --           |
//! | `MIGRATIONS_DIR`           | no       | `migrations` |
//! | `MIGRATIONS_ADVISORY_LOCK` | no       | `false`      |
//! | `DATABASE_MAX_CONNECTIONS` | no       | `5`          |
//!
//! With the advisory lock enabled the pool needs at least two connections:
//! one holds the lock while the others apply units.
//!
//! Exits `0` when every unit is applied (or there was nothing to do) and
//! `1` on any error.

use analytics_migrate::config::MigrateConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    analytics_core::telemetry::init_tracing("analytics_migrate=info,analytics_db=info");

    let config = MigrateConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    tracing::info!(
        dir = %config.migrations_dir.display(),
        advisory_lock = config.advisory_lock,
        "Loaded migration configuration",
    );

    if let Err(e) = analytics_migrate::run(&config).await {
        tracing::error!(error = %e, unit = e.unit_name(), "Migration run failed");
        std::process::exit(1);
    }
}
