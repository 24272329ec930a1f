//! `analytics-migrate` library crate.
//!
//! Holds the configuration and the connect-then-apply sequence so they can
//! be tested without going through the binary.

pub mod config;

use analytics_db::migrate::{apply_migrations, MigrateError, PgMigrationStore, RunSummary};

use crate::config::MigrateConfig;

/// Any failure that should end the process with a non-zero status.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] MigrateError),
}

impl RunError {
    /// Name of the migration unit that failed, if the failure is tied to one.
    pub fn unit_name(&self) -> Option<&str> {
        match self {
            Self::Migrate(err) => err.unit_name(),
            Self::Connect(_) => None,
        }
    }
}

/// Connect using `config` and apply all pending migrations.
///
/// The pool is created here and handed to the applier, which closes it on
/// every exit path.
pub async fn run(config: &MigrateConfig) -> Result<RunSummary, RunError> {
    let pool = analytics_db::create_pool(&config.database_url, config.max_connections)
        .await
        .map_err(RunError::Connect)?;
    tracing::info!("Database connection pool created");

    let store = PgMigrationStore::new(pool);
    let summary = apply_migrations(&store, &config.apply_options()).await?;
    Ok(summary)
}
