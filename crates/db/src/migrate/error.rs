use std::io;
use std::path::PathBuf;

/// Failures of a migration run. Every variant is fatal to the run.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// The migrations directory could not be listed.
    #[error("Failed to read migrations directory {}: {source}", dir.display())]
    Discovery {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A discovered unit's body could not be read.
    #[error("Failed to read migration {name}: {source}")]
    ReadUnit {
        name: String,
        #[source]
        source: io::Error,
    },

    /// The ledger table could not be created.
    #[error("Failed to create migrations ledger table: {0}")]
    Bootstrap(#[source] sqlx::Error),

    /// The set of applied names could not be loaded.
    #[error("Failed to load applied migrations: {0}")]
    LoadLedger(#[source] sqlx::Error),

    /// The advisory lock could not be taken.
    #[error("Failed to acquire migration lock: {0}")]
    Lock(#[source] sqlx::Error),

    /// A unit's statements or its ledger insert failed; its transaction was
    /// rolled back.
    #[error("Error applying migration {name}: {source}")]
    Apply {
        name: String,
        #[source]
        source: sqlx::Error,
    },
}

impl MigrateError {
    /// Name of the unit involved, if the failure is tied to one.
    pub fn unit_name(&self) -> Option<&str> {
        match self {
            Self::ReadUnit { name, .. } | Self::Apply { name, .. } => Some(name),
            _ => None,
        }
    }
}
