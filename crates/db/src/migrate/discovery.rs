//! Migration unit discovery.

use std::path::{Path, PathBuf};

use super::error::MigrateError;

/// File-name suffix that marks a file as a migration unit.
pub const MIGRATION_SUFFIX: &str = ".sql";

/// One named block of SQL, read verbatim from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationUnit {
    /// File name including the suffix, e.g. `001_init.sql`. This is the key
    /// recorded in the ledger.
    pub name: String,
    /// Full path the unit was read from.
    pub path: PathBuf,
    /// Statement block passed to the database as-is.
    pub sql: String,
}

/// List every `*.sql` file directly inside `dir`, sorted by file name, and
/// read its contents.
///
/// Lexicographic order of the file names is the application order, so
/// callers name units with zero-padded or timestamp prefixes. Directories
/// and non-UTF-8 file names are skipped. All bodies are read up front: a
/// read failure aborts before any database work happens.
pub async fn discover_units(dir: &Path) -> Result<Vec<MigrationUnit>, MigrateError> {
    let discovery_err = |source| MigrateError::Discovery {
        dir: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(discovery_err)?;
    let mut found: Vec<(String, PathBuf)> = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(discovery_err)? {
        let Ok(name) = entry.file_name().into_string() else {
            tracing::warn!(path = %entry.path().display(), "Skipping file with non-UTF-8 name");
            continue;
        };
        if !name.ends_with(MIGRATION_SUFFIX) {
            continue;
        }
        let path = entry.path();
        let metadata = tokio::fs::metadata(&path).await.map_err(discovery_err)?;
        if !metadata.is_file() {
            continue;
        }
        found.push((name, path));
    }

    found.sort_by(|a, b| a.0.cmp(&b.0));

    let mut units = Vec::with_capacity(found.len());
    for (name, path) in found {
        let sql = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| MigrateError::ReadUnit {
                name: name.clone(),
                source,
            })?;
        tracing::debug!(name = %name, bytes = sql.len(), "Discovered migration");
        units.push(MigrationUnit { name, path, sql });
    }

    Ok(units)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
