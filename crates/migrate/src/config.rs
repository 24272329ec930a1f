use std::path::PathBuf;

use analytics_core::config::{self, process_env};
use analytics_core::error::CoreError;
use analytics_db::migrate::ApplyOptions;

const DEFAULT_MIGRATIONS_DIR: &str = "migrations";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Migration runner configuration loaded from environment variables.
///
/// Deliberately not `Debug`: `database_url` usually carries a password.
#[derive(Clone)]
pub struct MigrateConfig {
    pub database_url: String,
    pub migrations_dir: PathBuf,
    pub advisory_lock: bool,
    pub max_connections: u32,
}

impl MigrateConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(&process_env)
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_connections =
            config::parse_or(lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(CoreError::InvalidEnv {
                var: "DATABASE_MAX_CONNECTIONS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let advisory_lock = config::bool_or(lookup, "MIGRATIONS_ADVISORY_LOCK", false)?;
        // The lock pins one pooled connection for the whole run; the units
        // need another.
        if advisory_lock && max_connections < 2 {
            return Err(CoreError::InvalidEnv {
                var: "DATABASE_MAX_CONNECTIONS",
                value: max_connections.to_string(),
                reason: "must be at least 2 when MIGRATIONS_ADVISORY_LOCK is enabled".to_string(),
            });
        }

        Ok(Self {
            database_url: config::required(lookup, "DATABASE_URL")?,
            migrations_dir: config::string_or(lookup, "MIGRATIONS_DIR", DEFAULT_MIGRATIONS_DIR)
                .into(),
            advisory_lock,
            max_connections,
        })
    }

    pub fn apply_options(&self) -> ApplyOptions {
        ApplyOptions {
            migrations_dir: self.migrations_dir.clone(),
            advisory_lock: self.advisory_lock,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<MigrateConfig, CoreError> {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        MigrateConfig::from_lookup(&|key: &str| map.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn defaults_apply_when_only_url_is_set() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/analytics")]).unwrap();
        assert_eq!(config.database_url, "postgres://localhost/analytics");
        assert_eq!(config.migrations_dir, PathBuf::from("migrations"));
        assert!(!config.advisory_lock);
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn database_url_is_required() {
        let Err(err) = load(&[]) else {
            panic!("expected DATABASE_URL to be required");
        };
        assert_matches!(err, CoreError::MissingEnv("DATABASE_URL"));
    }

    #[test]
    fn overrides_flow_into_apply_options() {
        let config = load(&[
            ("DATABASE_URL", "postgres://db/analytics"),
            ("MIGRATIONS_DIR", "/srv/migrations"),
            ("MIGRATIONS_ADVISORY_LOCK", "true"),
        ])
        .unwrap();
        let options = config.apply_options();
        assert_eq!(options.migrations_dir, PathBuf::from("/srv/migrations"));
        assert!(options.advisory_lock);
    }

    #[test]
    fn zero_connections_is_rejected() {
        let Err(err) = load(&[
            ("DATABASE_URL", "postgres://db/analytics"),
            ("DATABASE_MAX_CONNECTIONS", "0"),
        ]) else {
            panic!("expected zero connections to be rejected");
        };
        assert_matches!(err, CoreError::InvalidEnv { var: "DATABASE_MAX_CONNECTIONS", .. });
    }

    #[test]
    fn advisory_lock_needs_a_second_connection() {
        let Err(err) = load(&[
            ("DATABASE_URL", "postgres://db/analytics"),
            ("MIGRATIONS_ADVISORY_LOCK", "true"),
            ("DATABASE_MAX_CONNECTIONS", "1"),
        ]) else {
            panic!("expected a single connection to be rejected with the advisory lock");
        };
        assert_matches!(
            err,
            CoreError::InvalidEnv { var: "DATABASE_MAX_CONNECTIONS", ref value, .. } if value == "1"
        );
    }

    #[test]
    fn single_connection_is_fine_without_advisory_lock() {
        let config = load(&[
            ("DATABASE_URL", "postgres://db/analytics"),
            ("DATABASE_MAX_CONNECTIONS", "1"),
        ])
        .unwrap();
        assert_eq!(config.max_connections, 1);
        assert!(!config.advisory_lock);
    }
}
