use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use analytics_core::config::{self, process_env};
use analytics_core::error::CoreError;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SERVE_DIR: &str = ".";
const DEFAULT_DOWNLOAD_PAGE: &str = "download-report.html";
const DEFAULT_REPORT_PDF: &str = "analytics-platform-report.pdf";

/// Report server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local use; hosting platforms that
/// assign a port set `PORT`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: IpAddr,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Directory served as static files (default: `.`).
    pub serve_dir: PathBuf,
    /// Page served at `/`, relative to `serve_dir`.
    pub download_page: String,
    /// PDF file name inside `serve_dir`; only used for the startup log.
    pub report_pdf: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var          | Default                          |
    /// |------------------|----------------------------------|
    /// | `HOST`           | `0.0.0.0`                        |
    /// | `PORT`           | `3000`                           |
    /// | `SERVE_DIR`      | `.`                              |
    /// | `DOWNLOAD_PAGE`  | `download-report.html`           |
    /// | `REPORT_PDF`     | `analytics-platform-report.pdf`  |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_host: IpAddr = [0, 0, 0, 0].into();
        Ok(Self {
            host: config::parse_or(lookup, "HOST", default_host)?,
            port: config::parse_or(lookup, "PORT", DEFAULT_PORT)?,
            serve_dir: config::string_or(lookup, "SERVE_DIR", DEFAULT_SERVE_DIR).into(),
            download_page: config::string_or(lookup, "DOWNLOAD_PAGE", DEFAULT_DOWNLOAD_PAGE),
            report_pdf: config::string_or(lookup, "REPORT_PDF", DEFAULT_REPORT_PDF),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
