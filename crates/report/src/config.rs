use std::path::PathBuf;
use std::time::Duration;

use analytics_core::config::{self, process_env};
use analytics_core::error::CoreError;

use crate::page::PageSetup;

const DEFAULT_HTML: &str = "project-report.html";
const DEFAULT_PDF: &str = "analytics-platform-report.pdf";
const DEFAULT_CHROME_BIN: &str = "chromium";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Report rendering configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// HTML source of the report.
    pub html_path: PathBuf,
    /// Where the PDF is written.
    pub pdf_path: PathBuf,
    /// Browser executable, looked up on `PATH` when not absolute.
    pub chrome_bin: String,
    /// The browser is killed if it runs longer than this.
    pub timeout: Duration,
    pub page: PageSetup,
}

impl ReportConfig {
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs: u64 = config::parse_or(lookup, "REPORT_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            html_path: config::string_or(lookup, "REPORT_HTML", DEFAULT_HTML).into(),
            pdf_path: config::string_or(lookup, "REPORT_PDF", DEFAULT_PDF).into(),
            chrome_bin: config::string_or(lookup, "CHROME_BIN", DEFAULT_CHROME_BIN),
            timeout: Duration::from_secs(timeout_secs),
            page: PageSetup::default(),
        })
    }
}
