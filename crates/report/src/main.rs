//! `analytics-report` -- renders `project-report.html` to PDF.
//!
//! # Environment variables
//!
//! | Variable              | Required | Default                          |
//! |-----------------------|----------|----------------------------------|
//! | `REPORT_HTML`         | no       | `project-report.html`            |
//! | `REPORT_PDF`          | no       | `analytics-platform-report.pdf`  |
//! | `CHROME_BIN`          | no       | `chromium`                       |
//! | `REPORT_TIMEOUT_SECS` | no       | `60`                             |

use analytics_report::config::ReportConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    analytics_core::telemetry::init_tracing("analytics_report=info");

    let config = ReportConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    tracing::info!("Starting PDF generation process");

    match analytics_report::render::render_pdf(&config).await {
        Ok(path) => tracing::info!(path = %path.display(), "PDF successfully generated"),
        Err(e) => {
            tracing::error!(error = %e, "Error generating PDF");
            std::process::exit(1);
        }
    }
}
