//! Headless-browser PDF rendering.
//!
//! The report HTML is copied, with the print stylesheet injected, into a
//! temporary file beside the source HTML (so relative asset paths still
//! resolve) and the browser is asked to print that file to PDF.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::config::ReportConfig;
use crate::page::print_ready_html;

/// Maximum stderr captured from the browser (64 KiB).
const MAX_STDERR_BYTES: u64 = 64 * 1024;

/// Time the browser may spend loading the page (scripts, fonts, images)
/// before it prints.
const VIRTUAL_TIME_BUDGET_MS: u64 = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("{} not found; create the report HTML before rendering", .0.display())]
    SourceMissing(PathBuf),

    #[error("I/O error while preparing report: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to launch browser '{bin}': {source}")]
    Spawn {
        bin: String,
        #[source]
        source: io::Error,
    },

    #[error("Browser timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    #[error("Browser exited with code {exit_code}: {stderr}")]
    BrowserFailed { exit_code: i32, stderr: String },

    #[error("Browser exited successfully but {} was not written", .0.display())]
    OutputMissing(PathBuf),
}

/// Command-line arguments for printing `source` to `output`.
pub fn browser_args(source: &Path, output: &Path) -> Vec<String> {
    vec![
        "--headless=new".to_string(),
        "--no-sandbox".to_string(),
        "--disable-setuid-sandbox".to_string(),
        "--disable-gpu".to_string(),
        "--no-pdf-header-footer".to_string(),
        "--run-all-compositor-stages-before-draw".to_string(),
        format!("--virtual-time-budget={VIRTUAL_TIME_BUDGET_MS}"),
        format!("--print-to-pdf={}", output.display()),
        source.display().to_string(),
    ]
}

/// Render `config.html_path` to `config.pdf_path`, returning the absolute
/// path of the written PDF.
pub async fn render_pdf(config: &ReportConfig) -> Result<PathBuf, RenderError> {
    if !tokio::fs::try_exists(&config.html_path).await? {
        return Err(RenderError::SourceMissing(config.html_path.clone()));
    }

    let html_path = std::path::absolute(&config.html_path)?;
    let pdf_path = std::path::absolute(&config.pdf_path)?;

    tracing::info!(source = %html_path.display(), "Loading HTML content");
    let html = tokio::fs::read_to_string(&html_path).await?;
    let staged_html = print_ready_html(&html, &config.page);

    let staging_dir = html_path.parent().unwrap_or_else(|| Path::new("."));
    let staged = tempfile::Builder::new()
        .prefix(".report-")
        .suffix(".html")
        .tempfile_in(staging_dir)?;
    tokio::fs::write(staged.path(), staged_html).await?;

    // A stale PDF from an earlier run would hide a browser that silently
    // wrote nothing.
    match tokio::fs::remove_file(&pdf_path).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    tracing::info!(browser = %config.chrome_bin, "Launching browser");
    let mut cmd = Command::new(&config.chrome_bin);
    cmd.args(browser_args(staged.path(), &pdf_path));

    tracing::info!(output = %pdf_path.display(), "Generating PDF");
    run_browser(&mut cmd, &config.chrome_bin, config.timeout).await?;

    if !tokio::fs::try_exists(&pdf_path).await? {
        return Err(RenderError::OutputMissing(pdf_path));
    }

    Ok(pdf_path)
}

/// Run the browser to completion, killing it if `timeout` elapses.
async fn run_browser(cmd: &mut Command, bin: &str, timeout: Duration) -> Result<(), RenderError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let start = Instant::now();
    let mut child = cmd.spawn().map_err(|source| RenderError::Spawn {
        bin: bin.to_string(),
        source,
    })?;

    let stderr_task = tokio::spawn(read_capped(child.stderr.take()));

    // On timeout `child` is dropped, and `kill_on_drop` kills the browser.
    let status = match tokio::time::timeout(timeout, child.wait()).await {
        Ok(status) => status?,
        Err(_elapsed) => {
            return Err(RenderError::Timeout {
                elapsed_ms: millis(start.elapsed()),
            })
        }
    };

    let stderr_bytes = match stderr_task.await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Browser stderr reader task failed");
            Vec::new()
        }
    };
    let stderr = String::from_utf8_lossy(&stderr_bytes).trim().to_string();

    if !status.success() {
        return Err(RenderError::BrowserFailed {
            exit_code: status.code().unwrap_or(-1),
            stderr,
        });
    }

    if !stderr.is_empty() {
        tracing::debug!(stderr = %stderr, "Browser diagnostics");
    }
    Ok(())
}

async fn read_capped<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(h) = handle {
        if let Err(e) = h.take(MAX_STDERR_BYTES).read_to_end(&mut buf).await {
            tracing::debug!(error = %e, read = buf.len(), "Failed to read browser stderr");
        }
    }
    buf
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use tokio::io::ReadBuf;

    use super::*;

    /// Reader that fails on the first poll.
    struct BrokenPipe;

    impl AsyncRead for BrokenPipe {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "stderr closed")))
        }
    }

    #[test]
    fn args_end_with_output_flag_and_source() {
        let args = browser_args(Path::new("/tmp/r.html"), Path::new("/out/report.pdf"));
        let n = args.len();
        assert_eq!(args[n - 2], "--print-to-pdf=/out/report.pdf");
        assert_eq!(args[n - 1], "/tmp/r.html");
        assert!(args.contains(&"--no-sandbox".to_string()));
        assert!(args.contains(&"--disable-setuid-sandbox".to_string()));
    }

    #[test]
    fn display_source_missing() {
        let err = RenderError::SourceMissing(PathBuf::from("project-report.html"));
        assert_eq!(
            err.to_string(),
            "project-report.html not found; create the report HTML before rendering"
        );
    }

    #[test]
    fn display_browser_failed() {
        let err = RenderError::BrowserFailed {
            exit_code: 21,
            stderr: "crashpad".to_string(),
        };
        assert_eq!(err.to_string(), "Browser exited with code 21: crashpad");
    }

    #[tokio::test]
    async fn stderr_capture_is_capped() {
        let noisy = vec![b'x'; 100 * 1024];
        let captured = read_capped(Some(noisy.as_slice())).await;
        assert_eq!(captured.len() as u64, MAX_STDERR_BYTES);
    }

    #[tokio::test]
    async fn stderr_read_error_yields_what_was_read() {
        let captured = read_capped(Some(BrokenPipe)).await;
        assert!(captured.is_empty());
    }

    #[test]
    fn millis_saturates_instead_of_truncating() {
        assert_eq!(millis(Duration::from_millis(1500)), 1500);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }
}
