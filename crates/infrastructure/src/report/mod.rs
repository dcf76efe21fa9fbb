//! Run summary rendering and the JSON report file.

mod json;

use std::path::{Path, PathBuf};

use houseprobe_domain::TestTally;
use serde::Serialize;
use thiserror::Error;

pub use json::{SerializationError, to_json_stable};

/// Verdict printed when no case failed.
pub const ALL_PASSED: &str = "All tests passed";
/// Verdict printed when at least one case failed.
pub const SOME_FAILED: &str = "Some tests failed";

const SUMMARY_HEADER: &str = "============ TEST SUMMARY ============";
const SUMMARY_FOOTER: &str = "====================================";

/// Errors raised while writing the report file.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The tally could not be serialized.
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] SerializationError),

    /// The file or its parent directory could not be written.
    #[error("failed to write report to {path}: {source}")]
    Io {
        /// Target file
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

/// Renders the summary block for a finalized tally.
#[must_use]
pub fn render_summary(tally: &TestTally) -> String {
    format!(
        "{SUMMARY_HEADER}\n\
         Total Tests: {}\n\
         Passed: {}\n\
         Failed: {}\n\
         Warnings: {}\n\
         Duration: {:.2}s\n\
         {SUMMARY_FOOTER}",
        tally.total(),
        tally.passed(),
        tally.failed(),
        tally.warnings(),
        tally.duration_secs(),
    )
}

/// The line printed after the summary block.
#[must_use]
pub const fn verdict(tally: &TestTally) -> &'static str {
    if tally.all_passed() {
        ALL_PASSED
    } else {
        SOME_FAILED
    }
}

/// Report document written at the end of a run.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    /// API the suite ran against.
    pub base_url: &'a str,
    /// Number of completed cases.
    pub total: usize,
    /// True if no case failed.
    pub success: bool,
    /// Counts, timestamps and per-case results.
    #[serde(flatten)]
    pub tally: &'a TestTally,
}

impl<'a> RunReport<'a> {
    /// Builds a report for a finalized tally.
    #[must_use]
    pub const fn new(base_url: &'a str, tally: &'a TestTally) -> Self {
        Self {
            base_url,
            total: tally.total(),
            success: tally.all_passed(),
            tally,
        }
    }
}

/// Writes the report as pretty JSON, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization or any file operation fails.
pub async fn write_report(path: &Path, report: &RunReport<'_>) -> Result<(), ReportError> {
    let json = to_json_stable(report)?;
    let io_err = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    tokio::fs::write(path, json).await.map_err(io_err)?;

    tracing::info!(path = %path.display(), "report written");
    Ok(())
}
