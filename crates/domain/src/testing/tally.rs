//! Pass/fail accounting for one run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::check::CheckOutcome;

/// Final status of one test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    /// Every error-severity expectation held.
    Passed,
    /// An expectation or precondition failed.
    Failed,
}

/// What happened to one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    /// Test case name.
    pub name: String,
    /// Pass or fail.
    pub status: CaseStatus,
    /// Failure message, for failed cases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Warnings recorded by a passing case.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Wall-clock time spent in the check, in milliseconds.
    pub elapsed_ms: u64,
}

impl CaseReport {
    /// Builds a report from a check outcome.
    #[must_use]
    pub fn from_outcome(name: impl Into<String>, outcome: CheckOutcome, elapsed_ms: u64) -> Self {
        let name = name.into();
        match outcome {
            Ok(pass) => Self {
                name,
                status: CaseStatus::Passed,
                message: None,
                warnings: pass.into_warnings(),
                elapsed_ms,
            },
            Err(failure) => Self {
                name,
                status: CaseStatus::Failed,
                message: Some(failure.message().to_string()),
                warnings: Vec::new(),
                elapsed_ms,
            },
        }
    }

    /// Returns true if the case passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == CaseStatus::Passed
    }
}

/// Accumulator for a whole run.
///
/// Counts only grow. `passed + failed` always equals the number of
/// recorded cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestTally {
    passed: usize,
    failed: usize,
    warnings: usize,
    started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    finished_at: Option<DateTime<Utc>>,
    duration_secs: Option<f64>,
    cases: Vec<CaseReport>,
}

impl TestTally {
    /// Starts an empty tally at `started_at`.
    #[must_use]
    pub const fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            passed: 0,
            failed: 0,
            warnings: 0,
            started_at,
            finished_at: None,
            duration_secs: None,
            cases: Vec::new(),
        }
    }

    /// Records one completed case.
    #[must_use]
    pub fn record(mut self, report: CaseReport) -> Self {
        match report.status {
            CaseStatus::Passed => self.passed += 1,
            CaseStatus::Failed => self.failed += 1,
        }
        self.warnings += report.warnings.len();
        self.cases.push(report);
        self
    }

    /// Computes the run duration as `now - started_at`.
    ///
    /// The value is clamped at zero and never shrinks across repeated
    /// calls, even if the clock steps backwards.
    #[must_use]
    pub fn finalize(mut self, now: DateTime<Utc>) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let elapsed = (now - self.started_at).num_milliseconds().max(0) as f64 / 1000.0;
        let previous = self.duration_secs.unwrap_or(0.0);
        self.duration_secs = Some(elapsed.max(previous));
        if self.finished_at.is_none_or(|at| now > at) {
            self.finished_at = Some(now);
        }
        self
    }

    /// Number of passed cases.
    #[must_use]
    pub const fn passed(&self) -> usize {
        self.passed
    }

    /// Number of failed cases.
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.failed
    }

    /// Number of warnings across all passing cases.
    #[must_use]
    pub const fn warnings(&self) -> usize {
        self.warnings
    }

    /// Number of completed cases.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed
    }

    /// Duration in seconds; zero until finalized.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs.unwrap_or(0.0)
    }

    /// Returns true once `finalize` has run.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.duration_secs.is_some()
    }

    /// Per-case reports in execution order.
    #[must_use]
    pub fn cases(&self) -> &[CaseReport] {
        &self.cases
    }

    /// Failed case reports.
    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|c| !c.passed())
    }

    /// Returns true if no case failed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
