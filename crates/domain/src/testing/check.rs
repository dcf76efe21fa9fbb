//! Check procedure outcomes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of one check procedure.
pub type CheckOutcome = Result<CheckPass, CheckFailure>;

/// A check that met all of its expectations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckPass {
    warnings: Vec<String>,
}

impl CheckPass {
    /// A pass with no warnings.
    #[must_use]
    pub const fn clean() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    /// Records a non-fatal observation.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Returns the recorded warnings.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Consumes the pass, returning its warnings.
    #[must_use]
    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }
}

/// A check that did not meet an expectation, or whose precondition failed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct CheckFailure {
    message: String,
}

impl CheckFailure {
    /// Creates a failure with a descriptive message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
