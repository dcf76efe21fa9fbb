//! Application error types

use houseprobe_domain::DomainError;
use thiserror::Error;

/// Application-level errors.
///
/// None of these are produced by a running test case: failures inside a
/// case are reported through `CheckFailure` instead.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The HTTP client could not be set up.
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
