//! Response and outcome types
//!
//! An `HttpOutcome` is what the tester sees for one HTTP call: either the
//! decoded response or the message of whatever went wrong on the way.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::request::Headers;

/// A decoded House API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body decoded as JSON
    pub body: serde_json::Value,
    /// Response headers
    pub headers: Headers,
    /// Round-trip time
    #[serde(with = "crate::duration_millis")]
    pub duration: Duration,
}

impl ApiResponse {
    /// Creates a new response.
    #[must_use]
    pub const fn new(
        status: u16,
        body: serde_json::Value,
        headers: Headers,
        duration: Duration,
    ) -> Self {
        Self {
            status,
            body,
            headers,
            duration,
        }
    }

    /// Returns a top-level body field if it is present and truthy in the
    /// JavaScript sense: not null, `false`, `0` or `""`.
    #[must_use]
    pub fn truthy_field(&self, field: &str) -> Option<&serde_json::Value> {
        self.body.get(field).filter(|v| is_truthy(v))
    }

    /// Returns the `Content-Type` header, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(crate::request::CONTENT_TYPE)
    }
}

fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;

    match value {
        Value::Null | Value::Bool(false) => false,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Bool(true) | Value::Array(_) | Value::Object(_) => true,
    }
}

/// Result of one HTTP call.
///
/// Transport problems (network errors, timeouts, bodies that are not JSON)
/// are all folded into `Failure`; the message is the only detail kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum HttpOutcome {
    /// The server answered and the body decoded.
    Success(ApiResponse),
    /// The call did not produce a usable response.
    Failure {
        /// Description of the failure.
        message: String,
    },
}

impl HttpOutcome {
    /// Creates a failure outcome.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    /// Returns the response when the call succeeded.
    #[must_use]
    pub const fn response(&self) -> Option<&ApiResponse> {
        match self {
            Self::Success(response) => Some(response),
            Self::Failure { .. } => None,
        }
    }

    /// Returns true for a failure outcome.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Returns the status code when the call succeeded.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Success(response) => Some(response.status),
            Self::Failure { .. } => None,
        }
    }
}
