//! Response assertions.
//!
//! An `Expectation` pairs an `Assertion` with a severity and an optional
//! failure message. Evaluating a list of expectations against one outcome
//! stops at the first failing `Error`-severity expectation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::check::{CheckFailure, CheckOutcome, CheckPass};
use crate::response::{ApiResponse, HttpOutcome};

/// A test assertion to run against a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Check response status code.
    StatusCode {
        /// Expected status code or range.
        expected: StatusExpectation,
    },
    /// Check the measured round trip against a budget.
    ResponseTime {
        /// Maximum allowed time in milliseconds.
        max_ms: u64,
    },
    /// Check a top-level body field is present and truthy.
    JsonField {
        /// Field name.
        field: String,
    },
    /// Check several top-level body fields are present and truthy.
    JsonFields {
        /// Field names.
        fields: Vec<String>,
    },
    /// Check the body is a JSON array.
    IsJsonArray,
    /// Check content type.
    ContentType {
        /// Expected content type (partial match).
        expected: String,
    },
}

impl Assertion {
    /// Shorthand for an exact status code assertion.
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self::StatusCode {
            expected: StatusExpectation::Exact(code),
        }
    }

    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code {}", expected.description()),
            Self::ResponseTime { max_ms } => format!("Response time < {max_ms}ms"),
            Self::JsonField { field } => format!("JSON field '{field}' present"),
            Self::JsonFields { fields } => format!("JSON fields [{}] present", fields.join(", ")),
            Self::IsJsonArray => "Body is a JSON array".to_string(),
            Self::ContentType { expected } => format!("Content-Type contains '{expected}'"),
        }
    }

    /// Evaluates this assertion.
    ///
    /// `elapsed` is the wall-clock time the caller measured around the
    /// request; only `ResponseTime` looks at it, and it does so even when
    /// the request itself failed.
    #[must_use]
    pub fn evaluate(&self, outcome: &HttpOutcome, elapsed: Duration) -> AssertionResult {
        if let Self::ResponseTime { max_ms } = self {
            return self.check_response_time(elapsed, *max_ms);
        }

        match outcome {
            HttpOutcome::Success(response) => self.evaluate_response(response),
            HttpOutcome::Failure { message } => {
                AssertionResult::fail(self, format!("Request failed: {message}"))
            }
        }
    }

    fn evaluate_response(&self, response: &ApiResponse) -> AssertionResult {
        match self {
            Self::StatusCode { expected } => {
                let actual = response.status;
                if expected.matches(actual) {
                    AssertionResult::pass(self)
                } else {
                    AssertionResult::fail(
                        self,
                        format!("Expected {}, got {actual}", expected.label()),
                    )
                }
            }
            Self::JsonField { field } => {
                if response.truthy_field(field).is_some() {
                    AssertionResult::pass(self)
                } else {
                    AssertionResult::fail(self, format!("Missing field '{field}'"))
                }
            }
            Self::JsonFields { fields } => {
                let missing: Vec<&str> = fields
                    .iter()
                    .filter(|f| response.truthy_field(f).is_none())
                    .map(String::as_str)
                    .collect();
                if missing.is_empty() {
                    AssertionResult::pass(self)
                } else {
                    AssertionResult::fail(
                        self,
                        format!("Missing required fields: {}", missing.join(", ")),
                    )
                }
            }
            Self::IsJsonArray => {
                if response.body.is_array() {
                    AssertionResult::pass(self)
                } else {
                    AssertionResult::fail(
                        self,
                        format!("Expected JSON array body, got {}", json_kind(&response.body)),
                    )
                }
            }
            Self::ContentType { expected } => match response.content_type() {
                Some(actual) if actual.to_lowercase().contains(&expected.to_lowercase()) => {
                    AssertionResult::pass(self)
                }
                Some(actual) => AssertionResult::fail(
                    self,
                    format!("Content-Type '{actual}' does not contain '{expected}'"),
                ),
                None => AssertionResult::fail(self, "Content-Type header not found"),
            },
            Self::ResponseTime { max_ms } => self.check_response_time(response.duration, *max_ms),
        }
    }

    fn check_response_time(&self, elapsed: Duration, max_ms: u64) -> AssertionResult {
        let actual_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        if actual_ms <= max_ms {
            AssertionResult::pass(self)
        } else {
            AssertionResult::fail(
                self,
                format!("Response took {actual_ms}ms (expected < {max_ms}ms)"),
            )
        }
    }
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Expected status code value or range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub const fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => status >= *min && status <= *max,
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
        }
    }

    fn label(&self) -> String {
        match self {
            Self::Exact(code) => code.to_string(),
            Self::Range { min, max } => format!("{min}-{max}"),
        }
    }

    /// Create a "success" expectation (200-299).
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }
}

impl Default for StatusExpectation {
    fn default() -> Self {
        Self::success()
    }
}

/// How a failing assertion affects its test case.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The case fails.
    #[default]
    Error,
    /// The case still passes; a warning is recorded.
    Warning,
}

/// An assertion as used inside a check procedure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Expectation {
    /// What to check.
    #[serde(flatten)]
    pub assertion: Assertion,
    /// Effect of a failure.
    #[serde(default)]
    pub severity: Severity,
    /// Message reported instead of the assertion's own on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Expectation {
    /// An error-severity expectation with the assertion's own message.
    #[must_use]
    pub const fn new(assertion: Assertion) -> Self {
        Self {
            assertion,
            severity: Severity::Error,
            message: None,
        }
    }

    /// A warning-severity expectation.
    #[must_use]
    pub const fn warning(assertion: Assertion) -> Self {
        Self {
            assertion,
            severity: Severity::Warning,
            message: None,
        }
    }

    /// Overrides the failure message (builder pattern).
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl From<Assertion> for Expectation {
    fn from(assertion: Assertion) -> Self {
        Self::new(assertion)
    }
}

/// Evaluates expectations in order against one outcome.
///
/// Returns the first `Error`-severity failure; failed `Warning`
/// expectations become warnings on the pass.
///
/// # Errors
///
/// Returns a `CheckFailure` carrying the failure message of the first
/// failing error-severity expectation.
pub fn verify(expectations: &[Expectation], outcome: &HttpOutcome, elapsed: Duration) -> CheckOutcome {
    let mut pass = CheckPass::default();

    for expectation in expectations {
        let result = expectation.assertion.evaluate(outcome, elapsed);
        if result.passed {
            continue;
        }

        let message = expectation
            .message
            .clone()
            .or(result.error)
            .unwrap_or_else(|| result.description.clone());

        match expectation.severity {
            Severity::Error => return Err(CheckFailure::new(message)),
            Severity::Warning => pass.warn(message),
        }
    }

    Ok(pass)
}

/// Result of running a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssertionResult {
    /// Description of the assertion that was run.
    pub description: String,
    /// Whether the assertion passed.
    pub passed: bool,
    /// Error message if failed.
    pub error: Option<String>,
}

impl AssertionResult {
    /// Create a passed result.
    #[must_use]
    pub fn pass(assertion: &Assertion) -> Self {
        Self {
            description: assertion.description(),
            passed: true,
            error: None,
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(assertion: &Assertion, error: impl Into<String>) -> Self {
        Self {
            description: assertion.description(),
            passed: false,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::request::{Header, Headers};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn outcome(status: u16, body: serde_json::Value) -> HttpOutcome {
        let headers: Headers =
            std::iter::once(Header::new("Content-Type", "application/json")).collect();
        HttpOutcome::Success(ApiResponse::new(
            status,
            body,
            headers,
            Duration::from_millis(40),
        ))
    }

    const FAST: Duration = Duration::from_millis(40);

    #[test]
    fn test_status_code_exact() {
        let result = Assertion::status(200).evaluate(&outcome(200, json!({})), FAST);
        assert!(result.passed);

        let result = Assertion::status(401).evaluate(&outcome(200, json!({})), FAST);
        assert!(!result.passed);
        assert_eq!(result.error.as_deref(), Some("Expected 401, got 200"));
    }

    #[test]
    fn test_status_code_range() {
        let assertion = Assertion::StatusCode {
            expected: StatusExpectation::success(),
        };
        assert!(assertion.evaluate(&outcome(204, json!(null)), FAST).passed);
        assert!(!assertion.evaluate(&outcome(301, json!(null)), FAST).passed);
    }

    #[test]
    fn test_transport_failure_fails_response_assertions() {
        let failed = HttpOutcome::failure("operation timed out");
        let result = Assertion::status(200).evaluate(&failed, FAST);
        assert!(!result.passed);
        assert_eq!(
            result.error.as_deref(),
            Some("Request failed: operation timed out")
        );
    }

    #[test]
    fn test_response_time_uses_measured_elapsed_even_on_failure() {
        let assertion = Assertion::ResponseTime { max_ms: 1000 };
        let failed = HttpOutcome::failure("connection reset");

        assert!(assertion.evaluate(&failed, Duration::from_millis(1000)).passed);

        let result = assertion.evaluate(&failed, Duration::from_millis(1500));
        assert!(!result.passed);
        assert_eq!(
            result.error.as_deref(),
            Some("Response took 1500ms (expected < 1000ms)")
        );
    }

    #[test]
    fn test_json_field_truthiness() {
        let assertion = Assertion::JsonField {
            field: "token".to_string(),
        };
        assert!(assertion.evaluate(&outcome(200, json!({"token": "x"})), FAST).passed);
        assert!(!assertion.evaluate(&outcome(200, json!({"token": ""})), FAST).passed);
        assert!(!assertion.evaluate(&outcome(200, json!({"token": null})), FAST).passed);
        assert!(!assertion.evaluate(&outcome(200, json!([])), FAST).passed);
    }

    #[test]
    fn test_json_fields_reports_missing() {
        let assertion = Assertion::JsonFields {
            fields: vec!["id".to_string(), "username".to_string()],
        };
        assert!(
            assertion
                .evaluate(&outcome(200, json!({"id": 7, "username": "ana"})), FAST)
                .passed
        );

        let result = assertion.evaluate(&outcome(200, json!({"id": 0})), FAST);
        assert_eq!(
            result.error.as_deref(),
            Some("Missing required fields: id, username")
        );
    }

    #[test]
    fn test_is_json_array() {
        assert!(Assertion::IsJsonArray.evaluate(&outcome(200, json!([1])), FAST).passed);

        let result = Assertion::IsJsonArray.evaluate(&outcome(200, json!({"items": []})), FAST);
        assert!(!result.passed);
        assert_eq!(
            result.error.as_deref(),
            Some("Expected JSON array body, got object")
        );
    }

    #[test]
    fn test_content_type_partial_match() {
        let assertion = Assertion::ContentType {
            expected: "json".to_string(),
        };
        assert!(assertion.evaluate(&outcome(200, json!({})), FAST).passed);

        let bare = HttpOutcome::Success(ApiResponse::new(200, json!({}), Headers::new(), FAST));
        assert!(!assertion.evaluate(&bare, FAST).passed);
    }

    #[test]
    fn test_verify_stops_at_first_error() {
        let expectations = vec![
            Expectation::new(Assertion::status(200)),
            Expectation::new(Assertion::IsJsonArray).with_message("Expected array of properties"),
        ];

        let err = verify(&expectations, &outcome(401, json!({})), FAST).unwrap_err();
        assert_eq!(err.message(), "Expected 200, got 401");

        let err = verify(&expectations, &outcome(200, json!({})), FAST).unwrap_err();
        assert_eq!(err.message(), "Expected array of properties");
    }

    #[test]
    fn test_verify_collects_warnings() {
        let expectations = vec![
            Expectation::new(Assertion::status(200)),
            Expectation::warning(Assertion::ContentType {
                expected: "xml".to_string(),
            }),
        ];

        let pass = verify(&expectations, &outcome(200, json!({})), FAST).unwrap();
        assert_eq!(pass.warnings().len(), 1);
        assert!(pass.warnings()[0].contains("xml"));
    }

    #[test]
    fn test_assertion_description() {
        assert_eq!(Assertion::status(200).description(), "Status code = 200");
        assert_eq!(
            Assertion::ResponseTime { max_ms: 1000 }.description(),
            "Response time < 1000ms"
        );
    }
}
