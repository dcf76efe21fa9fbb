//! Declarative request cases.

use serde::{Deserialize, Serialize};

use super::assertion::Expectation;
use crate::request::HttpMethod;

/// A test case that sends one request and checks the outcome.
///
/// When `authenticate` is set, the check logs in first and attaches the
/// bearer token to the request under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDefinition {
    /// Human-readable case name
    pub name: String,
    /// HTTP method
    #[serde(default)]
    pub method: HttpMethod,
    /// Path relative to the API base URL
    pub endpoint: String,
    /// JSON body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    /// Log in before the request and send the bearer token
    #[serde(default)]
    pub authenticate: bool,
    /// Expectations, checked in order
    #[serde(default)]
    pub expect: Vec<Expectation>,
}

impl CaseDefinition {
    /// Creates a case with no body, no login and no expectations.
    #[must_use]
    pub fn new(name: impl Into<String>, method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            endpoint: endpoint.into(),
            body: None,
            authenticate: false,
            expect: Vec::new(),
        }
    }

    /// Sets the JSON body (builder pattern).
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Requires a login before the request (builder pattern).
    #[must_use]
    pub const fn authenticated(mut self) -> Self {
        self.authenticate = true;
        self
    }

    /// Appends an expectation (builder pattern).
    #[must_use]
    pub fn expecting(mut self, expectation: impl Into<Expectation>) -> Self {
        self.expect.push(expectation.into());
        self
    }
}
