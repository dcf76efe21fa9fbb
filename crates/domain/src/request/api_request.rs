//! The resolved request sent to the House API.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::{Headers, HttpMethod};
use crate::error::{DomainError, DomainResult};

/// Upper bound applied to every request unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A fully resolved request against the House API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute target URL
    pub url: String,
    /// Headers after merging extras over the JSON defaults
    #[serde(default)]
    pub headers: Headers,
    /// JSON body, sent only when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    /// Per-request timeout
    #[serde(with = "crate::duration_millis")]
    pub timeout: Duration,
}

impl ApiRequest {
    /// Builds a request for `endpoint` relative to `base_url`.
    ///
    /// `extra_headers` are merged over `Content-Type: application/json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL does not parse, or if a body is
    /// given for a method that does not carry one.
    pub fn build(
        method: HttpMethod,
        base_url: &str,
        endpoint: &str,
        body: Option<serde_json::Value>,
        extra_headers: &Headers,
    ) -> DomainResult<Self> {
        if body.is_some() && !method.has_body() {
            return Err(DomainError::InvalidBody(format!(
                "{method} requests cannot carry a body"
            )));
        }
        Ok(Self {
            method,
            url: join_url(base_url, endpoint)?,
            headers: Headers::json_defaults().merged_with(extra_headers),
            body,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Replaces the timeout (builder pattern).
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the serialized body, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be encoded.
    pub fn encoded_body(&self) -> DomainResult<Option<String>> {
        self.body
            .as_ref()
            .map(|b| serde_json::to_string(b).map_err(|e| DomainError::InvalidBody(e.to_string())))
            .transpose()
    }
}

/// Joins a base URL and an endpoint path by plain concatenation.
///
/// A trailing slash on the base and a leading slash on the endpoint are
/// collapsed into one. The result must be an absolute http(s) URL.
///
/// # Errors
///
/// Returns `DomainError::InvalidUrl` if the result does not parse or uses
/// a scheme other than http or https.
pub fn join_url(base_url: &str, endpoint: &str) -> DomainResult<String> {
    let base = base_url.trim().trim_end_matches('/');
    let path = endpoint.trim();
    let joined = if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{}", path.trim_start_matches('/'))
    };

    let parsed = Url::parse(&joined).map_err(|e| DomainError::InvalidUrl(format!("{e}: {joined}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(joined),
        other => Err(DomainError::InvalidUrl(format!(
            "unsupported scheme '{other}': {joined}"
        ))),
    }
}
