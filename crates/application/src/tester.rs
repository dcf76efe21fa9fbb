//! Request helper shared by every check procedure.

use std::sync::Arc;
use std::time::Duration;

use houseprobe_domain::request::DEFAULT_TIMEOUT;
use houseprobe_domain::{
    ApiRequest, CheckFailure, Credentials, Header, Headers, HttpMethod, HttpOutcome, extract_token,
};

use crate::ports::HttpClient;

/// Default House API base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.house-app.casa/api";

/// Path of the login endpoint.
pub const LOGIN_ENDPOINT: &str = "/auth/login";

/// Message reported when a case cannot obtain the token it depends on.
pub const LOGIN_PRECONDITION_FAILED: &str = "Login failed - cannot proceed with test";

/// Issues requests against one API base URL.
///
/// # Example
///
/// ```ignore
/// let tester = ApiTester::new(Arc::new(ReqwestHttpClient::new()?), DEFAULT_BASE_URL);
/// let outcome = tester
///     .make_request(HttpMethod::Get, "/properties", None, &Headers::new())
///     .await;
/// ```
#[derive(Clone)]
pub struct ApiTester {
    client: Arc<dyn HttpClient>,
    base_url: String,
    timeout: Duration,
}

impl ApiTester {
    /// Creates a tester using the default 10 second timeout.
    pub fn new(client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Replaces the per-request timeout (builder pattern).
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends one request to `base_url + endpoint`.
    ///
    /// `extra_headers` are merged over `Content-Type: application/json`.
    /// A URL that cannot be built is reported the same way as a transport
    /// failure.
    pub async fn make_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<serde_json::Value>,
        extra_headers: &Headers,
    ) -> HttpOutcome {
        let request =
            match ApiRequest::build(method, &self.base_url, endpoint, body, extra_headers) {
                Ok(request) => request.with_timeout(self.timeout),
                Err(e) => return HttpOutcome::failure(e.to_string()),
            };

        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let outcome = self.client.execute(&request).await;
        match &outcome {
            HttpOutcome::Success(response) => tracing::debug!(
                status = response.status,
                elapsed_ms = u64::try_from(response.duration.as_millis()).unwrap_or(u64::MAX),
                "response received"
            ),
            HttpOutcome::Failure { message } => {
                tracing::debug!(error = %message, "request failed");
            }
        }
        outcome
    }

    /// Posts `credentials` to the login endpoint.
    pub async fn login(&self, credentials: &Credentials) -> HttpOutcome {
        self.make_request(
            HttpMethod::Post,
            LOGIN_ENDPOINT,
            Some(credentials.login_body()),
            &Headers::new(),
        )
        .await
    }

    /// Logs in and returns the bearer token.
    ///
    /// # Errors
    ///
    /// Returns a `CheckFailure` when the login request fails or the
    /// response carries no token.
    pub async fn bearer_token(&self, credentials: &Credentials) -> Result<String, CheckFailure> {
        self.login(credentials)
            .await
            .response()
            .and_then(extract_token)
            .ok_or_else(|| CheckFailure::new(LOGIN_PRECONDITION_FAILED))
    }

    /// Logs in and returns headers carrying the bearer token.
    ///
    /// # Errors
    ///
    /// See [`ApiTester::bearer_token`].
    pub async fn auth_headers(&self, credentials: &Credentials) -> Result<Headers, CheckFailure> {
        let token = self.bearer_token(credentials).await?;
        Ok(std::iter::once(Header::bearer(&token)).collect())
    }
}

impl std::fmt::Debug for ApiTester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiTester")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
