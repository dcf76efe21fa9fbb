//! In-memory `HttpClient` for unit tests.

#![allow(clippy::unwrap_used)]

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use houseprobe_domain::{ApiRequest, ApiResponse, Header, Headers, HttpOutcome};

use crate::ports::HttpClient;

type Handler = Box<dyn Fn(&ApiRequest) -> HttpOutcome + Send + Sync>;

/// Answers every request through a handler and records what was sent.
pub struct MockHttpClient {
    handler: Handler,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockHttpClient {
    pub fn new(handler: impl Fn(&ApiRequest) -> HttpOutcome + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers every request with the same JSON response.
    pub fn respond(status: u16, body: serde_json::Value) -> Self {
        Self::new(move |_| json_outcome(status, body.clone()))
    }

    /// Fails every request.
    pub fn fail(message: &'static str) -> Self {
        Self::new(move |_| HttpOutcome::failure(message))
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// A successful JSON outcome that took 5ms.
pub fn json_outcome(status: u16, body: serde_json::Value) -> HttpOutcome {
    let headers: Headers =
        std::iter::once(Header::new("content-type", "application/json")).collect();
    HttpOutcome::Success(ApiResponse::new(
        status,
        body,
        headers,
        Duration::from_millis(5),
    ))
}

impl HttpClient for MockHttpClient {
    fn execute(
        &self,
        request: &ApiRequest,
    ) -> Pin<Box<dyn Future<Output = HttpOutcome> + Send + '_>> {
        self.requests.lock().unwrap().push(request.clone());
        let outcome = (self.handler)(request);
        Box::pin(async move { outcome })
    }
}
