//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! Every error on the way, from connecting to decoding the JSON body, ends
//! up as `HttpOutcome::Failure`.

use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use houseprobe_application::{ApplicationError, ApplicationResult, ports::HttpClient};
use houseprobe_domain::{ApiRequest, ApiResponse, Header, Headers, HttpMethod, HttpOutcome};
use reqwest::{Client, Method};

/// HTTP client implementation using reqwest.
///
/// Wraps `reqwest::Client` and implements the `HttpClient` port from the
/// application layer. The per-request timeout comes from each
/// `ApiRequest`.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// Default configuration:
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - User-Agent: "houseprobe/<version>"
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> ApplicationResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("houseprobe/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| ApplicationError::HttpClient(e.to_string()))?;

        Ok(Self { client })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, String> {
        let body = request.encoded_body().map_err(|e| e.to_string())?;

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), &request.url)
            .timeout(request.timeout);

        for header in request.headers.iter() {
            builder = builder.header(&header.name, &header.value);
        }

        if let Some(body) = body {
            builder = builder.body(body);
        }

        let start = Instant::now();

        let response = builder.send().await.map_err(|e| describe(&e))?;
        let status = response.status().as_u16();
        let headers: Headers = response
            .headers()
            .iter()
            .map(|(k, v)| Header::new(k.as_str(), v.to_str().unwrap_or("<binary>")))
            .collect();

        let bytes = response.bytes().await.map_err(|e| describe(&e))?;
        let duration = start.elapsed();

        let body = serde_json::from_slice(&bytes)
            .map_err(|e| format!("Invalid JSON response (status {status}): {e}"))?;

        Ok(ApiResponse::new(status, body, headers, duration))
    }
}

/// Flattens a reqwest error and its sources into one line.
fn describe(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl HttpClient for ReqwestHttpClient {
    fn execute(
        &self,
        request: &ApiRequest,
    ) -> Pin<Box<dyn Future<Output = HttpOutcome> + Send + '_>> {
        let request = request.clone();

        Box::pin(async move {
            match self.send(&request).await {
                Ok(response) => HttpOutcome::Success(response),
                Err(message) => HttpOutcome::Failure { message },
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode},
        routing::{get, post},
    };
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::net::SocketAddr;
    use std::time::Duration;

    async fn echo(headers: HeaderMap, body: String) -> Json<Value> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };
        Json(json!({
            "content_type": header("content-type"),
            "authorization": header("authorization"),
            "body": body,
        }))
    }

    async fn serve() -> SocketAddr {
        let app = Router::new()
            .route("/json", get(|| async { Json(json!([1, 2, 3])) }))
            .route(
                "/missing",
                get(|| async { (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))) }),
            )
            .route("/text", get(|| async { "plain text" }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    Json(json!({}))
                }),
            )
            .route("/echo", post(echo));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn request(method: HttpMethod, addr: SocketAddr, path: &str) -> ApiRequest {
        ApiRequest::build(method, &format!("http://{addr}"), path, None, &Headers::new()).unwrap()
    }

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Post),
            Method::POST
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_client_creation() {
        assert!(ReqwestHttpClient::new().is_ok());
    }

    #[tokio::test]
    async fn test_decodes_json_body() {
        let addr = serve().await;
        let client = ReqwestHttpClient::new().unwrap();

        let outcome = client.execute(&request(HttpMethod::Get, addr, "/json")).await;

        let response = outcome.response().unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, json!([1, 2, 3]));
        assert!(response.content_type().unwrap().contains("application/json"));
    }

    #[tokio::test]
    async fn test_error_status_is_still_success_outcome() {
        let addr = serve().await;
        let client = ReqwestHttpClient::new().unwrap();

        let outcome = client.execute(&request(HttpMethod::Get, addr, "/missing")).await;
        assert_eq!(outcome.status(), Some(404));
    }

    #[tokio::test]
    async fn test_sends_json_body_and_headers() {
        let addr = serve().await;
        let client = ReqwestHttpClient::new().unwrap();

        let extra: Headers = std::iter::once(Header::bearer("abc")).collect();
        let request = ApiRequest::build(
            HttpMethod::Post,
            &format!("http://{addr}"),
            "/echo",
            Some(json!({"username": "testuser"})),
            &extra,
        )
        .unwrap();

        let outcome = client.execute(&request).await;
        let body = &outcome.response().unwrap().body;
        assert_eq!(body["content_type"], "application/json");
        assert_eq!(body["authorization"], "Bearer abc");
        assert_eq!(body["body"], r#"{"username":"testuser"}"#);
    }

    #[tokio::test]
    async fn test_non_json_body_is_failure() {
        let addr = serve().await;
        let client = ReqwestHttpClient::new().unwrap();

        let outcome = client.execute(&request(HttpMethod::Get, addr, "/text")).await;
        match outcome {
            HttpOutcome::Failure { message } => assert!(message.contains("Invalid JSON")),
            HttpOutcome::Success(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_failure() {
        let addr = serve().await;
        let client = ReqwestHttpClient::new().unwrap();

        let request =
            request(HttpMethod::Get, addr, "/slow").with_timeout(Duration::from_millis(100));
        let start = Instant::now();
        let outcome = client.execute(&request).await;

        assert!(outcome.is_failure());
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_connection_refused_is_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ReqwestHttpClient::new().unwrap();
        let outcome = client.execute(&request(HttpMethod::Get, addr, "/json")).await;
        assert!(outcome.is_failure());
    }
}
