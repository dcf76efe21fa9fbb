//! HTTP Client port

use std::future::Future;
use std::pin::Pin;

use houseprobe_domain::{ApiRequest, HttpOutcome};

/// Port for executing HTTP requests.
///
/// Implementations never fail: every transport problem, including a
/// timeout or a body that is not JSON, is reported as
/// `HttpOutcome::Failure` carrying the error message.
pub trait HttpClient: Send + Sync {
    /// Executes a request, bounded by `request.timeout`.
    fn execute(
        &self,
        request: &ApiRequest,
    ) -> Pin<Box<dyn Future<Output = HttpOutcome> + Send + '_>>;
}
