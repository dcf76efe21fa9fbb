//! Request types: method, headers and the resolved request.

mod api_request;
mod header;
mod method;

pub use api_request::{ApiRequest, DEFAULT_TIMEOUT, join_url};
pub use header::{APPLICATION_JSON, AUTHORIZATION, CONTENT_TYPE, Header, Headers};
pub use method::HttpMethod;
