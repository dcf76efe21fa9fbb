//! Login credentials and bearer token extraction.

use serde::{Deserialize, Serialize};

use crate::response::ApiResponse;

/// Body field of a successful login response holding the bearer token.
pub const TOKEN_FIELD: &str = "token";

/// Account the smoke suite logs in with unless configured otherwise.
pub const DEFAULT_USERNAME: &str = "testuser";
/// Password of the default account.
pub const DEFAULT_PASSWORD: &str = "testpass123";

/// Username and password posted to `/auth/login`.
///
/// Fields missing from a config file keep the default account's values.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Account name
    pub username: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The JSON body sent to the login endpoint.
    #[must_use]
    pub fn login_body(&self) -> serde_json::Value {
        serde_json::json!({
            "username": self.username,
            "password": self.password,
        })
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME, DEFAULT_PASSWORD)
    }
}

// Keep passwords out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Returns the bearer token from a login response.
///
/// Any truthy `token` counts, the same rule the login check asserts.
/// Strings are taken as-is and other values in their JSON form. The status
/// code is not consulted.
#[must_use]
pub fn extract_token(response: &ApiResponse) -> Option<String> {
    response
        .truthy_field(TOKEN_FIELD)
        .map(|token| match token {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}
