//! The House-App API smoke suite.

use houseprobe_domain::request::APPLICATION_JSON;
use houseprobe_domain::{Assertion, CaseDefinition, Credentials, Expectation, HttpMethod};

use crate::runner::TestCase;
use crate::tester::LOGIN_ENDPOINT;

/// Credentials the login endpoint must reject.
pub const INVALID_USERNAME: &str = "invalid";
/// Password paired with [`INVALID_USERNAME`].
pub const INVALID_PASSWORD: &str = "wrong";

/// Latency budget for the authenticated property listing, in milliseconds.
pub const DEFAULT_LATENCY_BUDGET_MS: u64 = 1000;

/// Inputs of the built-in suite.
#[derive(Debug, Clone)]
pub struct SuiteSettings {
    /// Account that must be able to log in.
    pub credentials: Credentials,
    /// Maximum round trip for `GET /properties`, in milliseconds.
    pub latency_budget_ms: u64,
}

impl Default for SuiteSettings {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            latency_budget_ms: DEFAULT_LATENCY_BUDGET_MS,
        }
    }
}

/// The built-in case definitions, in execution order.
#[must_use]
pub fn house_app_definitions(settings: &SuiteSettings) -> Vec<CaseDefinition> {
    let invalid = Credentials::new(INVALID_USERNAME, INVALID_PASSWORD);

    vec![
        // Authentication
        CaseDefinition::new("POST /auth/login - Valid credentials", HttpMethod::Post, LOGIN_ENDPOINT)
            .with_body(settings.credentials.login_body())
            .expecting(Assertion::status(200))
            .expecting(
                Expectation::new(Assertion::JsonField {
                    field: "token".to_string(),
                })
                .with_message("Missing auth token"),
            ),
        CaseDefinition::new(
            "POST /auth/login - Invalid credentials",
            HttpMethod::Post,
            LOGIN_ENDPOINT,
        )
        .with_body(invalid.login_body())
        .expecting(Assertion::status(401)),
        // Properties
        CaseDefinition::new(
            "GET /properties - Unauthenticated access",
            HttpMethod::Get,
            "/properties",
        )
        .expecting(Assertion::status(401)),
        CaseDefinition::new(
            "GET /properties - Authenticated access",
            HttpMethod::Get,
            "/properties",
        )
        .authenticated()
        .expecting(Assertion::status(200))
        .expecting(Expectation::new(Assertion::IsJsonArray).with_message("Expected array of properties"))
        .expecting(Expectation::warning(Assertion::ContentType {
            expected: APPLICATION_JSON.to_string(),
        })),
        // User profile
        CaseDefinition::new("GET /user/profile - Valid token", HttpMethod::Get, "/user/profile")
            .authenticated()
            .expecting(Assertion::status(200))
            .expecting(
                Expectation::new(Assertion::JsonFields {
                    fields: vec!["id".to_string(), "username".to_string()],
                })
                .with_message("Missing required user fields"),
            ),
        // Error handling
        CaseDefinition::new("GET /nonexistent - 404 Not Found", HttpMethod::Get, "/nonexistent")
            .expecting(Assertion::status(404)),
        CaseDefinition::new(
            "POST /properties - Unauthorized creation",
            HttpMethod::Post,
            "/properties",
        )
        .with_body(serde_json::json!({
            "title": "Test Property",
            "price": 250_000,
        }))
        .expecting(Assertion::status(401)),
        // Performance
        CaseDefinition::new(
            format!("GET /properties - Response time < {}", budget_label(settings.latency_budget_ms)),
            HttpMethod::Get,
            "/properties",
        )
        .authenticated()
        .expecting(Assertion::ResponseTime {
            max_ms: settings.latency_budget_ms,
        }),
    ]
}

/// Builds the runnable suite, followed by any extra definitions.
#[must_use]
pub fn house_app_suite(settings: &SuiteSettings, extra: &[CaseDefinition]) -> Vec<TestCase> {
    house_app_definitions(settings)
        .into_iter()
        .chain(extra.iter().cloned())
        .map(|definition| {
            TestCase::from_definition(definition, Some(settings.credentials.clone()))
        })
        .collect()
}

fn budget_label(ms: u64) -> String {
    if ms % 1000 == 0 {
        format!("{}s", ms / 1000)
    } else {
        format!("{ms}ms")
    }
}
