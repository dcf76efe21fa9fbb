//! Test runner implementation.
//!
//! Runs named check procedures one after another and folds their outcomes
//! into a `TestTally`.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use houseprobe_domain::{
    CaseDefinition, CaseReport, CheckFailure, CheckOutcome, Credentials, Headers, TestTally,
    verify,
};

use crate::ports::Clock;
use crate::tester::{ApiTester, LOGIN_PRECONDITION_FAILED};

/// The asynchronous body of one test case.
///
/// Returning `Err` means an expectation was not met; it is counted as a
/// failed case and never stops the run.
#[async_trait]
pub trait CheckProcedure: Send + Sync {
    /// Performs the request(s) and checks the outcome.
    async fn check(&self, tester: &ApiTester) -> CheckOutcome;
}

/// Check procedure built from a `CaseDefinition`.
#[derive(Debug, Clone)]
pub struct RequestCheck {
    definition: CaseDefinition,
    credentials: Option<Credentials>,
}

impl RequestCheck {
    /// Creates a check. `credentials` are used only when the definition
    /// asks to authenticate.
    #[must_use]
    pub fn new(definition: CaseDefinition, credentials: Option<Credentials>) -> Self {
        Self {
            definition,
            credentials,
        }
    }
}

#[async_trait]
impl CheckProcedure for RequestCheck {
    async fn check(&self, tester: &ApiTester) -> CheckOutcome {
        let def = &self.definition;
        let headers = match (&self.credentials, def.authenticate) {
            (Some(credentials), true) => tester.auth_headers(credentials).await?,
            (None, true) => return Err(CheckFailure::new(LOGIN_PRECONDITION_FAILED)),
            (_, false) => Headers::new(),
        };

        let start = Instant::now();
        let outcome = tester
            .make_request(def.method, &def.endpoint, def.body.clone(), &headers)
            .await;
        let elapsed = start.elapsed();

        verify(&def.expect, &outcome, elapsed)
    }
}

/// A named check procedure.
pub struct TestCase {
    name: String,
    procedure: Box<dyn CheckProcedure>,
}

impl TestCase {
    /// Pairs a name with a check procedure.
    pub fn new(name: impl Into<String>, procedure: impl CheckProcedure + 'static) -> Self {
        Self {
            name: name.into(),
            procedure: Box::new(procedure),
        }
    }

    /// A case that sends the request described by `definition`.
    #[must_use]
    pub fn from_definition(definition: CaseDefinition, credentials: Option<Credentials>) -> Self {
        let name = definition.name.clone();
        Self::new(name, RequestCheck::new(definition, credentials))
    }

    /// Returns the case name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Runs test cases sequentially against one API.
pub struct TestRunner {
    tester: ApiTester,
    clock: Arc<dyn Clock>,
}

impl TestRunner {
    /// Creates a runner.
    pub fn new(tester: ApiTester, clock: Arc<dyn Clock>) -> Self {
        Self { tester, clock }
    }

    /// Starts a fresh tally stamped with the current time.
    #[must_use]
    pub fn start(&self) -> TestTally {
        TestTally::new(self.clock.now())
    }

    /// Runs one case and records its outcome.
    ///
    /// A failing check increments the failure count and the run goes on.
    pub async fn run_test(&self, tally: TestTally, case: &TestCase) -> TestTally {
        tracing::info!("▶ Starting test: {}", case.name);

        let start = Instant::now();
        let outcome = case.procedure.check(&self.tester).await;
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &outcome {
            Ok(pass) => {
                tracing::info!(elapsed_ms, "✓ PASSED: {}", case.name);
                for warning in pass.warnings() {
                    tracing::warn!("⚠ WARNING: {}: {}", case.name, warning);
                }
            }
            Err(failure) => tracing::error!(elapsed_ms, "✗ FAILED: {} {}", case.name, failure),
        }

        tally.record(CaseReport::from_outcome(case.name.clone(), outcome, elapsed_ms))
    }

    /// Stamps the duration onto the tally.
    #[must_use]
    pub fn get_results(&self, tally: TestTally) -> TestTally {
        tally.finalize(self.clock.now())
    }

    /// Runs every case in order and returns the finalized tally.
    pub async fn run_suite(&self, cases: &[TestCase]) -> TestTally {
        let mut tally = self.start();
        for case in cases {
            tally = self.run_test(tally, case).await;
        }
        self.get_results(tally)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock::{MockHttpClient, json_outcome};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use houseprobe_domain::{Assertion, CaseStatus, CheckPass, HttpMethod, HttpOutcome};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Clock that advances one second per reading.
    struct SteppingClock {
        base: DateTime<Utc>,
        ticks: Mutex<i64>,
    }

    impl SteppingClock {
        fn new() -> Self {
            Self {
                base: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().unwrap(),
                ticks: Mutex::new(0),
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut ticks = self.ticks.lock().unwrap();
            let now = self.base + Duration::seconds(*ticks);
            *ticks += 1;
            now
        }
    }

    struct Fixed(CheckOutcome);

    #[async_trait]
    impl CheckProcedure for Fixed {
        async fn check(&self, _tester: &ApiTester) -> CheckOutcome {
            self.0.clone()
        }
    }

    struct Counting(Arc<AtomicUsize>);

    #[async_trait]
    impl CheckProcedure for Counting {
        async fn check(&self, _tester: &ApiTester) -> CheckOutcome {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(CheckPass::default())
        }
    }

    fn runner(client: MockHttpClient) -> TestRunner {
        let tester = ApiTester::new(Arc::new(client), "http://api.test");
        TestRunner::new(tester, Arc::new(SteppingClock::new()))
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_run() {
        let runner = runner(MockHttpClient::respond(200, json!({})));
        let counter = Arc::new(AtomicUsize::new(0));
        let cases = vec![
            TestCase::new("first", Fixed(Err(CheckFailure::new("boom")))),
            TestCase::new("second", Counting(counter.clone())),
            TestCase::new("third", Fixed(Err(CheckFailure::new("bang")))),
        ];

        let tally = runner.run_suite(&cases).await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(tally.passed(), 1);
        assert_eq!(tally.failed(), 2);
        assert_eq!(tally.total(), cases.len());
        let names: Vec<_> = tally.cases().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        assert_eq!(tally.cases()[2].message.as_deref(), Some("bang"));
    }

    #[tokio::test]
    async fn test_get_results_uses_clock() {
        let runner = runner(MockHttpClient::respond(200, json!({})));
        let tally = runner.start();
        let tally = runner.get_results(tally);
        assert!((tally.duration_secs() - 1.0).abs() < f64::EPSILON);

        let again = runner.get_results(tally.clone());
        assert!(again.duration_secs() >= tally.duration_secs());
    }

    #[tokio::test]
    async fn test_run_test_counts_warnings() {
        let runner = runner(MockHttpClient::respond(200, json!({})));
        let mut pass = CheckPass::clean();
        pass.warn("slow");
        let case = TestCase::new("warned", Fixed(Ok(pass)));

        let tally = runner.run_test(runner.start(), &case).await;
        assert_eq!(tally.passed(), 1);
        assert_eq!(tally.warnings(), 1);
    }

    #[tokio::test]
    async fn test_request_check_sends_bearer_token() {
        let client = MockHttpClient::new(|request| {
            if request.url.ends_with("/auth/login") {
                json_outcome(200, json!({"token": "t-1"}))
            } else if request.headers.get("Authorization") == Some("Bearer t-1") {
                json_outcome(200, json!([{"id": 1}]))
            } else {
                json_outcome(401, json!({"error": "unauthorized"}))
            }
        });
        let runner = runner(client);

        let definition = CaseDefinition::new("props", HttpMethod::Get, "/properties")
            .authenticated()
            .expecting(Assertion::status(200))
            .expecting(Assertion::IsJsonArray);
        let case = TestCase::from_definition(
            definition,
            Some(Credentials::new("testuser", "testpass123")),
        );

        let tally = runner.run_test(runner.start(), &case).await;
        assert_eq!(tally.cases()[0].status, CaseStatus::Passed);
    }

    #[tokio::test]
    async fn test_request_check_without_credentials_fails_precondition() {
        let runner = runner(MockHttpClient::respond(200, json!({})));
        let definition =
            CaseDefinition::new("props", HttpMethod::Get, "/properties").authenticated();
        let case = TestCase::from_definition(definition, None);

        let tally = runner.run_test(runner.start(), &case).await;
        assert_eq!(
            tally.cases()[0].message.as_deref(),
            Some(LOGIN_PRECONDITION_FAILED)
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_counted_not_raised() {
        let runner = runner(MockHttpClient::new(|_| HttpOutcome::failure("dns error")));
        let definition = CaseDefinition::new("404", HttpMethod::Get, "/nonexistent")
            .expecting(Assertion::status(404));
        let case = TestCase::from_definition(definition, None);

        let tally = runner.run_suite(std::slice::from_ref(&case)).await;
        assert_eq!(tally.failed(), 1);
        assert_eq!(
            tally.cases()[0].message.as_deref(),
            Some("Request failed: dns error")
        );
    }
}
