//! House Probe - smoke tests for the House-App REST API.
//!
//! Wires the reqwest adapter and system clock into a [`TestRunner`],
//! runs the built-in suite and reports the outcome.

use std::process::ExitCode;
use std::sync::Arc;

use houseprobe_application::{ApiTester, ApplicationError, TestRunner, house_app_suite};
use houseprobe_domain::TestTally;
use houseprobe_infrastructure::{
    ConfigError, ProbeConfig, ReportError, ReqwestHttpClient, RunReport, SystemClock,
    render_summary, verdict, write_report,
};
use thiserror::Error;

/// Exit code when a case failed.
pub const EXIT_FAILED: u8 = 1;
/// Exit code when the run could not start or finish.
pub const EXIT_ERROR: u8 = 2;

/// Errors that stop a run before it produces a result.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// The report file could not be written.
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Runs the built-in suite plus any configured extra cases.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built. Failing cases are
/// not errors; they are counted in the returned tally.
pub async fn run(config: &ProbeConfig) -> Result<TestTally, ProbeError> {
    let client = ReqwestHttpClient::new()?;
    let tester = ApiTester::new(Arc::new(client), config.base_url.clone())
        .with_timeout(config.timeout());
    let runner = TestRunner::new(tester, Arc::new(SystemClock::new()));

    let cases = house_app_suite(&config.suite_settings(), &config.cases);
    tracing::info!(
        base_url = %config.base_url,
        cases = cases.len(),
        "Starting House API tests"
    );

    Ok(runner.run_suite(&cases).await)
}

/// Prints the summary block and writes the report if one is configured.
///
/// # Errors
///
/// Returns an error if the report file cannot be written.
pub async fn report(config: &ProbeConfig, tally: &TestTally) -> Result<(), ProbeError> {
    println!("{}", render_summary(tally));
    println!("{}", verdict(tally));

    for failure in tally.failures() {
        tracing::error!(
            "{}: {}",
            failure.name,
            failure.message.as_deref().unwrap_or_default()
        );
    }

    if let Some(path) = &config.report_path {
        write_report(path, &RunReport::new(&config.base_url, tally)).await?;
    }
    Ok(())
}

/// Maps a finished run to the process exit code.
#[must_use]
pub fn exit_code(tally: &TestTally) -> ExitCode {
    if tally.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_FAILED)
    }
}

/// Loads configuration, runs the suite and reports.
pub async fn main_with(config: Result<ProbeConfig, ConfigError>) -> ExitCode {
    let outcome = async {
        let config = config?;
        let tally = run(&config).await?;
        report(&config, &tally).await?;
        Ok::<_, ProbeError>(tally)
    }
    .await;

    match outcome {
        Ok(tally) => exit_code(&tally),
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
