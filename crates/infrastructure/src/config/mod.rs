//! Runtime configuration.
//!
//! Values come from, in increasing precedence: built-in defaults, an
//! optional YAML file named by `HOUSEPROBE_CONFIG`, and individual
//! `HOUSEPROBE_*` environment variables.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use houseprobe_application::{DEFAULT_BASE_URL, SuiteSettings};
use houseprobe_domain::request::DEFAULT_TIMEOUT;
use houseprobe_domain::{CaseDefinition, Credentials};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Environment variable naming the YAML config file.
pub const ENV_CONFIG: &str = "HOUSEPROBE_CONFIG";
/// Environment variable overriding the API base URL.
pub const ENV_BASE_URL: &str = "HOUSEPROBE_BASE_URL";
/// Environment variable overriding the request timeout in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "HOUSEPROBE_TIMEOUT_MS";
/// Environment variable overriding the login username.
pub const ENV_USERNAME: &str = "HOUSEPROBE_USERNAME";
/// Environment variable overriding the login password.
pub const ENV_PASSWORD: &str = "HOUSEPROBE_PASSWORD";
/// Environment variable overriding the latency budget in milliseconds.
pub const ENV_LATENCY_BUDGET_MS: &str = "HOUSEPROBE_LATENCY_BUDGET_MS";
/// Environment variable naming the JSON report file.
pub const ENV_REPORT: &str = "HOUSEPROBE_REPORT";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The config file is not valid YAML for `ProbeConfig`.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// File that was parsed
        path: PathBuf,
        /// Underlying error
        source: serde_yaml::Error,
    },

    /// A value is out of range or malformed.
    #[error("invalid value for {key}: {message}")]
    Invalid {
        /// Setting name
        key: &'static str,
        /// What is wrong with it
        message: String,
    },
}

/// Everything the binary needs to run the suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// API base URL every endpoint is joined to.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Account used by the login and authenticated cases.
    pub credentials: Credentials,
    /// Latency budget for the authenticated property listing.
    pub latency_budget_ms: u64,
    /// Where to write the JSON report, if anywhere.
    pub report_path: Option<PathBuf>,
    /// Extra cases appended after the built-in suite.
    pub cases: Vec<CaseDefinition>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        let suite = SuiteSettings::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: u64::try_from(DEFAULT_TIMEOUT.as_millis()).unwrap_or(10_000),
            credentials: suite.credentials,
            latency_budget_ms: suite.latency_budget_ms,
            report_path: None,
            cases: Vec::new(),
        }
    }
}

impl ProbeConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or if
    /// any value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Loads configuration from an explicit variable map.
    ///
    /// # Errors
    ///
    /// See [`ProbeConfig::load`].
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = match non_empty(vars, ENV_CONFIG) {
            Some(path) => Self::from_file(Path::new(path))?,
            None => Self::default(),
        };
        config.apply_overrides(vars)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a YAML config file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_overrides(&mut self, vars: &HashMap<String, String>) -> Result<(), ConfigError> {
        if let Some(url) = non_empty(vars, ENV_BASE_URL) {
            self.base_url = url.to_string();
        }
        if let Some(ms) = non_empty(vars, ENV_TIMEOUT_MS) {
            self.timeout_ms = parse_millis(ENV_TIMEOUT_MS, ms)?;
        }
        if let Some(username) = non_empty(vars, ENV_USERNAME) {
            self.credentials.username = username.to_string();
        }
        if let Some(password) = vars.get(ENV_PASSWORD) {
            self.credentials.password.clone_from(password);
        }
        if let Some(ms) = non_empty(vars, ENV_LATENCY_BUDGET_MS) {
            self.latency_budget_ms = parse_millis(ENV_LATENCY_BUDGET_MS, ms)?;
        }
        if let Some(path) = non_empty(vars, ENV_REPORT) {
            self.report_path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::Invalid {
            key: "base_url",
            message: format!("{e}: {}", self.base_url),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                key: "base_url",
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "timeout_ms",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.credentials.username.is_empty() {
            return Err(ConfigError::Invalid {
                key: "credentials.username",
                message: "must not be empty".to_string(),
            });
        }
        if let Some(case) = self.cases.iter().find(|c| c.name.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                key: "cases",
                message: format!("case for endpoint '{}' has no name", case.endpoint),
            });
        }
        if let Some(case) = self
            .cases
            .iter()
            .find(|c| c.body.is_some() && !c.method.has_body())
        {
            return Err(ConfigError::Invalid {
                key: "cases",
                message: format!("case '{}' sends a body with {}", case.name, case.method),
            });
        }
        Ok(())
    }

    /// The per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Settings for the built-in suite.
    #[must_use]
    pub fn suite_settings(&self) -> SuiteSettings {
        SuiteSettings {
            credentials: self.credentials.clone(),
            latency_budget_ms: self.latency_budget_ms,
        }
    }
}

fn non_empty<'a>(vars: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_millis(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|e| ConfigError::Invalid {
        key,
        message: format!("'{value}' is not a number of milliseconds: {e}"),
    })
}
