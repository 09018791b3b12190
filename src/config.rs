//! Configuration management for buildset
//!
//! Both tools are driven entirely by environment variables set by the CI job.
//! Each tool has its own configuration struct; values that have a sensible
//! default fall back to it, required values produce a [`ConfigError`].
//!
//! # Environment Variables
//!
//! ## Quality-gate poller
//! - `WORKSPACE`: CI workspace root - **required**
//! - `sonarAuthToken`: analysis server token, sent as the basic-auth username - **required**
//! - `SONAR_GATE_STARTUP_DELAY_SECS`: wait before reading the report - default: "10"
//! - `SONAR_GATE_TIMEOUT_SECS`: HTTP request timeout - default: "30"
//!
//! ## Build-descriptor generator
//! - `BUILDSET_VERSION_QUALIFIER`: suffix appended to truncated buildset versions - optional
//! - `DOCKER_REGISTRY_INTERNAL`: value for `${docker-registry-internal}` - default:
//!   "docker.cdpipeline.apmoller.net:10043"

use std::env::{self, VarError};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const WORKSPACE_VAR: &str = "WORKSPACE";
pub const AUTH_TOKEN_VAR: &str = "sonarAuthToken";
pub const STARTUP_DELAY_VAR: &str = "SONAR_GATE_STARTUP_DELAY_SECS";
pub const REQUEST_TIMEOUT_VAR: &str = "SONAR_GATE_TIMEOUT_SECS";
pub const VERSION_QUALIFIER_VAR: &str = "BUILDSET_VERSION_QUALIFIER";
pub const REGISTRY_HOST_VAR: &str = "DOCKER_REGISTRY_INTERNAL";

const DEFAULT_STARTUP_DELAY_SECS: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REGISTRY_HOST: &str = "docker.cdpipeline.apmoller.net:10043";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },

    #[error("Failed to determine current directory: {0}")]
    CurrentDir(#[from] std::io::Error),
}

/// Settings for the quality-gate poller
#[derive(Debug, Clone)]
pub struct SonarConfig {
    /// CI workspace root; report files live below it
    pub workspace: PathBuf,

    /// Token used as the basic-auth username (password is empty)
    pub auth_token: String,

    /// How long to wait for the scanner to register its task
    pub startup_delay: Duration,

    /// Timeout for the single task-status request
    pub request_timeout: Duration,
}

impl SonarConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let workspace = required_var(WORKSPACE_VAR)?;
        let auth_token = required_var(AUTH_TOKEN_VAR)?;

        let startup_delay = secs_var(STARTUP_DELAY_VAR, DEFAULT_STARTUP_DELAY_SECS)?;
        let request_timeout = secs_var(REQUEST_TIMEOUT_VAR, DEFAULT_REQUEST_TIMEOUT_SECS)?;

        Ok(Self {
            workspace: PathBuf::from(workspace),
            auth_token,
            startup_delay,
            request_timeout,
        })
    }

    /// Configuration with no startup delay, mostly useful for tests
    pub fn immediate(workspace: impl Into<PathBuf>, auth_token: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            auth_token: auth_token.into(),
            startup_delay: Duration::ZERO,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// `<WORKSPACE>/.sonar`, where the scanner drops its report
    pub fn scanner_dir(&self) -> PathBuf {
        self.workspace.join(".sonar")
    }

    /// `<WORKSPACE>/target/sonar`, where the report is linked into the build output
    pub fn report_dir(&self) -> PathBuf {
        self.workspace.join("target").join("sonar")
    }
}

/// Settings for the build-descriptor generator
#[derive(Debug, Clone)]
pub struct BuildsetConfig {
    /// Directory holding the root `pom.xml`; outputs go to `<base_dir>/target`
    pub base_dir: PathBuf,

    /// Qualifier appended to truncated versions, when set
    pub version_qualifier: Option<String>,

    /// Replacement for `${docker-registry-internal}` in image templates
    pub registry_host: String,
}

impl BuildsetConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_dir = env::current_dir()?;
        Self::for_dir(base_dir)
    }

    /// Reads the environment-driven settings but roots the traversal at `base_dir`.
    pub fn for_dir(base_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let version_qualifier = optional_var(VERSION_QUALIFIER_VAR)?;
        let registry_host = optional_var(REGISTRY_HOST_VAR)?
            .unwrap_or_else(|| DEFAULT_REGISTRY_HOST.to_string());

        Ok(Self {
            base_dir: base_dir.into(),
            version_qualifier,
            registry_host,
        })
    }

    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            version_qualifier: None,
            registry_host: DEFAULT_REGISTRY_HOST.to_string(),
        }
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.version_qualifier = Some(qualifier.into());
        self
    }

    pub fn target_dir(&self) -> PathBuf {
        self.base_dir.join("target")
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

/// Unset is `None`; set but not valid UTF-8 is an error rather than unset.
fn optional_var(name: &str) -> Result<Option<String>, ConfigError> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(e @ VarError::NotUnicode(_)) => Err(ConfigError::ParseError {
            field: name.to_string(),
            error: e.to_string(),
        }),
    }
}

fn secs_var(name: &str, default: u64) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::ParseError {
                field: name.to_string(),
                error: e.to_string(),
            }),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}
