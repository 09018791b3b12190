//! Structured logging setup
//!
//! Both binaries log through `tracing` to stderr, leaving stdout for the
//! output a pipeline step might capture (the task JSON of the poller).
//!
//! Configuration, lowest to highest precedence:
//! - `BUILDSET_LOG_LEVEL` (trace, debug, info, warn, error) and `BUILDSET_LOG_JSON`
//! - `--log-level`, `--verbose`, `--quiet` on the command line
//! - `RUST_LOG`, which replaces the crate-level directive entirely
//!
//! ```no_run
//! use buildset::util::logging::{self, LoggingConfig};
//!
//! logging::init_logging(LoggingConfig::from_env());
//! tracing::info!("Buildset V1: Starting parsing");
//! ```

use crate::cli::LogArgs;
use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

pub const LOG_LEVEL_VAR: &str = "BUILDSET_LOG_LEVEL";
pub const LOG_JSON_VAR: &str = "BUILDSET_LOG_JSON";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for this crate's events
    pub level: Level,

    /// Emit one JSON object per event instead of human-readable lines
    pub use_json: bool,

    /// Include the module target (e.g. buildset::buildset) in each line
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    pub fn from_env() -> Self {
        let level = env::var(LOG_LEVEL_VAR)
            .map(|l| parse_level(&l))
            .unwrap_or(Level::INFO);

        let use_json = env::var(LOG_JSON_VAR)
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            level,
            use_json,
            ..Default::default()
        }
    }

    /// Applies command-line switches on top of the environment settings.
    pub fn with_args(mut self, args: &LogArgs) -> Self {
        if let Some(level) = &args.log_level {
            self.level = parse_level(level);
        } else if args.verbose {
            self.level = Level::DEBUG;
        } else if args.quiet {
            self.level = Level::ERROR;
        }
        if args.verbose {
            self.include_target = true;
        }
        self
    }
}

/// Parses a level name case-insensitively, falling back to INFO.
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Binary crates whose events share the library's level.
pub const BINARY_TARGETS: &[&str] = &["write_buildset", "sonar_quality_gate"];

/// Filter used when `RUST_LOG` is unset: the library and both binaries at
/// `level`, HTTP internals at warn.
pub fn default_directives(level: Level) -> String {
    let mut directives = vec![format!("{}={}", crate::NAME, level)];
    directives.extend(BINARY_TARGETS.iter().map(|target| format!("{}={}", target, level)));
    directives.push("h2=warn,hyper=warn,reqwest=warn".to_string());
    directives.join(",")
}

/// Installs the global subscriber. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = if env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(default_directives(config.level))
        };

        let registry = tracing_subscriber::registry().with(filter);

        if config.use_json {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(config.include_target)
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(config.include_target)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    });
}

/// Environment-driven setup with command-line overrides, as the binaries use it.
pub fn init_from_args(args: &LogArgs) {
    init_logging(LoggingConfig::from_env().with_args(args));
}
