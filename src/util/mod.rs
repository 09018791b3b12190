//! Shared helpers for both binaries

pub mod logging;

pub use logging::{init_from_args, init_logging, LoggingConfig};
