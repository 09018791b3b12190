//! buildset - CI helpers for Maven pipelines
//!
//! Two independent pipeline steps share this library:
//!
//! - **`write-buildset`**: walks a multi-module Maven project, resolves each
//!   leaf module to a Maven coordinate or a Docker image reference, and writes
//!   property files plus minimal package descriptors for publishing.
//! - **`sonar-quality-gate`**: reads the task URL the analysis scanner left in
//!   the workspace and prints the task returned by the analysis server.
//!
//! # Example
//!
//! ```no_run
//! use buildset::config::BuildsetConfig;
//! use buildset::fs::RealFileSystem;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BuildsetConfig::from_env()?;
//! let summary = buildset::buildset::run(&RealFileSystem::new(), &config)?;
//! println!("{} entries", summary.artifacts.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`pom`]: reading the parts of `pom.xml` that matter here
//! - [`buildset`]: module tree resolution and output writing
//! - [`sonar`]: report parsing and the task-status request
//! - [`config`], [`fs`], [`util`], [`cli`]: environment, file access, logging, arguments

pub mod buildset;
pub mod cli;
pub mod config;
pub mod fs;
pub mod pom;
pub mod sonar;
pub mod util;

pub use buildset::{ArtifactMap, BuildsetError, BuildsetSummary};
pub use config::{BuildsetConfig, ConfigError, SonarConfig};
pub use pom::{PomDescriptor, PomError};
pub use sonar::{CeTaskResponse, QualityGateClient, SonarError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
