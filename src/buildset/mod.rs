//! Buildset descriptor generation
//!
//! Resolves every leaf module of a Maven project into an artifact reference
//! and publishes the collection as three outputs under `target/`:
//!
//! - `buildsetv1`: all artifacts, versioned `major.minor[-qualifier]`
//! - `isolated-deploy`: all artifacts, full project version
//! - `isolated-deploy-pointer`: a single entry naming the isolated-deploy version

mod artifact_map;
pub mod naming;
mod resolver;
mod writer;

pub use artifact_map::ArtifactMap;
pub use naming::{buildset_version, logical_name};
pub use resolver::{BuildsetResolver, ProjectCoordinates, ResolvedModule, POM_FILE};
pub use writer::{
    BuildsetWriter, PackageDescriptor, BUILDSET_V1, ISOLATED_DEPLOY, ISOLATED_DEPLOY_POINTER,
};

use crate::config::BuildsetConfig;
use crate::fs::FileSystem;
use crate::pom::PomError;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum BuildsetError {
    #[error(transparent)]
    Fs(#[from] anyhow::Error),

    #[error("No {} found at {}", resolver::POM_FILE, path.display())]
    MissingPom { path: PathBuf },

    #[error("Failed to parse {}: {source}", path.display())]
    Pom {
        path: PathBuf,
        #[source]
        source: PomError,
    },

    #[error("{}: no {field} declared or inherited", path.display())]
    MissingCoordinate { field: &'static str, path: PathBuf },

    #[error("Image template '{template}' needs docker-registry-namespace but none is declared or inherited")]
    MissingDockerNamespace { template: String },

    #[error("Version '{0}' has no major.minor component")]
    InvalidVersion(String),
}

/// What a generator run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildsetSummary {
    pub project: ProjectCoordinates,
    pub artifacts: ArtifactMap,
    pub outputs: Vec<PathBuf>,
}

/// Resolves the project rooted at `config.base_dir` and writes all three outputs.
pub fn run(fs: &dyn FileSystem, config: &BuildsetConfig) -> Result<BuildsetSummary, BuildsetError> {
    info!("Starting parsing");

    let mut resolver = BuildsetResolver::new(fs, &config.registry_host);
    let project = resolver.resolve(&config.base_dir)?;
    let artifacts = resolver.into_artifacts();
    info!(group = %project.group_id, version = %project.version, "Parent group");

    let writer = BuildsetWriter::new(fs, config);
    let outputs = vec![
        writer.write_result(&artifacts, &project, BUILDSET_V1, "build")?,
        writer.write_result(&artifacts, &project, ISOLATED_DEPLOY, "artifacts")?,
        writer.write_isolated_pointer(&project)?,
    ];

    Ok(BuildsetSummary {
        project,
        artifacts,
        outputs,
    })
}
