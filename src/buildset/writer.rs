use super::naming::buildset_version;
use super::{ArtifactMap, BuildsetError, ProjectCoordinates};
use crate::config::BuildsetConfig;
use crate::fs::FileSystem;
use std::path::PathBuf;
use tracing::info;

pub const BUILDSET_V1: &str = "buildsetv1";
pub const ISOLATED_DEPLOY: &str = "isolated-deploy";
pub const ISOLATED_DEPLOY_POINTER: &str = "isolated-deploy-pointer";

pub const PROPERTIES_FILE: &str = "build.properties";
pub const DESCRIPTOR_FILE: &str = "pom.xml";
pub const POINTER_KEY: &str = "build_isolated_deploy";

/// Minimal descriptor that lets a properties file be deployed to a Maven repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl PackageDescriptor {
    pub fn render(&self) -> String {
        format!(
            "<project>\n  <modelVersion>4.0.0</modelVersion>\n  <groupId>{}</groupId>\n  <artifactId>{}</artifactId>\n  <version>{}</version>\n  <packaging>properties</packaging>\n</project>",
            self.group_id, self.artifact_id, self.version
        )
    }
}

/// Writes buildset outputs below `<base_dir>/target`.
pub struct BuildsetWriter<'a> {
    fs: &'a dyn FileSystem,
    config: &'a BuildsetConfig,
}

impl<'a> BuildsetWriter<'a> {
    pub fn new(fs: &'a dyn FileSystem, config: &'a BuildsetConfig) -> Self {
        Self { fs, config }
    }

    /// Writes every resolved artifact to `target/<group_suffix>/build.properties`
    /// and the matching descriptor. Only the `buildsetv1` output gets a
    /// truncated, qualified version.
    pub fn write_result(
        &self,
        artifacts: &ArtifactMap,
        project: &ProjectCoordinates,
        group_suffix: &str,
        artefact_id: &str,
    ) -> Result<PathBuf, BuildsetError> {
        let dir = self.output_dir(group_suffix)?;

        let properties = dir.join(PROPERTIES_FILE);
        info!("Writing properties file {}", properties.display());
        self.fs.write(&properties, &artifacts.to_properties())?;

        let version = if group_suffix == BUILDSET_V1 {
            buildset_version(&project.version, self.config.version_qualifier.as_deref())?
        } else {
            project.version.clone()
        };

        let descriptor = PackageDescriptor {
            group_id: format!("{}.{}", project.group_id, group_suffix),
            artifact_id: artefact_id.to_string(),
            version,
        };
        info!(
            "Writing minimal pom with group={}, version={}",
            descriptor.group_id, descriptor.version
        );
        self.fs
            .write(&dir.join(DESCRIPTOR_FILE), &descriptor.render())?;

        Ok(dir)
    }

    /// Writes the pointer that names the isolated-deploy version. The pointer
    /// value keeps the full version; its descriptor uses the truncated one.
    pub fn write_isolated_pointer(
        &self,
        project: &ProjectCoordinates,
    ) -> Result<PathBuf, BuildsetError> {
        let dir = self.output_dir(ISOLATED_DEPLOY_POINTER)?;

        let properties = dir.join(PROPERTIES_FILE);
        info!("Writing pointer file for isolated deploy {}", properties.display());
        self.fs.write(
            &properties,
            &format!("{}={}\n", POINTER_KEY, project.version),
        )?;

        let descriptor = PackageDescriptor {
            group_id: format!("{}.{}", project.group_id, ISOLATED_DEPLOY),
            artifact_id: "build".to_string(),
            version: buildset_version(&project.version, self.config.version_qualifier.as_deref())?,
        };
        info!(
            "Writing minimal pom for isolated-deploy pointer file with group={}, version={}",
            descriptor.group_id, descriptor.version
        );
        self.fs
            .write(&dir.join(DESCRIPTOR_FILE), &descriptor.render())?;

        Ok(dir)
    }

    fn output_dir(&self, group_suffix: &str) -> Result<PathBuf, BuildsetError> {
        let dir = self.config.target_dir().join(group_suffix);
        if !self.fs.is_dir(&dir) {
            self.fs.create_dir_all(&dir)?;
        }
        Ok(dir)
    }
}
