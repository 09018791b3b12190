use super::naming::{docker_reference, logical_name, maven_coordinate};
use super::{ArtifactMap, BuildsetError};
use crate::fs::FileSystem;
use crate::pom::PomDescriptor;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const POM_FILE: &str = "pom.xml";

/// Coordinates a module resolved after applying inheritance from its parents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedModule {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub docker_namespace: Option<String>,
}

/// Group and version of the root project, used to name the published buildsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCoordinates {
    pub group_id: String,
    pub version: String,
}

/// Walks a Maven module tree and collects one artifact entry per leaf module.
pub struct BuildsetResolver<'a> {
    fs: &'a dyn FileSystem,
    registry_host: &'a str,
    artifacts: ArtifactMap,
}

impl<'a> BuildsetResolver<'a> {
    pub fn new(fs: &'a dyn FileSystem, registry_host: &'a str) -> Self {
        Self {
            fs,
            registry_host,
            artifacts: ArtifactMap::new(),
        }
    }

    /// Resolves the whole tree rooted at `<root_dir>/pom.xml`.
    pub fn resolve(&mut self, root_dir: &Path) -> Result<ProjectCoordinates, BuildsetError> {
        let root = self.parse_pom(root_dir, &ResolvedModule::default())?;
        let pom_path = root_dir.join(POM_FILE);

        Ok(ProjectCoordinates {
            group_id: require(root.group_id, "groupId", &pom_path)?,
            version: require(root.version, "version", &pom_path)?,
        })
    }

    /// Parses `<dir>/pom.xml`, recursing into child modules with this
    /// module's values as their inherited defaults.
    pub fn parse_pom(
        &mut self,
        dir: &Path,
        parent: &ResolvedModule,
    ) -> Result<ResolvedModule, BuildsetError> {
        let pom_path = self.fs.join(dir, POM_FILE);
        debug!("parsing: {}", pom_path.display());

        if !self.fs.exists(&pom_path) {
            return Err(BuildsetError::MissingPom { path: pom_path });
        }
        let content = self.fs.read_to_string(&pom_path)?;
        let pom = PomDescriptor::parse(&content).map_err(|source| BuildsetError::Pom {
            path: pom_path.clone(),
            source,
        })?;

        let module = ResolvedModule {
            group_id: pom.group_id.clone().or_else(|| parent.group_id.clone()),
            artifact_id: pom.artifact_id.clone().or_else(|| parent.artifact_id.clone()),
            version: pom.version.clone().or_else(|| parent.version.clone()),
            docker_namespace: pom
                .docker_namespace
                .clone()
                .or_else(|| parent.docker_namespace.clone()),
        };
        let packaging = pom.packaging_or_default();

        info!(
            "Found component {}:{}:{}:{}",
            module.group_id.as_deref().unwrap_or("?"),
            module.artifact_id.as_deref().unwrap_or("?"),
            module.version.as_deref().unwrap_or("?"),
            packaging
        );

        if pom.is_aggregator() {
            debug!(modules = pom.modules.len(), "Component has modules");
            for name in &pom.modules {
                let child_dir = self.fs.join(dir, name);
                self.parse_pom(&child_dir, &module)?;
            }
            return Ok(module);
        }

        let group_id = require_ref(&module.group_id, "groupId", &pom_path)?;
        let artifact_id = require_ref(&module.artifact_id, "artifactId", &pom_path)?;
        let version = require_ref(&module.version, "version", &pom_path)?;

        let key = logical_name(group_id, artifact_id);
        let artifact = match &pom.docker_image {
            Some(template) => docker_reference(
                template,
                self.registry_host,
                module.docker_namespace.as_deref(),
                artifact_id,
                version,
            )?,
            None => maven_coordinate(group_id, artifact_id, version, packaging),
        };

        info!("Resolved artifact entry {}={}", key, artifact);
        if let Some(previous) = self.artifacts.insert(key.clone(), artifact) {
            warn!(key = %key, previous = %previous, "Duplicate logical name, keeping latest artifact");
        }

        Ok(module)
    }

    pub fn artifacts(&self) -> &ArtifactMap {
        &self.artifacts
    }

    pub fn into_artifacts(self) -> ArtifactMap {
        self.artifacts
    }
}

fn require(value: Option<String>, field: &'static str, path: &Path) -> Result<String, BuildsetError> {
    value.ok_or_else(|| missing(field, path))
}

fn require_ref<'v>(
    value: &'v Option<String>,
    field: &'static str,
    path: &Path,
) -> Result<&'v str, BuildsetError> {
    value.as_deref().ok_or_else(|| missing(field, path))
}

fn missing(field: &'static str, path: &Path) -> BuildsetError {
    BuildsetError::MissingCoordinate {
        field,
        path: PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_REGISTRY_HOST;
    use crate::fs::MockFileSystem;

    fn resolve(fs: &MockFileSystem) -> (ProjectCoordinates, ArtifactMap) {
        let mut resolver = BuildsetResolver::new(fs, DEFAULT_REGISTRY_HOST);
        let coords = resolver.resolve(fs.root()).unwrap();
        (coords, resolver.into_artifacts())
    }

    #[test]
    fn test_single_leaf_maven_coordinate() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "pom.xml",
            r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
                <groupId>com.example</groupId>
                <artifactId>app</artifactId>
                <version>1.0.0</version>
            </project>"#,
        );

        let (coords, artifacts) = resolve(&fs);

        assert_eq!(coords.group_id, "com.example");
        assert_eq!(coords.version, "1.0.0");
        assert_eq!(artifacts.len(), 1);
        assert_eq!(
            artifacts.get("com_example___app"),
            Some("com.example:app:1.0.0:jar")
        );
    }

    #[test]
    fn test_leaf_inherits_group_and_version() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "pom.xml",
            r#"<project>
                <groupId>net.apmoller.crb.shop</groupId>
                <artifactId>shop-parent</artifactId>
                <version>4.1.0</version>
                <packaging>pom</packaging>
                <modules><module>shop-api</module></modules>
            </project>"#,
        );
        fs.add_file(
            "shop-api/pom.xml",
            "<project><artifactId>shop-api</artifactId></project>",
        );

        let (coords, artifacts) = resolve(&fs);

        assert_eq!(coords.group_id, "net.apmoller.crb.shop");
        assert_eq!(
            artifacts.get("shop___shop_api"),
            Some("net.apmoller.crb.shop:shop-api:4.1.0:jar")
        );
    }

    #[test]
    fn test_aggregators_contribute_no_entries() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "pom.xml",
            r#"<project>
                <groupId>g</groupId><artifactId>root</artifactId><version>1.0</version>
                <modules><module>group-a</module><module>leaf-c</module></modules>
            </project>"#,
        );
        fs.add_file(
            "group-a/pom.xml",
            r#"<project>
                <artifactId>group-a</artifactId>
                <modules><module>leaf-a</module><module>leaf-b</module></modules>
            </project>"#,
        );
        fs.add_file("group-a/leaf-a/pom.xml", "<project><artifactId>leaf-a</artifactId></project>");
        fs.add_file("group-a/leaf-b/pom.xml", "<project><artifactId>leaf-b</artifactId></project>");
        fs.add_file("leaf-c/pom.xml", "<project><artifactId>leaf-c</artifactId></project>");

        let (_, artifacts) = resolve(&fs);

        let keys: Vec<&str> = artifacts.keys().collect();
        assert_eq!(keys, vec!["g___leaf_a", "g___leaf_b", "g___leaf_c"]);
    }

    #[test]
    fn test_child_overrides_inherited_values() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "pom.xml",
            r#"<project>
                <groupId>g</groupId><artifactId>root</artifactId><version>1.0</version>
                <modules><module>child</module></modules>
            </project>"#,
        );
        fs.add_file(
            "child/pom.xml",
            r#"<project>
                <groupId>other.group</groupId>
                <artifactId>child</artifactId>
                <version>9.9.9</version>
                <packaging>war</packaging>
            </project>"#,
        );

        let (_, artifacts) = resolve(&fs);
        assert_eq!(
            artifacts.get("other_group___child"),
            Some("other.group:child:9.9.9:war")
        );
    }

    #[test]
    fn test_packaging_not_inherited() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "pom.xml",
            r#"<project>
                <groupId>g</groupId><artifactId>root</artifactId><version>1.0</version>
                <packaging>pom</packaging>
                <modules><module>lib</module></modules>
            </project>"#,
        );
        fs.add_file("lib/pom.xml", "<project><artifactId>lib</artifactId></project>");

        let (_, artifacts) = resolve(&fs);
        assert_eq!(artifacts.get("g___lib"), Some("g:lib:1.0:jar"));
    }

    #[test]
    fn test_docker_leaf_uses_inherited_namespace() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "pom.xml",
            r#"<project>
                <groupId>net.apmoller.crb.team</groupId>
                <artifactId>parent</artifactId>
                <version>1.2.3</version>
                <properties><docker-registry-namespace>ns</docker-registry-namespace></properties>
                <modules><module>svc</module></modules>
            </project>"#,
        );
        fs.add_file(
            "svc/pom.xml",
            r#"<project>
                <artifactId>svc</artifactId>
                <build><plugins><plugin>
                    <artifactId>docker-maven-plugin</artifactId>
                    <executions><execution><goals><goal>build</goal></goals></execution></executions>
                    <configuration><images><image>
                        <name>${docker-registry-internal}/${docker-registry-namespace}/${project.artifactId}</name>
                    </image></images></configuration>
                </plugin></plugins></build>
            </project>"#,
        );

        let (_, artifacts) = resolve(&fs);
        assert_eq!(
            artifacts.get("team___svc"),
            Some("docker://docker.cdpipeline.apmoller.net:10043/ns/svc:1.2.3")
        );
    }

    #[test]
    fn test_custom_registry_host() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "pom.xml",
            r#"<project>
                <groupId>g</groupId><artifactId>img</artifactId><version>2.0</version>
                <build><plugins><plugin>
                    <artifactId>docker-maven-plugin</artifactId>
                    <executions><execution><goals><goal>build</goal></goals></execution></executions>
                    <configuration><images><image>
                        <name>${docker-registry-internal}/base/${project.artifactId}</name>
                    </image></images></configuration>
                </plugin></plugins></build>
            </project>"#,
        );

        let mut resolver = BuildsetResolver::new(&fs, "registry.local:5000");
        resolver.resolve(fs.root()).unwrap();
        assert_eq!(
            resolver.artifacts().get("g___img"),
            Some("docker://registry.local:5000/base/img:2.0")
        );
    }

    #[test]
    fn test_leaf_missing_version_is_error() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "pom.xml",
            "<project><groupId>g</groupId><artifactId>a</artifactId></project>",
        );

        let mut resolver = BuildsetResolver::new(&fs, DEFAULT_REGISTRY_HOST);
        let err = resolver.resolve(fs.root()).unwrap_err();
        assert!(matches!(
            err,
            BuildsetError::MissingCoordinate { field: "version", .. }
        ));
    }

    #[test]
    fn test_missing_module_descriptor_is_error() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "pom.xml",
            r#"<project>
                <groupId>g</groupId><version>1.0</version>
                <modules><module>ghost</module></modules>
            </project>"#,
        );

        let mut resolver = BuildsetResolver::new(&fs, DEFAULT_REGISTRY_HOST);
        let err = resolver.resolve(fs.root()).unwrap_err();
        assert!(
            matches!(err, BuildsetError::MissingPom { ref path } if path == Path::new("/mock/ghost/pom.xml"))
        );
    }

    #[test]
    fn test_malformed_descriptor_reports_path() {
        let fs = MockFileSystem::new();
        fs.add_file("pom.xml", "<project><groupId>g</project>");

        let mut resolver = BuildsetResolver::new(&fs, DEFAULT_REGISTRY_HOST);
        let err = resolver.resolve(fs.root()).unwrap_err();
        assert!(err.to_string().contains("/mock/pom.xml"));
    }
}
