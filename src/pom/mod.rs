//! Maven project descriptor (pom.xml) reading
//!
//! Only the handful of fields the buildset generator needs are extracted.
//! Elements are matched by local name, so descriptors with and without the
//! `http://maven.apache.org/POM/4.0.0` default namespace parse the same way.

mod docker;

pub use docker::{detect_docker_image, DOCKER_PLUGIN};

use roxmltree::{Document, Node};
use thiserror::Error;

pub const DEFAULT_PACKAGING: &str = "jar";

#[derive(Debug, Error)]
pub enum PomError {
    #[error("Malformed pom.xml: {0}")]
    Xml(#[from] roxmltree::Error),
}

/// Fields declared directly in one descriptor, before inheritance is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomDescriptor {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub docker_namespace: Option<String>,
    pub modules: Vec<String>,
    pub docker_image: Option<String>,
}

impl PomDescriptor {
    pub fn parse(content: &str) -> Result<Self, PomError> {
        let doc = Document::parse(content)?;
        let project = doc.root_element();

        // Only direct children of <project>; <parent> and dependency
        // coordinates must not be picked up.
        Ok(Self {
            group_id: child_text(project, "groupId"),
            artifact_id: child_text(project, "artifactId"),
            version: child_text(project, "version"),
            packaging: child_text(project, "packaging"),
            docker_namespace: find_all(project, &["properties", "docker-registry-namespace"])
                .into_iter()
                .next()
                .and_then(text_of),
            modules: find_all(project, &["modules", "module"])
                .into_iter()
                .filter_map(text_of)
                .collect(),
            docker_image: detect_docker_image(project),
        })
    }

    /// A descriptor that lists child modules contributes no artifact itself.
    pub fn is_aggregator(&self) -> bool {
        !self.modules.is_empty()
    }

    pub fn packaging_or_default(&self) -> &str {
        self.packaging.as_deref().unwrap_or(DEFAULT_PACKAGING)
    }
}

/// Collects every element reached by walking `path` one child level at a time.
pub(crate) fn find_all<'a, 'input>(node: Node<'a, 'input>, path: &[&str]) -> Vec<Node<'a, 'input>> {
    let mut current = vec![node];
    for name in path {
        current = current
            .into_iter()
            .flat_map(|n| {
                n.children()
                    .filter(move |c| c.is_element() && c.has_tag_name(*name))
            })
            .collect();
    }
    current
}

pub(crate) fn child_text(node: Node, name: &str) -> Option<String> {
    node.children()
        .find(|c| c.is_element() && c.has_tag_name(name))
        .and_then(text_of)
}

pub(crate) fn text_of(node: Node) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
