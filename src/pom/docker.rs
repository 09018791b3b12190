//! Detection of image-producing modules

use super::{child_text, find_all, text_of};
use roxmltree::Node;
use tracing::debug;

pub const DOCKER_PLUGIN: &str = "docker-maven-plugin";
const BUILD_GOAL: &str = "build";

/// Returns the configured image name template when the project builds a Docker image.
///
/// Root-level plugins are scanned first, then every profile. Within one plugin
/// list the first `docker-maven-plugin` is taken; a match in a later profile
/// replaces an earlier one. The chosen plugin only counts when one of its
/// execution goals is `build` and it configures at least one named image.
pub fn detect_docker_image(project: Node) -> Option<String> {
    let mut found = first_docker_plugin(project);

    for profile in find_all(project, &["profiles", "profile"]) {
        if let Some(plugin) = first_docker_plugin(profile) {
            let id = child_text(profile, "id").unwrap_or_else(|| "<unnamed>".to_string());
            debug!(profile = %id, "Found {} in profile", DOCKER_PLUGIN);
            found = Some(plugin);
        }
    }

    let plugin = found?;

    let builds_image = find_all(plugin, &["executions", "execution", "goals", "goal"])
        .into_iter()
        .filter_map(text_of)
        .any(|goal| goal == BUILD_GOAL);
    if !builds_image {
        debug!("{} present without a build goal", DOCKER_PLUGIN);
        return None;
    }

    let image = find_all(plugin, &["configuration", "images", "image"])
        .into_iter()
        .next()?;
    let name = child_text(image, "name")?;

    debug!(image = %name, "Docker image detected");
    Some(name)
}

fn first_docker_plugin<'a, 'input>(scope: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    find_all(scope, &["build", "plugins", "plugin"])
        .into_iter()
        .find(|plugin| {
            let artifact = child_text(*plugin, "artifactId").unwrap_or_default();
            debug!(plugin = %artifact, "Found plugin");
            artifact == DOCKER_PLUGIN
        })
}
