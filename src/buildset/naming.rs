//! Logical names, artifact references, and buildset version rules

use super::BuildsetError;

/// Organisation prefix dropped from logical names
pub const ORG_PREFIX: &str = "net.apmoller.crb.";
const NAME_SEPARATOR: &str = "___";

pub const REGISTRY_PLACEHOLDER: &str = "${docker-registry-internal}";
pub const NAMESPACE_PLACEHOLDER: &str = "${docker-registry-namespace}";
pub const ARTIFACT_ID_PLACEHOLDER: &str = "${project.artifactId}";

/// Removes spaces, tabs, and newlines.
pub fn strip_whitespace(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '\n'))
        .collect()
}

/// Properties key for a leaf module, e.g. `foo___bar_baz` for
/// `net.apmoller.crb.foo` / `bar-baz`.
pub fn logical_name(group_id: &str, artifact_id: &str) -> String {
    let joined = format!("{}{}{}", group_id, NAME_SEPARATOR, artifact_id);
    let name = joined.replace(ORG_PREFIX, "").replace(['.', '-'], "_");
    strip_whitespace(&name)
}

pub fn maven_coordinate(group_id: &str, artifact_id: &str, version: &str, packaging: &str) -> String {
    strip_whitespace(&format!(
        "{}:{}:{}:{}",
        group_id, artifact_id, version, packaging
    ))
}

/// Expands an image name template into a `docker://image:version` reference.
pub fn docker_reference(
    template: &str,
    registry_host: &str,
    namespace: Option<&str>,
    artifact_id: &str,
    version: &str,
) -> Result<String, BuildsetError> {
    let mut image = template.replace(REGISTRY_PLACEHOLDER, registry_host);

    if image.contains(NAMESPACE_PLACEHOLDER) {
        let namespace = namespace.ok_or_else(|| BuildsetError::MissingDockerNamespace {
            template: template.to_string(),
        })?;
        image = image.replace(NAMESPACE_PLACEHOLDER, namespace);
    }

    let image = image.replace(ARTIFACT_ID_PLACEHOLDER, artifact_id);
    Ok(strip_whitespace(&format!("docker://{}:{}", image, version)))
}

/// Truncates to `major.minor`, dropping any `-` suffix and the patch level,
/// then appends `-<qualifier>` when one is given.
pub fn buildset_version(version: &str, qualifier: Option<&str>) -> Result<String, BuildsetError> {
    let release = version.split('-').next().unwrap_or(version);
    let mut parts = release.split('.');

    let major_minor = match (parts.next(), parts.next()) {
        (Some(major), Some(minor)) => format!("{}.{}", major, minor),
        _ => return Err(BuildsetError::InvalidVersion(version.to_string())),
    };

    Ok(match qualifier {
        Some(q) => format!("{}-{}", major_minor, q),
        None => major_minor,
    })
}
