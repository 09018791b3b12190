//! Shared helpers for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub const DOCKER_IMAGE_TEMPLATE: &str =
    "${docker-registry-internal}/${docker-registry-namespace}/${project.artifactId}";

/// Writes `<dir>/pom.xml`, creating `dir` as needed.
pub fn write_pom(dir: &Path, body: &str) -> PathBuf {
    fs::create_dir_all(dir).expect("Failed to create module directory");
    let path = dir.join("pom.xml");
    fs::write(
        &path,
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <project xmlns=\"http://maven.apache.org/POM/4.0.0\" \
             xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\n\
             <modelVersion>4.0.0</modelVersion>\n{}\n</project>\n",
            body
        ),
    )
    .expect("Failed to write pom.xml");
    path
}

/// `<build>` section declaring a docker-maven-plugin that builds `image`.
pub fn docker_build_section(image: &str) -> String {
    format!(
        r#"<build>
  <plugins>
    <plugin>
      <groupId>io.fabric8</groupId>
      <artifactId>docker-maven-plugin</artifactId>
      <executions>
        <execution>
          <id>build-image</id>
          <phase>package</phase>
          <goals><goal>build</goal></goals>
        </execution>
      </executions>
      <configuration>
        <images>
          <image><name>{}</name></image>
        </images>
      </configuration>
    </plugin>
  </plugins>
</build>"#,
        image
    )
}

/// A three-level project: aggregator root, a library, and a nested service
/// group with one jar module and one image module.
pub fn create_shop_project(root: &Path) {
    write_pom(
        root,
        r#"<groupId>net.apmoller.crb.shop</groupId>
<artifactId>shop-parent</artifactId>
<version>2.5.1-RC1</version>
<packaging>pom</packaging>
<properties>
  <docker-registry-namespace>shop</docker-registry-namespace>
</properties>
<modules>
  <module>shop-lib</module>
  <module>services</module>
</modules>"#,
    );
    write_pom(&root.join("shop-lib"), "<artifactId>shop-lib</artifactId>");
    write_pom(
        &root.join("services"),
        r#"<artifactId>services</artifactId>
<packaging>pom</packaging>
<modules>
  <module>order-api</module>
  <module>order-service</module>
</modules>"#,
    );
    write_pom(
        &root.join("services/order-api"),
        "<artifactId>order-api</artifactId>\n<packaging>war</packaging>",
    );
    write_pom(
        &root.join("services/order-service"),
        &format!(
            "<artifactId>order-service</artifactId>\n{}",
            docker_build_section(DOCKER_IMAGE_TEMPLATE)
        ),
    );
}

pub fn run_bin(bin: &str, dir: &Path, envs: &[(&str, &str)]) -> Output {
    let mut command = Command::new(bin);
    command
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("BUILDSET_VERSION_QUALIFIER")
        .env_remove("DOCKER_REGISTRY_INTERNAL");
    for (key, value) in envs {
        command.env(key, value);
    }
    command.output().expect("Failed to execute binary")
}

pub fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path.as_ref())
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.as_ref().display(), e))
}
