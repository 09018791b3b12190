use super::SonarError;
use crate::config::SonarConfig;
use crate::fs::FileSystem;
use std::path::PathBuf;
use tracing::{debug, info};

pub const REPORT_FILE: &str = "report-task.txt";

/// Makes sure both report directories exist and that the scanner's report is
/// linked into the build output tree. An existing entry at the link path is
/// never replaced. Returns the link path.
pub fn prepare_workspace(fs: &dyn FileSystem, config: &SonarConfig) -> Result<PathBuf, SonarError> {
    let report_dir = config.report_dir();
    let scanner_dir = config.scanner_dir();

    for dir in [&report_dir, &scanner_dir] {
        if !fs.is_dir(dir) {
            debug!("Creating {}", dir.display());
            fs.create_dir_all(dir)?;
        }
    }

    let link = report_dir.join(REPORT_FILE);
    if fs.entry_exists(&link) {
        debug!("{} already present", link.display());
    } else {
        let target = scanner_dir.join(REPORT_FILE);
        fs.symlink(&target, &link)?;
        info!("Linked {} -> {}", link.display(), target.display());
    }

    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use std::path::Path;

    #[test]
    fn test_creates_directories_and_link() {
        let fs = MockFileSystem::new();
        let config = SonarConfig::immediate("/mock", "token");

        let link = prepare_workspace(&fs, &config).unwrap();

        assert_eq!(link, PathBuf::from("/mock/target/sonar/report-task.txt"));
        assert!(fs.is_dir(Path::new("/mock/target/sonar")));
        assert!(fs.is_dir(Path::new("/mock/.sonar")));
        assert_eq!(
            fs.link_target(&link),
            Some(PathBuf::from("/mock/.sonar/report-task.txt"))
        );
    }

    #[test]
    fn test_existing_file_not_replaced() {
        let fs = MockFileSystem::new();
        fs.add_file("target/sonar/report-task.txt", "ceTaskUrl=http://kept");
        let config = SonarConfig::immediate("/mock", "token");

        let link = prepare_workspace(&fs, &config).unwrap();

        assert_eq!(fs.link_target(&link), None);
        assert_eq!(fs.read_to_string(&link).unwrap(), "ceTaskUrl=http://kept");
    }

    #[test]
    fn test_idempotent() {
        let fs = MockFileSystem::new();
        let config = SonarConfig::immediate("/mock", "token");

        prepare_workspace(&fs, &config).unwrap();
        prepare_workspace(&fs, &config).unwrap();
    }
}
