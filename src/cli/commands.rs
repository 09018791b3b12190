use clap::{Args, Parser};

/// Logging switches shared by both binaries
#[derive(Args, Debug, Clone, Default)]
pub struct LogArgs {
    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

/// Fetch the analysis task recorded by the last scan and print it
#[derive(Parser, Debug)]
#[command(
    name = "sonar-quality-gate",
    version,
    long_about = "Waits for the analysis server to register the scan, links \
                  $WORKSPACE/.sonar/report-task.txt into target/sonar, reads the \
                  ceTaskUrl from it and prints the task JSON returned by the server.\n\n\
                  Environment:\n  \
                  WORKSPACE        CI workspace root (required)\n  \
                  sonarAuthToken   analysis server token (required)"
)]
pub struct QualityGateArgs {
    #[command(flatten)]
    pub log: LogArgs,
}

/// Resolve a Maven module tree into buildset property files
#[derive(Parser, Debug)]
#[command(
    name = "write-buildset",
    version,
    long_about = "Parses pom.xml in the current directory and every module below it, \
                  then writes target/buildsetv1, target/isolated-deploy and \
                  target/isolated-deploy-pointer, each holding build.properties and a \
                  minimal pom.xml.\n\n\
                  Environment:\n  \
                  BUILDSET_VERSION_QUALIFIER   suffix for major.minor versions (optional)"
)]
pub struct WriteBuildsetArgs {
    #[command(flatten)]
    pub log: LogArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_parsers_are_consistent() {
        QualityGateArgs::command().debug_assert();
        WriteBuildsetArgs::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_required() {
        let args = WriteBuildsetArgs::try_parse_from(["write-buildset"]).unwrap();
        assert!(args.log.log_level.is_none());
        assert!(!args.log.verbose);
        assert!(!args.log.quiet);
    }

    #[test]
    fn test_log_flags() {
        let args =
            QualityGateArgs::try_parse_from(["sonar-quality-gate", "--log-level", "debug"]).unwrap();
        assert_eq!(args.log.log_level.as_deref(), Some("debug"));

        let args = QualityGateArgs::try_parse_from(["sonar-quality-gate", "-v"]).unwrap();
        assert!(args.log.verbose);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(WriteBuildsetArgs::try_parse_from(["write-buildset", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_positional_arguments_rejected() {
        assert!(WriteBuildsetArgs::try_parse_from(["write-buildset", "some/dir"]).is_err());
    }
}
