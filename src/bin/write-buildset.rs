use buildset::cli::WriteBuildsetArgs;
use buildset::config::BuildsetConfig;
use buildset::fs::RealFileSystem;
use buildset::util::init_from_args;
use buildset::{NAME, VERSION};

use clap::Parser;
use std::process;
use tracing::{debug, error, info};

fn main() {
    let args = WriteBuildsetArgs::parse();
    init_from_args(&args.log);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    process::exit(handle_write_buildset());
}

fn handle_write_buildset() -> i32 {
    let config = match BuildsetConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return 1;
        }
    };
    debug!("Base directory: {}", config.base_dir.display());

    match buildset::buildset::run(&RealFileSystem::new(), &config) {
        Ok(summary) => {
            info!(
                "Wrote {} artifact entries for {}:{}",
                summary.artifacts.len(),
                summary.project.group_id,
                summary.project.version
            );
            0
        }
        Err(e) => {
            error!("{}", e);
            1
        }
    }
}
