use buildset::cli::QualityGateArgs;
use buildset::config::SonarConfig;
use buildset::fs::RealFileSystem;
use buildset::sonar::{self, QualityGateClient};
use buildset::util::init_from_args;
use buildset::{NAME, VERSION};

use clap::Parser;
use std::process;
use tracing::{debug, error};

fn main() {
    let args = QualityGateArgs::parse();
    init_from_args(&args.log);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    process::exit(handle_quality_gate());
}

fn handle_quality_gate() -> i32 {
    let config = match SonarConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return 1;
        }
    };

    let client = match QualityGateClient::new(config.auth_token.clone(), config.request_timeout) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return 1;
        }
    };

    match sonar::run(&RealFileSystem::new(), &client, &config) {
        Ok(response) => {
            println!("{}", response);
            0
        }
        Err(e) => {
            error!("{}", e);
            1
        }
    }
}
