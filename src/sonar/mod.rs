//! Quality-gate poller
//!
//! After a scan, the scanner leaves `report-task.txt` in `<WORKSPACE>/.sonar`.
//! The poller links that file into `target/sonar`, reads the compute-engine
//! task URL from it, and fetches the task once from the analysis server.
//!
//! The task status is reported, not judged: nothing here decides whether the
//! pipeline passes based on it.

mod client;
mod report;
mod workspace;

pub use client::{CeTask, CeTaskResponse, QualityGateClient};
pub use report::{ReportTask, CE_TASK_URL_KEY};
pub use workspace::{prepare_workspace, REPORT_FILE};

use crate::config::SonarConfig;
use crate::fs::FileSystem;
use std::path::PathBuf;
use std::thread;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SonarError {
    #[error(transparent)]
    Fs(#[from] anyhow::Error),

    #[error("No {} entry in {}", CE_TASK_URL_KEY, path.display())]
    MissingTaskUrl { path: PathBuf },

    #[error("Request to analysis server failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Response from {url} is not valid JSON: {source}")]
    InvalidJson {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Waits for the scan to register, then fetches its task once.
pub fn run(
    fs: &dyn FileSystem,
    client: &QualityGateClient,
    config: &SonarConfig,
) -> Result<CeTaskResponse, SonarError> {
    if !config.startup_delay.is_zero() {
        info!(
            "Waiting {}s for the analysis task to register",
            config.startup_delay.as_secs()
        );
        thread::sleep(config.startup_delay);
    }

    let report_path = prepare_workspace(fs, config)?;
    let report = ReportTask::parse(&fs.read_to_string(&report_path)?);
    let url = report
        .ce_task_url()
        .ok_or_else(|| SonarError::MissingTaskUrl {
            path: report_path.clone(),
        })?;
    info!("URL from reports: {}", url);

    let response = client.fetch_task(url)?;
    if let Some(task) = response.task() {
        info!(
            id = task.id.as_deref().unwrap_or("?"),
            component = task.component_key.as_deref().unwrap_or("?"),
            analysis = task.analysis_id.as_deref().unwrap_or("?"),
            "Analysis task status: {}",
            task.status.as_deref().unwrap_or("UNKNOWN")
        );
    }

    Ok(response)
}
