use super::SonarError;
use crate::{NAME, VERSION};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Compute-engine task as reported by `api/ce/task`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CeTask {
    pub id: Option<String>,
    pub status: Option<String>,
    pub component_key: Option<String>,
    pub analysis_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CeTaskEnvelope {
    task: Option<CeTask>,
}

/// Body returned for a task-status request, kept verbatim for printing.
#[derive(Debug, Clone, PartialEq)]
pub struct CeTaskResponse {
    pub http_status: u16,
    pub body: Value,
}

impl CeTaskResponse {
    pub fn task(&self) -> Option<CeTask> {
        serde_json::from_value::<CeTaskEnvelope>(self.body.clone())
            .ok()
            .and_then(|envelope| envelope.task)
    }

    pub fn task_status(&self) -> Option<String> {
        self.task().and_then(|task| task.status)
    }
}

impl fmt::Display for CeTaskResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pretty = serde_json::to_string_pretty(&self.body).map_err(|_| fmt::Error)?;
        f.write_str(&pretty)
    }
}

/// HTTP client for the analysis server's task endpoint.
pub struct QualityGateClient {
    http: Client,
    auth_token: String,
}

impl QualityGateClient {
    pub fn new(auth_token: impl Into<String>, timeout: Duration) -> Result<Self, SonarError> {
        let http = Client::builder()
            .user_agent(format!("{}/{}", NAME, VERSION))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            auth_token: auth_token.into(),
        })
    }

    /// GETs `url` with basic auth (token as username, empty password).
    ///
    /// The body must be JSON. A non-success status is logged but the body is
    /// still returned, since the server reports errors as JSON too.
    pub fn fetch_task(&self, url: &str) -> Result<CeTaskResponse, SonarError> {
        debug!(url, "Fetching task attributes");

        let response = self
            .http
            .get(url)
            .basic_auth(&self.auth_token, Some(""))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), url, "Analysis server returned an error status");
        }

        let body = response.json::<Value>().map_err(|source| {
            if source.is_decode() {
                SonarError::InvalidJson {
                    url: url.to_string(),
                    source,
                }
            } else {
                SonarError::Http(source)
            }
        })?;

        Ok(CeTaskResponse {
            http_status: status.as_u16(),
            body,
        })
    }
}
