//! Status polling loop

use thiserror::Error;
use tracing::{debug, warn};

use crate::api::models::{JobStatus, StatusResponse};
use crate::api::{ACCEPT_JSON, ApiClient};
use crate::config::PollConfig;

#[derive(Debug, Error)]
pub enum PollError {
    #[error("status request failed: {0}")]
    Request(String),

    #[error("status check rejected: HTTP {0}")]
    Rejected(u16),

    #[error("malformed status response: {0}")]
    InvalidResponse(String),

    #[error("job failed: {0}")]
    JobFailed(String),

    #[error("job timed out after {0} status checks")]
    TimedOut(u32),
}

/// Progress event emitted once per non-terminal status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollProgress {
    /// 1-based count of status checks that came back non-terminal.
    pub attempt: u32,
}

/// Poll a job until it reaches a terminal state.
///
/// One GET per iteration, a fixed sleep between iterations, and a hard
/// ceiling on the number of checks. A transport failure or non-2xx status
/// ends the whole poll immediately; transient blips are not retried.
pub async fn run(
    client: &ApiClient,
    config: &PollConfig,
    job_id: &str,
    mut on_progress: impl FnMut(PollProgress),
) -> Result<StatusResponse, PollError> {
    let mut attempt: u32 = 0;

    while attempt < config.max_attempts {
        let response = client
            .http()
            .get(client.status_url(job_id))
            .header(reqwest::header::ACCEPT, ACCEPT_JSON)
            .send()
            .await
            .map_err(|e| PollError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PollError::Rejected(response.status().as_u16()));
        }

        let body: StatusResponse = response
            .json()
            .await
            .map_err(|e| PollError::InvalidResponse(e.to_string()))?;

        debug!(job_id, status = ?body.status, attempt, "Status check");

        match body.status {
            JobStatus::Completed => return Ok(body),
            JobStatus::Failed | JobStatus::Error => {
                let message = body
                    .error
                    .unwrap_or_else(|| "job processing failed".to_string());
                warn!(job_id, message, "Job reported failure");
                return Err(PollError::JobFailed(message));
            }
            JobStatus::Queued | JobStatus::Processing => {
                attempt += 1;
                on_progress(PollProgress { attempt });
                tokio::time::sleep(config.interval()).await;
            }
        }
    }

    Err(PollError::TimedOut(config.max_attempts))
}
