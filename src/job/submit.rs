use thiserror::Error;
use tracing::info;

use crate::api::models::{GenerationRequest, JobTicket};
use crate::api::{ACCEPT_JSON, ApiClient};
use crate::config::ProfileConfig;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("job submission failed: {0}")]
    Request(String),

    #[error("job submission rejected: HTTP {0}")]
    Rejected(u16),

    #[error("malformed submission response: {0}")]
    InvalidResponse(String),
}

/// Submit a generation job for an uploaded asset. Single POST, no retry.
pub async fn submit(
    client: &ApiClient,
    profile: &ProfileConfig,
    asset_url: &str,
) -> Result<JobTicket, SubmissionError> {
    let request = GenerationRequest {
        model: profile.model.clone(),
        tool_type: profile.tool_type.clone(),
        effect_id: profile.effect_id.clone(),
        image_url: asset_url.to_string(),
        user_id: client.api().user_id.clone(),
        remove_watermark: profile.remove_watermark,
        is_private: profile.is_private,
    };

    let response = client
        .http()
        .post(client.submit_url())
        .header(reqwest::header::ACCEPT, ACCEPT_JSON)
        .json(&request)
        .send()
        .await
        .map_err(|e| SubmissionError::Request(e.to_string()))?;

    if !response.status().is_success() {
        return Err(SubmissionError::Rejected(response.status().as_u16()));
    }

    let ticket: JobTicket = response
        .json()
        .await
        .map_err(|e| SubmissionError::InvalidResponse(e.to_string()))?;

    info!(job_id = ticket.job_id, "Generation job submitted");

    Ok(ticket)
}
