//! Wire models for the Chroma Studio generation API
//!
//! The remote contract is JSON with camelCase keys:
//! - `POST /image-gen` accepts a [`GenerationRequest`] and returns a [`JobTicket`]
//! - `GET /image-gen/<userId>/<jobId>/status` returns a [`StatusResponse`]
//!
//! A completed job reports its output either as a single [`MediaItem`] or as
//! a list of them; [`JobResult`] covers both shapes.

use serde::{Deserialize, Serialize};

/// JSON body for `POST /image-gen`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub model: String,
    pub tool_type: String,
    pub effect_id: String,
    pub image_url: String,
    pub user_id: String,
    pub remove_watermark: bool,
    pub is_private: bool,
}

/// Response from `POST /image-gen`; extra fields are ignored
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTicket {
    pub job_id: String,
}

/// Remote job status. The set is closed: an unrecognized value is a
/// malformed response, not an implicit "still running".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    Error,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Queued | JobStatus::Processing)
    }
}

/// Response from the status endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: JobStatus,
    #[serde(default)]
    pub result: Option<JobResult>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A completed job's output: one media item or a list of them
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum JobResult {
    Many(Vec<MediaItem>),
    One(MediaItem),
}

/// One generated output. Exactly one of the fields is expected populated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_ignores_extra_fields() {
        let ticket: JobTicket =
            serde_json::from_str(r#"{"jobId": "J1", "credits": 3}"#).unwrap();
        assert_eq!(ticket.job_id, "J1");
    }

    #[test]
    fn test_status_deserializes_lowercase() {
        let body: StatusResponse =
            serde_json::from_str(r#"{"status": "processing"}"#).unwrap();
        assert_eq!(body.status, JobStatus::Processing);
        assert!(!body.status.is_terminal());
        assert!(body.result.is_none());
    }

    #[test]
    fn test_unknown_status_is_an_error() {
        let result = serde_json::from_str::<StatusResponse>(r#"{"status": "paused"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_result_list_shape() {
        let body: StatusResponse = serde_json::from_str(
            r#"{"status": "completed", "result": [{"video": "https://x/a.mp4"}]}"#,
        )
        .unwrap();
        match body.result.unwrap() {
            JobResult::Many(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].video.as_deref(), Some("https://x/a.mp4"));
            }
            JobResult::One(_) => panic!("expected list shape"),
        }
    }

    #[test]
    fn test_result_single_shape() {
        let body: StatusResponse = serde_json::from_str(
            r#"{"status": "completed", "result": {"image": "https://x/b.png"}}"#,
        )
        .unwrap();
        match body.result.unwrap() {
            JobResult::One(item) => {
                assert_eq!(item.image.as_deref(), Some("https://x/b.png"));
                assert!(item.media_url.is_none());
            }
            JobResult::Many(_) => panic!("expected single shape"),
        }
    }

    #[test]
    fn test_failed_status_carries_error() {
        let body: StatusResponse = serde_json::from_str(
            r#"{"status": "failed", "error": "face not detected"}"#,
        )
        .unwrap();
        assert_eq!(body.status, JobStatus::Failed);
        assert!(body.status.is_terminal());
        assert_eq!(body.error.as_deref(), Some("face not detected"));
    }
}
