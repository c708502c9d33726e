//! Session state: the single mutable record behind the orchestrator

use crate::upload::UploadedAsset;

/// Workflow phase. The set is closed so invalid states are unrepresentable;
/// the mapping to display text lives in [`Phase::display`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Uploading,
    Ready,
    Submitting,
    Queued,
    Processing { attempt: u32 },
    Complete,
    Errored,
}

impl Phase {
    /// True while a workflow operation is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            Phase::Uploading | Phase::Submitting | Phase::Queued | Phase::Processing { .. }
        )
    }

    /// Status line for the collaborator to render.
    pub fn display(&self) -> String {
        match self {
            Phase::Idle => "IDLE".to_string(),
            Phase::Uploading => "UPLOADING...".to_string(),
            Phase::Ready => "READY".to_string(),
            Phase::Submitting => "SUBMITTING JOB...".to_string(),
            Phase::Queued => "JOB QUEUED...".to_string(),
            Phase::Processing { attempt } => format!("PROCESSING... ({attempt})"),
            Phase::Complete => "COMPLETE".to_string(),
            Phase::Errored => "ERROR".to_string(),
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Idle
    }
}

/// Exactly one record per session.
///
/// `epoch` increases whenever a newer operation supersedes whatever is in
/// flight; an async completion that captured an older epoch must discard
/// its result instead of committing it.
#[derive(Debug, Default)]
pub struct SessionState {
    pub uploaded_asset: Option<UploadedAsset>,
    pub active_job_id: Option<String>,
    pub current_result_url: Option<String>,
    pub phase: Phase,
    epoch: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Mark everything currently in flight as superseded.
    pub fn advance_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_texts() {
        assert_eq!(Phase::Uploading.display(), "UPLOADING...");
        assert_eq!(Phase::Ready.display(), "READY");
        assert_eq!(Phase::Submitting.display(), "SUBMITTING JOB...");
        assert_eq!(Phase::Queued.display(), "JOB QUEUED...");
        assert_eq!(Phase::Processing { attempt: 7 }.display(), "PROCESSING... (7)");
        assert_eq!(Phase::Complete.display(), "COMPLETE");
        assert_eq!(Phase::Errored.display(), "ERROR");
    }

    #[test]
    fn test_busy_phases() {
        assert!(Phase::Uploading.is_busy());
        assert!(Phase::Submitting.is_busy());
        assert!(Phase::Queued.is_busy());
        assert!(Phase::Processing { attempt: 1 }.is_busy());

        assert!(!Phase::Idle.is_busy());
        assert!(!Phase::Ready.is_busy());
        assert!(!Phase::Complete.is_busy());
        assert!(!Phase::Errored.is_busy());
    }

    #[test]
    fn test_epoch_is_monotonic() {
        let mut session = SessionState::new();
        let first = session.epoch();
        let second = session.advance_epoch();
        let third = session.advance_epoch();
        assert!(first < second && second < third);
    }
}
