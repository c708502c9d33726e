//! Workflow orchestration
//!
//! The orchestrator owns the session record and sequences the components
//! into the user-facing operations:
//! - [`Orchestrator::ingest`]: validate, upload, preview
//! - [`Orchestrator::generate`]: submit, poll, resolve, store the result
//! - [`Orchestrator::download`]: fetch the stored result through the
//!   strategy cascade
//! - [`Orchestrator::reset`]: clear the session back to idle
//!
//! Every failure inside an operation is caught once at this boundary,
//! surfaced to the collaborator verbatim, and the phase reset to the
//! nearest recoverable state (Idle after an ingest failure, Ready after a
//! generate failure) so the session is never stuck in flight.
//!
//! Operations are not cancelled when superseded: a newer ingest or reset
//! advances the session epoch, and any still-running operation discards
//! its completion when the epoch it captured no longer matches.

pub mod session;

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

use crate::api::{ApiClient, ClientError};
use crate::config::Config;
use crate::download::{self, DownloadError, DownloadOutcome};
use crate::job::poll::{self, PollError};
use crate::job::resolve::{self, NoMediaUrl};
use crate::job::submit::{self, SubmissionError};
use crate::observability::Metrics;
use crate::upload::{self, FileSource, UploadError, UploadedAsset};

pub use session::{Phase, SessionState};

/// Collaborator notified of phase changes and surfaced errors. The
/// display text and busy flag are derived from the phase itself
/// ([`Phase::display`], [`Phase::is_busy`]).
///
/// Callbacks run with the session lock held: return quickly and do not
/// call back into the orchestrator.
pub trait StatusSink: Send + Sync {
    fn phase_changed(&self, phase: &Phase);
    fn error(&self, message: &str);
}

/// Sink that drops everything; for headless callers.
pub struct DiscardSink;

impl StatusSink for DiscardSink {
    fn phase_changed(&self, _phase: &Phase) {}
    fn error(&self, _message: &str) {}
}

/// Failure anywhere in the generate pipeline.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Poll(#[from] PollError),

    #[error(transparent)]
    NoMediaUrl(#[from] NoMediaUrl),
}

#[derive(Debug)]
pub enum IngestOutcome {
    /// Asset uploaded and stored; the session is ready to generate.
    Ready(UploadedAsset),
    /// The file is not an image; nothing changed.
    NotAnImage,
    /// A newer operation took over while the upload was in flight.
    Superseded,
    /// Upload failed; the session was reset to idle.
    Failed(UploadError),
}

#[derive(Debug)]
pub enum GenerateOutcome {
    Complete { result_url: String },
    /// No uploaded asset; nothing happened, no network was touched.
    NoAsset,
    /// An operation is already in flight; the request was rejected.
    Busy,
    /// A newer operation took over; the job's completion was discarded.
    Superseded,
    /// Generation failed; the asset is still valid and the session is
    /// ready for a retry.
    Failed(GenerateError),
}

pub struct Orchestrator {
    client: ApiClient,
    config: Config,
    session: Mutex<SessionState>,
    sink: Arc<dyn StatusSink>,
    metrics: Metrics,
}

impl Orchestrator {
    pub fn new(config: Config, sink: Arc<dyn StatusSink>) -> Result<Self, ClientError> {
        let client = ApiClient::new(config.api.clone(), &config.http)?;
        Ok(Self {
            client,
            config,
            session: Mutex::new(SessionState::new()),
            sink,
            metrics: Metrics::new(),
        })
    }

    /// Validate and upload a file, making it the session's asset.
    ///
    /// Permitted from any phase; starting it supersedes whatever else is
    /// in flight. A non-image file is rejected with no state change.
    pub async fn ingest(&self, file: FileSource) -> IngestOutcome {
        if !file.is_image() {
            self.sink.error("please select an image file");
            return IngestOutcome::NotAnImage;
        }

        let epoch = {
            let mut session = self.session.lock();
            let epoch = session.advance_epoch();
            self.set_phase(&mut session, Phase::Uploading);
            epoch
        };

        match upload::upload(&self.client, &file).await {
            Ok(asset) => {
                let mut session = self.session.lock();
                if session.epoch() != epoch {
                    debug!(object_name = asset.object_name, "Discarding superseded upload");
                    return IngestOutcome::Superseded;
                }
                session.uploaded_asset = Some(asset.clone());
                session.active_job_id = None;
                session.current_result_url = None;
                self.set_phase(&mut session, Phase::Ready);
                self.metrics.upload_completed();
                IngestOutcome::Ready(asset)
            }
            Err(error) => {
                let mut session = self.session.lock();
                if session.epoch() != epoch {
                    return IngestOutcome::Superseded;
                }
                self.metrics.upload_failed();
                self.set_phase(&mut session, Phase::Errored);
                self.sink.error(&error.to_string());
                session.uploaded_asset = None;
                session.active_job_id = None;
                session.current_result_url = None;
                self.set_phase(&mut session, Phase::Idle);
                IngestOutcome::Failed(error)
            }
        }
    }

    /// Run the generation job for the current asset.
    ///
    /// A no-op without an asset; rejected while any operation is in
    /// flight. On failure the asset survives and the session returns to
    /// ready, so retrying is a plain second call.
    pub async fn generate(&self) -> GenerateOutcome {
        let (asset_url, epoch) = {
            let mut session = self.session.lock();
            let Some(asset) = session.uploaded_asset.as_ref() else {
                return GenerateOutcome::NoAsset;
            };
            if session.phase.is_busy() {
                return GenerateOutcome::Busy;
            }
            let asset_url = asset.public_url.clone();
            self.set_phase(&mut session, Phase::Submitting);
            (asset_url, session.epoch())
        };

        match self.run_generation(&asset_url, epoch).await {
            Ok(Some(result_url)) => GenerateOutcome::Complete { result_url },
            Ok(None) => GenerateOutcome::Superseded,
            Err(error) => {
                let mut session = self.session.lock();
                if session.epoch() != epoch {
                    return GenerateOutcome::Superseded;
                }
                self.metrics.job_failed();
                self.set_phase(&mut session, Phase::Errored);
                self.sink.error(&error.to_string());
                session.active_job_id = None;
                // The asset is still valid, so a retry is meaningful.
                self.set_phase(&mut session, Phase::Ready);
                GenerateOutcome::Failed(error)
            }
        }
    }

    /// Submit, poll, resolve. Returns `Ok(None)` when a newer operation
    /// superseded this one mid-flight.
    async fn run_generation(
        &self,
        asset_url: &str,
        epoch: u64,
    ) -> Result<Option<String>, GenerateError> {
        let ticket = submit::submit(&self.client, &self.config.profile, asset_url).await?;
        self.metrics.job_submitted();

        {
            let mut session = self.session.lock();
            if session.epoch() != epoch {
                debug!(job_id = ticket.job_id, "Discarding superseded submission");
                return Ok(None);
            }
            session.active_job_id = Some(ticket.job_id.clone());
            self.set_phase(&mut session, Phase::Queued);
        }

        let status = poll::run(&self.client, &self.config.poll, &ticket.job_id, |progress| {
            let mut session = self.session.lock();
            if session.epoch() == epoch {
                self.set_phase(&mut session, Phase::Processing { attempt: progress.attempt });
            }
        })
        .await?;

        let result = status.result.ok_or(NoMediaUrl)?;
        let result_url = resolve::media_url(&result)?.to_string();

        let mut session = self.session.lock();
        if session.epoch() != epoch {
            debug!(job_id = ticket.job_id, "Discarding superseded result");
            return Ok(None);
        }
        session.current_result_url = Some(result_url.clone());
        session.active_job_id = None;
        self.set_phase(&mut session, Phase::Complete);
        self.metrics.job_completed();

        Ok(Some(result_url))
    }

    /// Fetch the current result through the strategy cascade and save it.
    /// Returns `Ok(None)` when no result URL is stored.
    pub async fn download(&self) -> Result<Option<DownloadOutcome>, DownloadError> {
        let result_url = self.session.lock().current_result_url.clone();
        let Some(result_url) = result_url else {
            return Ok(None);
        };

        let outcome = download::download(&self.client, &self.config.download, &result_url).await?;
        self.metrics.download_finished(&outcome);

        Ok(Some(outcome))
    }

    /// Clear the whole session back to idle, superseding anything in flight.
    pub fn reset(&self) {
        let mut session = self.session.lock();
        session.advance_epoch();
        session.uploaded_asset = None;
        session.active_job_id = None;
        session.current_result_url = None;
        self.set_phase(&mut session, Phase::Idle);
    }

    pub fn phase(&self) -> Phase {
        self.session.lock().phase.clone()
    }

    pub fn asset_url(&self) -> Option<String> {
        self.session
            .lock()
            .uploaded_asset
            .as_ref()
            .map(|asset| asset.public_url.clone())
    }

    pub fn result_url(&self) -> Option<String> {
        self.session.lock().current_result_url.clone()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn set_phase(&self, session: &mut SessionState, phase: Phase) {
        session.phase = phase;
        self.sink.phase_changed(&session.phase);
    }
}
