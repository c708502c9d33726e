//! Telemetry counters for workflow outcomes

use std::sync::atomic::{AtomicU64, Ordering};

use crate::download::{DownloadOutcome, Strategy};

/// Counters for the session's workflow activity, including which download
/// strategy ultimately produced each artifact.
#[derive(Debug, Default)]
pub struct Metrics {
    uploads_completed: AtomicU64,
    uploads_failed: AtomicU64,
    jobs_submitted: AtomicU64,
    jobs_completed: AtomicU64,
    jobs_failed: AtomicU64,
    downloads_proxied: AtomicU64,
    downloads_direct: AtomicU64,
    downloads_manual: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upload_completed(&self) {
        self.uploads_completed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "uploads_completed", "Metric incremented");
    }

    pub fn upload_failed(&self) {
        self.uploads_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "uploads_failed", "Metric incremented");
    }

    pub fn job_submitted(&self) {
        self.jobs_submitted.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "jobs_submitted", "Metric incremented");
    }

    pub fn job_completed(&self) {
        self.jobs_completed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "jobs_completed", "Metric incremented");
    }

    pub fn job_failed(&self) {
        self.jobs_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "jobs_failed", "Metric incremented");
    }

    /// Record which strategy a finished download attempt ended on.
    pub fn download_finished(&self, outcome: &DownloadOutcome) {
        let counter = match outcome {
            DownloadOutcome::Saved {
                strategy: Strategy::Proxy,
                ..
            } => &self.downloads_proxied,
            DownloadOutcome::Saved {
                strategy: Strategy::Direct,
                ..
            } => &self.downloads_direct,
            DownloadOutcome::ManualSave { .. } => &self.downloads_manual,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uploads_completed: self.uploads_completed.load(Ordering::Relaxed),
            uploads_failed: self.uploads_failed.load(Ordering::Relaxed),
            jobs_submitted: self.jobs_submitted.load(Ordering::Relaxed),
            jobs_completed: self.jobs_completed.load(Ordering::Relaxed),
            jobs_failed: self.jobs_failed.load(Ordering::Relaxed),
            downloads_proxied: self.downloads_proxied.load(Ordering::Relaxed),
            downloads_direct: self.downloads_direct.load(Ordering::Relaxed),
            downloads_manual: self.downloads_manual.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub uploads_completed: u64,
    pub uploads_failed: u64,
    pub jobs_submitted: u64,
    pub jobs_completed: u64,
    pub jobs_failed: u64,
    pub downloads_proxied: u64,
    pub downloads_direct: u64,
    pub downloads_manual: u64,
}
