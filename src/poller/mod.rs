// src/poller/mod.rs
// Submit a clip job and poll it to completion

mod policy;

pub use policy::PollPolicy;

use crate::backend::{ClipBackend, JobId, JobStatus};
use crate::clip::ValidClip;
use crate::error::ClipError;
use crate::events::{ClipEvent, EventSink};
use std::sync::Arc;

pub const SUBMITTED_STATUS: &str = "Processing clip... this may take a minute";

/// submitted -> polling -> completed | error | timed out
pub struct JobPoller {
    backend: Arc<dyn ClipBackend>,
    events: Arc<dyn EventSink>,
    policy: PollPolicy,
}

impl JobPoller {
    pub fn new(backend: Arc<dyn ClipBackend>, events: Arc<dyn EventSink>, policy: PollPolicy) -> Self {
        Self {
            backend,
            events,
            policy,
        }
    }

    /// Submit then poll; returns the transcript
    pub async fn run(&self, clip: &ValidClip) -> Result<String, ClipError> {
        let job = self.submit(clip).await?;
        self.poll(&job).await
    }

    pub async fn submit(&self, clip: &ValidClip) -> Result<JobId, ClipError> {
        let job = self.backend.submit(clip).await?;
        tracing::info!("Poller: submitted job {}", job);
        self.events.emit(ClipEvent::clip_status(SUBMITTED_STATUS));
        Ok(job)
    }

    /// Status fetch failures count as attempts and are retried.
    /// `error` ends polling immediately.
    pub async fn poll(&self, job: &JobId) -> Result<String, ClipError> {
        let max = self.policy.max_attempts();

        for attempt in 0..max {
            tracing::debug!("Poller: job {} attempt {}/{}", job, attempt + 1, max);

            match self.backend.status(job).await {
                Ok(report) => {
                    self.events
                        .emit(ClipEvent::clip_status(report.display_message()));

                    match report.status {
                        JobStatus::Completed => {
                            let transcript = report
                                .transcript
                                .filter(|t| !t.trim().is_empty())
                                .ok_or_else(|| {
                                    ClipError::Remote(
                                        "Job completed without a transcript".to_string(),
                                    )
                                })?;
                            tracing::info!("Poller: job {} completed", job);
                            return Ok(transcript);
                        }
                        JobStatus::Error => {
                            let message = report
                                .message
                                .filter(|m| !m.trim().is_empty())
                                .unwrap_or_else(|| "Processing failed".to_string());
                            tracing::warn!("Poller: job {} failed: {}", job, message);
                            return Err(ClipError::Job(message));
                        }
                        JobStatus::Queued | JobStatus::Processing => {}
                    }
                }
                Err(e) => {
                    tracing::warn!("Poller: status check for {} failed: {}", job, e);
                }
            }

            if self.policy.has_next(attempt) {
                self.policy.wait(attempt).await;
            }
        }

        tracing::warn!("Poller: job {} timed out after {} attempts", job, max);
        Err(ClipError::Timeout { attempts: max })
    }
}
