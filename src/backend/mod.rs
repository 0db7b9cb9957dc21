// src/backend/mod.rs
// Transcription backend: job submission, status, insights

mod http;

pub use http::HttpClipBackend;

use crate::clip::ValidClip;
use crate::error::ClipError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque backend job identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        }
    }
}

/// One `/status` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatusReport {
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

impl JobStatusReport {
    /// Text shown to the user for this status
    pub fn display_message(&self) -> String {
        match self.message.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => format!("Processing ({})", self.status.as_str()),
        }
    }
}

#[async_trait]
pub trait ClipBackend: Send + Sync {
    /// Start a transcription job for the clip
    async fn submit(&self, clip: &ValidClip) -> Result<JobId, ClipError>;

    /// Current job status; non-2xx is an error the poller treats as transient
    async fn status(&self, job: &JobId) -> Result<JobStatusReport, ClipError>;

    /// Derived insights for a transcript
    async fn generate_insights(&self, transcript: &str) -> Result<String, ClipError>;
}
