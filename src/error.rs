// src/error.rs
// Error taxonomy shared by every clip operation

use thiserror::Error;

/// Failure of a clip save or insights request
#[derive(Debug, Error)]
pub enum ClipError {
    /// Credential denied or expired
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Non-2xx or malformed response from the backend or the document API
    #[error("Remote error: {0}")]
    Remote(String),

    /// Malformed clip request, raised before any network call
    #[error("Invalid clip: {0}")]
    Validation(String),

    /// Backend reported the job as failed
    #[error("{0}")]
    Job(String),

    /// Polling cap exceeded
    #[error("Timed out waiting for transcript after {attempts} attempts")]
    Timeout { attempts: u32 },

    /// Insights requested with no available transcript
    #[error("No recent clip data found. Please try saving the clip again.")]
    NoClip,

    /// Insights payload missing or empty
    #[error("Insights error: {0}")]
    Insights(String),

    /// Local registry file could not be read or written
    #[error("Store error: {0}")]
    Store(String),
}

impl ClipError {
    /// Message carried by `clipError` notifications
    pub fn clip_message(&self) -> String {
        format!("Failed to process clip: {}", self)
    }

    /// Message carried by `insightsError` notifications
    pub fn insights_message(&self) -> String {
        format!("Error generating insights: {}", self)
    }

    /// Classify an HTTP status from a credentialed endpoint
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 | 403 => ClipError::Auth(format!("HTTP {}: {}", status, body)),
            _ => ClipError::Remote(format!("HTTP {}: {}", status, body)),
        }
    }

    /// Classify a transport failure
    pub fn from_transport(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClipError::Remote(format!("{}: request timed out", context))
        } else {
            ClipError::Remote(format!("{}: {}", context, err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let auth = ClipError::from_status(reqwest::StatusCode::UNAUTHORIZED, "expired");
        assert!(matches!(auth, ClipError::Auth(_)));

        let denied = ClipError::from_status(reqwest::StatusCode::FORBIDDEN, "");
        assert!(matches!(denied, ClipError::Auth(_)));

        let remote = ClipError::from_status(reqwest::StatusCode::BAD_GATEWAY, "upstream");
        assert!(matches!(remote, ClipError::Remote(ref m) if m.contains("upstream")));
    }

    #[test]
    fn test_timeout_and_job_messages_differ() {
        let timeout = ClipError::Timeout { attempts: 30 };
        let job = ClipError::Job("Error processing clip: no audio".to_string());

        assert_ne!(timeout.to_string(), job.to_string());
        assert_eq!(
            job.clip_message(),
            "Failed to process clip: Error processing clip: no audio"
        );
        assert!(timeout.clip_message().contains("Timed out"));
    }
}
