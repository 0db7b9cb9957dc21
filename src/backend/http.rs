// src/backend/http.rs
// REST adapter for the clip-processing backend

use super::{ClipBackend, JobId, JobStatusReport};
use crate::clip::ValidClip;
use crate::error::ClipError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct ProcessClipBody<'a> {
    video_url: &'a str,
    start_time: f64,
    end_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    openai_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct ProcessClipResponse {
    #[serde(default)]
    task_id: Option<String>,
}

#[derive(Serialize)]
struct InsightsBody<'a> {
    transcript: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    openai_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct InsightsResponse {
    #[serde(default)]
    insights: Option<String>,
}

pub struct HttpClipBackend {
    client: Client,
    base_url: String,
    openai_key: Option<String>,
}

impl HttpClipBackend {
    pub fn new(base_url: impl Into<String>, openai_key: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        let base_url = base_url.into();
        tracing::info!("Backend adapter initialized ({})", base_url);

        Self {
            client,
            base_url,
            openai_key,
        }
    }

    async fn error_from(response: reqwest::Response, context: &str) -> ClipError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = if body.trim().is_empty() {
            status.to_string()
        } else {
            body
        };
        ClipError::Remote(format!("{}: {}", context, detail))
    }
}

#[async_trait]
impl ClipBackend for HttpClipBackend {
    async fn submit(&self, clip: &ValidClip) -> Result<JobId, ClipError> {
        let body = ProcessClipBody {
            video_url: clip.source_url.as_str(),
            start_time: clip.start_time,
            end_time: clip.end_time,
            openai_key: self.openai_key.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/process-clip", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ClipError::from_transport("Backend process-clip", e))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "Backend error").await);
        }

        let parsed: ProcessClipResponse = response
            .json()
            .await
            .map_err(|e| ClipError::Remote(format!("Backend process-clip parse: {}", e)))?;

        match parsed.task_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => Ok(JobId(id)),
            None => Err(ClipError::Remote(
                "Backend did not return a task_id".to_string(),
            )),
        }
    }

    async fn status(&self, job: &JobId) -> Result<JobStatusReport, ClipError> {
        let response = self
            .client
            .get(format!("{}/status/{}", self.base_url, job))
            .send()
            .await
            .map_err(|e| ClipError::from_transport("Backend status", e))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "Status check failed").await);
        }

        response
            .json()
            .await
            .map_err(|e| ClipError::Remote(format!("Backend status parse: {}", e)))
    }

    async fn generate_insights(&self, transcript: &str) -> Result<String, ClipError> {
        let body = InsightsBody {
            transcript,
            openai_key: self.openai_key.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/generate-insights", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ClipError::from_transport("Backend generate-insights", e))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "Backend error").await);
        }

        let parsed: InsightsResponse = response
            .json()
            .await
            .map_err(|e| ClipError::Remote(format!("Backend insights parse: {}", e)))?;

        parsed
            .insights
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ClipError::Insights("No insights returned from backend".to_string()))
    }
}
