// src/clip.rs
// Clip requests as received from the UI, and their validated form

use crate::error::ClipError;
use crate::notes;
use crate::registry::DocKey;
use serde::{Deserialize, Serialize};
use url::Url;

/// A clip save request. `source_id` is optional; it is read from the URL's
/// `v` parameter when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipRequest {
    #[serde(default, alias = "videoUrl")]
    pub source_url: String,
    #[serde(default, alias = "videoId", skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(alias = "videoTitle")]
    pub title: String,
    pub start_time: f64,
    pub end_time: f64,
}

/// A request that passed validation; everything downstream works from this
#[derive(Debug, Clone, PartialEq)]
pub struct ValidClip {
    pub source_id: String,
    pub source_url: Url,
    pub clean_title: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl ClipRequest {
    /// Checks run before any network call
    pub fn validate(&self, source_label: &str, watch_url: &str) -> Result<ValidClip, ClipError> {
        if !self.start_time.is_finite() || !self.end_time.is_finite() {
            return Err(ClipError::Validation("clip times must be finite".to_string()));
        }
        if self.start_time < 0.0 {
            return Err(ClipError::Validation("start time is negative".to_string()));
        }
        if self.end_time <= self.start_time {
            return Err(ClipError::Validation(format!(
                "end time {} is not after start time {}",
                self.end_time, self.start_time
            )));
        }

        let parsed_url = Url::parse(self.source_url.trim()).ok();

        let source_id = self
            .source_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .or_else(|| parsed_url.as_ref().and_then(id_from_url))
            .ok_or_else(|| {
                ClipError::Validation("Could not extract video ID from URL".to_string())
            })?;

        let source_url = match parsed_url {
            Some(url) => url,
            None => fallback_url(watch_url, &source_id)?,
        };

        let clean_title = notes::clean_title(&self.title, source_label);
        if clean_title.is_empty() {
            return Err(ClipError::Validation("title is empty".to_string()));
        }

        Ok(ValidClip {
            source_id,
            source_url,
            clean_title,
            start_time: self.start_time,
            end_time: self.end_time,
        })
    }
}

impl ValidClip {
    pub fn doc_key(&self) -> DocKey {
        DocKey::new(&self.source_id, &self.clean_title)
    }

    pub fn timestamped_url(&self) -> String {
        notes::timestamped_url(&self.source_url, self.start_time)
    }
}

fn id_from_url(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.trim().to_string())
        .filter(|id| !id.is_empty())
}

fn fallback_url(watch_url: &str, source_id: &str) -> Result<Url, ClipError> {
    let mut url = Url::parse(watch_url)
        .map_err(|e| ClipError::Validation(format!("watch URL {}: {}", watch_url, e)))?;
    url.query_pairs_mut().clear().append_pair("v", source_id);
    Ok(url)
}
