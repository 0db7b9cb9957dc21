// src/orchestrator/insights.rs
// Insights for the latest completed clip

use super::state::{CompletedClip, StateTracker};
use crate::backend::ClipBackend;
use crate::docs::{DocsClient, TextStyleKind};
use crate::error::ClipError;
use crate::events::{ClipEvent, EventSink};
use crate::notes;
use crate::poller::PollPolicy;
use std::sync::Arc;
use tokio::time::sleep;

pub const WAITING_STATUS: &str =
    "Waiting for clip processing to complete before generating insights...";
pub const GENERATING_STATUS: &str = "Generating insights...";
pub const SUCCESS_STATUS: &str = "Insights added to document!";

pub struct InsightsStep {
    backend: Arc<dyn ClipBackend>,
    docs: DocsClient,
    events: Arc<dyn EventSink>,
    state: Arc<StateTracker>,
    wait: PollPolicy,
}

impl InsightsStep {
    pub fn new(
        backend: Arc<dyn ClipBackend>,
        docs: DocsClient,
        events: Arc<dyn EventSink>,
        state: Arc<StateTracker>,
        wait: PollPolicy,
    ) -> Self {
        Self {
            backend,
            docs,
            events,
            state,
            wait,
        }
    }

    /// Wait out an in-flight clip, then append insights for the latest one.
    /// Outcome is also reported through events.
    pub async fn run(&self) -> Result<String, ClipError> {
        match self.generate().await {
            Ok(doc_id) => {
                tracing::info!("Insights: added to {}", doc_id);
                self.events.emit(ClipEvent::InsightsSuccess {
                    status: SUCCESS_STATUS.to_string(),
                });
                Ok(doc_id)
            }
            Err(ClipError::NoClip) => {
                tracing::warn!("Insights: no completed clip available");
                self.events.emit(ClipEvent::ProcessingStatus {
                    status: ClipError::NoClip.to_string(),
                    is_error: true,
                });
                Err(ClipError::NoClip)
            }
            Err(e) => {
                tracing::error!("Insights: {}", e);
                self.events.emit(ClipEvent::InsightsError {
                    status: e.insights_message(),
                });
                Err(e)
            }
        }
    }

    async fn generate(&self) -> Result<String, ClipError> {
        let CompletedClip { doc_id, transcript } = self.await_clip().await?;

        self.events.emit(ClipEvent::processing(GENERATING_STATUS));
        let insights = self.backend.generate_insights(&transcript).await?;
        if insights.trim().is_empty() {
            return Err(ClipError::Insights(
                "No insights returned from backend".to_string(),
            ));
        }

        self.docs
            .append_text(&doc_id, &notes::insights_block(&insights))
            .await?;
        self.docs
            .restyle_last(&doc_id, notes::INSIGHTS_LABEL, &TextStyleKind::Bold)
            .await?;

        Ok(doc_id)
    }

    /// Snapshot of the clip to use. Stops waiting once the in-flight clip
    /// finishes either way, or a new completion lands.
    async fn await_clip(&self) -> Result<CompletedClip, ClipError> {
        if self.state.is_processing() {
            self.events.emit(ClipEvent::processing(WAITING_STATUS));
            let seen = self.state.completions();

            for attempt in 0..self.wait.max_attempts() {
                if !self.state.is_processing() || self.state.completions() > seen {
                    break;
                }
                tracing::debug!(
                    "Insights: waiting for clip, attempt {}/{}",
                    attempt + 1,
                    self.wait.max_attempts()
                );
                sleep(self.wait.interval()).await;
            }
        }

        self.state
            .latest_completed()
            .filter(|clip| !clip.doc_id.is_empty() && !clip.transcript.is_empty())
            .ok_or(ClipError::NoClip)
    }
}
