// src/orchestrator/mod.rs
// Clip pipeline: registry -> link block -> job -> transcript -> styling

mod insights;
mod state;

pub use insights::{InsightsStep, GENERATING_STATUS, SUCCESS_STATUS, WAITING_STATUS};
pub use state::{CompletedClip, ProcessingState, RecentClip, StateTracker};

use crate::backend::ClipBackend;
use crate::clip::{ClipRequest, ValidClip};
use crate::config::AppConfig;
use crate::docs::{DocsClient, DocumentOffset, TextStyleKind};
use crate::error::ClipError;
use crate::events::{ClipEvent, EventSink};
use crate::notes;
use crate::poller::{JobPoller, PollPolicy};
use crate::registry::DocRegistry;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Values the orchestrator needs from configuration
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub source_label: String,
    pub watch_url: String,
    pub poll: PollPolicy,
}

impl OrchestratorSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            source_label: config.source_label.clone(),
            watch_url: config.watch_url.clone(),
            poll: PollPolicy::new(config.poll_interval(), config.max_poll_attempts),
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Sole owner of the in-flight and completed clip slots
pub struct ClipOrchestrator {
    docs: DocsClient,
    registry: DocRegistry,
    poller: JobPoller,
    insights: InsightsStep,
    state: Arc<StateTracker>,
    events: Arc<dyn EventSink>,
    settings: OrchestratorSettings,
}

impl ClipOrchestrator {
    pub fn new(
        docs: DocsClient,
        registry: DocRegistry,
        backend: Arc<dyn ClipBackend>,
        events: Arc<dyn EventSink>,
        settings: OrchestratorSettings,
    ) -> Self {
        let state = Arc::new(StateTracker::new());
        let poller = JobPoller::new(backend.clone(), events.clone(), settings.poll);
        let insights = InsightsStep::new(
            backend,
            docs.clone(),
            events.clone(),
            state.clone(),
            settings.poll,
        );

        Self {
            docs,
            registry,
            poller,
            insights,
            state,
            events,
            settings,
        }
    }

    /// Save one clip end to end. Returns the destination document id.
    pub async fn submit_clip(&self, request: ClipRequest) -> Result<String, ClipError> {
        let span = tracing::info_span!(
            "clip",
            clip_id = %Uuid::new_v4(),
            source_id = tracing::field::Empty
        );

        async {
            let result = self.process(&request).await;
            match &result {
                Ok(doc_id) => {
                    tracing::info!("Clip saved to {}", doc_id);
                    self.events.emit(ClipEvent::ClipSuccess {
                        doc_id: doc_id.clone(),
                    });
                }
                Err(e) => {
                    // Single slot: any failure clears it
                    self.state.fail();
                    tracing::error!("Clip failed: {}", e);
                    self.events.emit(ClipEvent::ClipError {
                        error: e.clip_message(),
                    });
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn process(&self, request: &ClipRequest) -> Result<String, ClipError> {
        let clip = request.validate(&self.settings.source_label, &self.settings.watch_url)?;
        tracing::Span::current().record("source_id", clip.source_id.as_str());

        // Before any job is submitted, including on a registry hit
        self.docs.authorize().await?;

        let resolved = self
            .registry
            .get_or_create(&clip.doc_key(), &clip.clean_title)
            .await?;
        let doc_id = resolved.doc_id;

        self.state.begin(&doc_id, &clip.source_id);

        self.run_tracked(&clip, &doc_id, resolved.created).await?;
        Ok(doc_id)
    }

    async fn run_tracked(&self, clip: &ValidClip, doc_id: &str, created: bool) -> Result<(), ClipError> {
        let link = notes::link_block(clip.start_time, clip.end_time);

        if created {
            self.docs.append_text(doc_id, &link).await?;
        }

        let transcript = self.poller.run(clip).await?;
        self.state.complete(doc_id, &transcript);

        if !created {
            self.docs.append_text(doc_id, &link).await?;
        }
        self.docs
            .append_text(doc_id, &notes::transcript_block(&transcript))
            .await?;

        self.style_clip(clip, doc_id).await
    }

    async fn style_clip(&self, clip: &ValidClip, doc_id: &str) -> Result<(), ClipError> {
        let url = clip.timestamped_url();
        let anchor = self
            .docs
            .restyle_last(
                doc_id,
                notes::CLIP_ANCHOR,
                &TextStyleKind::Hyperlink { url: url.clone() },
            )
            .await?;

        self.docs
            .restyle_last(doc_id, notes::TRANSCRIPT_LABEL, &TextStyleKind::Bold)
            .await?;

        // Only this clip's text; older clips keep their own links.
        if let Some(anchor) = anchor {
            let from = DocumentOffset(anchor.0 + notes::CLIP_ANCHOR.utf16_len());
            self.docs
                .link_standalone_word(doc_id, notes::ANCHOR_WORD, &url, from)
                .await?;
        }

        Ok(())
    }

    /// See [`InsightsStep::run`]
    pub async fn generate_insights_for_latest_clip(&self) -> Result<String, ClipError> {
        self.insights.run().await
    }

    /// In-memory only
    pub fn check_recent_clip(&self) -> RecentClip {
        self.state.recent()
    }

    pub fn processing_state(&self) -> ProcessingState {
        self.state.processing()
    }

    pub fn latest_completed(&self) -> Option<CompletedClip> {
        self.state.latest_completed()
    }
}
