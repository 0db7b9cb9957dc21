// src/orchestrator/state.rs
// In-flight and last-completed clip slots

use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The single tracked in-flight clip. A newer clip overwrites it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingState {
    pub in_progress: bool,
    pub doc_id: Option<String>,
    pub source_id: Option<String>,
}

/// Most recently completed clip; overwritten by each completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedClip {
    pub doc_id: String,
    pub transcript: String,
}

/// Answer to `checkRecentClip`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentClip {
    pub has_recent_clip: bool,
    pub is_processing: bool,
}

#[derive(Default)]
struct Slots {
    processing: ProcessingState,
    completed: Option<CompletedClip>,
    completions: u64,
}

/// Never held across an await, so reads stay synchronous
#[derive(Default)]
pub struct StateTracker {
    slots: Mutex<Slots>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn begin(&self, doc_id: &str, source_id: &str) {
        let mut slots = self.slots();
        if slots.processing.in_progress {
            tracing::warn!(
                "State: clip for {:?} still in flight, tracking {} instead",
                slots.processing.source_id,
                source_id
            );
        }
        slots.processing = ProcessingState {
            in_progress: true,
            doc_id: Some(doc_id.to_string()),
            source_id: Some(source_id.to_string()),
        };
    }

    /// Store the transcript and clear the in-flight flag
    pub fn complete(&self, doc_id: &str, transcript: &str) {
        let mut slots = self.slots();
        slots.completed = Some(CompletedClip {
            doc_id: doc_id.to_string(),
            transcript: transcript.to_string(),
        });
        slots.completions += 1;
        slots.processing.in_progress = false;
    }

    pub fn fail(&self) {
        self.slots().processing.in_progress = false;
    }

    pub fn processing(&self) -> ProcessingState {
        self.slots().processing.clone()
    }

    pub fn is_processing(&self) -> bool {
        self.slots().processing.in_progress
    }

    /// Copy of the latest completed clip
    pub fn latest_completed(&self) -> Option<CompletedClip> {
        self.slots().completed.clone()
    }

    /// Number of completions so far
    pub fn completions(&self) -> u64 {
        self.slots().completions
    }

    pub fn recent(&self) -> RecentClip {
        let slots = self.slots();
        let finished = slots
            .completed
            .as_ref()
            .is_some_and(|c| !c.doc_id.is_empty() && !c.transcript.is_empty());
        let processing = slots.processing.in_progress;

        RecentClip {
            has_recent_clip: finished || processing,
            is_processing: processing,
        }
    }
}
