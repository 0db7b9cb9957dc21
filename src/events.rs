// src/events.rs
// Fire-and-forget status notifications for whatever UI is listening

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ClipEvent {
    #[serde(rename_all = "camelCase")]
    ClipStatus { status: String, show_spinner: bool },
    #[serde(rename_all = "camelCase")]
    ClipSuccess { doc_id: String },
    ClipError { error: String },
    #[serde(rename_all = "camelCase")]
    ProcessingStatus { status: String, is_error: bool },
    InsightsSuccess { status: String },
    InsightsError { status: String },
}

impl ClipEvent {
    pub fn clip_status(status: impl Into<String>) -> Self {
        ClipEvent::ClipStatus {
            status: status.into(),
            show_spinner: true,
        }
    }

    pub fn processing(status: impl Into<String>) -> Self {
        ClipEvent::ProcessingStatus {
            status: status.into(),
            is_error: false,
        }
    }
}

/// Delivery never fails from the caller's point of view
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ClipEvent);
}

/// Fan-out to any number of subscribers; zero subscribers is fine
pub struct BroadcastEvents {
    tx: broadcast::Sender<ClipEvent>,
}

impl BroadcastEvents {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClipEvent> {
        self.tx.subscribe()
    }
}

impl EventSink for BroadcastEvents {
    fn emit(&self, event: ClipEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::debug!("No listener for {:?}", e.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_wire_shape() {
        let status = serde_json::to_value(ClipEvent::clip_status("Processing (queued)")).unwrap();
        assert_eq!(
            status,
            json!({"action": "clipStatus", "status": "Processing (queued)", "showSpinner": true})
        );

        let success = serde_json::to_value(ClipEvent::ClipSuccess {
            doc_id: "doc-1".to_string(),
        })
        .unwrap();
        assert_eq!(success, json!({"action": "clipSuccess", "docId": "doc-1"}));

        let processing = serde_json::to_value(ClipEvent::processing("Generating insights...")).unwrap();
        assert_eq!(processing["isError"], false);
        assert_eq!(processing["action"], "processingStatus");
    }

    #[test]
    fn test_emit_without_subscriber_is_silent() {
        let events = BroadcastEvents::new(8);
        events.emit(ClipEvent::InsightsSuccess {
            status: "Insights added to document!".to_string(),
        });
    }

    #[tokio::test]
    async fn test_subscriber_receives_events() {
        let events = BroadcastEvents::new(8);
        let mut rx = events.subscribe();

        events.emit(ClipEvent::ClipError {
            error: "Failed to process clip: boom".to_string(),
        });

        assert_eq!(
            rx.recv().await.unwrap(),
            ClipEvent::ClipError {
                error: "Failed to process clip: boom".to_string()
            }
        );
    }
}
