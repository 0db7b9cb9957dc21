#![allow(dead_code)]

use async_trait::async_trait;
use clipnote::backend::{ClipBackend, JobId, JobStatus, JobStatusReport};
use clipnote::docs::types::{
    Body, Paragraph, ParagraphElement, StructuralElement, TextRun, UpdateTextStyleRequest,
};
use clipnote::docs::{Document, DocsClient, DocumentApi, Request};
use clipnote::events::{ClipEvent, EventSink};
use clipnote::poller::PollPolicy;
use clipnote::registry::{DocRegistry, RegistryStore};
use clipnote::{ClipError, ClipOrchestrator, ClipRequest, OrchestratorSettings, ValidClip};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory document store; each document is one text run starting at index 1
#[derive(Default)]
pub struct FakeDocs {
    pub texts: Mutex<HashMap<String, String>>,
    pub creates: Mutex<Vec<String>>,
    pub batches: Mutex<Vec<(String, Vec<Request>)>>,
    pub deny_auth: AtomicBool,
}

impl FakeDocs {
    pub fn text(&self, doc_id: &str) -> String {
        self.texts
            .lock()
            .unwrap()
            .get(doc_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Texts of end-of-segment inserts, in order
    pub fn appended(&self, doc_id: &str) -> Vec<String> {
        self.requests(doc_id)
            .into_iter()
            .filter_map(|r| match r {
                Request::InsertText(insert) if insert.location.is_none() => Some(insert.text),
                _ => None,
            })
            .collect()
    }

    pub fn style_updates(&self, doc_id: &str) -> Vec<UpdateTextStyleRequest> {
        self.requests(doc_id)
            .into_iter()
            .filter_map(|r| match r {
                Request::UpdateTextStyle(update) => Some(update),
                _ => None,
            })
            .collect()
    }

    fn check_auth(&self) -> Result<(), ClipError> {
        if self.deny_auth.load(Ordering::SeqCst) {
            return Err(ClipError::Auth("HTTP 401 Unauthorized: expired".to_string()));
        }
        Ok(())
    }

    fn requests(&self, doc_id: &str) -> Vec<Request> {
        self.batches
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == doc_id)
            .flat_map(|(_, requests)| requests.clone())
            .collect()
    }
}

#[async_trait]
impl DocumentApi for FakeDocs {
    async fn create_document(&self, title: &str) -> Result<String, ClipError> {
        self.check_auth()?;
        let mut creates = self.creates.lock().unwrap();
        creates.push(title.to_string());
        let doc_id = format!("doc-{}", creates.len());
        self.texts
            .lock()
            .unwrap()
            .insert(doc_id.clone(), String::new());
        Ok(doc_id)
    }

    async fn get_document(&self, doc_id: &str) -> Result<Document, ClipError> {
        self.check_auth()?;
        let text = self.text(doc_id);
        Ok(Document {
            document_id: doc_id.to_string(),
            body: Body {
                content: vec![StructuralElement {
                    paragraph: Some(Paragraph {
                        elements: vec![ParagraphElement {
                            start_index: Some(1),
                            end_index: None,
                            text_run: Some(TextRun { content: text }),
                        }],
                    }),
                    ..StructuralElement::default()
                }],
            },
            ..Document::default()
        })
    }

    async fn batch_update(&self, doc_id: &str, requests: Vec<Request>) -> Result<(), ClipError> {
        self.check_auth()?;
        {
            let mut texts = self.texts.lock().unwrap();
            let text = texts.entry(doc_id.to_string()).or_default();
            for request in &requests {
                if let Request::InsertText(insert) = request {
                    match &insert.location {
                        // ASCII only: byte offset = index - 1
                        Some(location) => {
                            let at = (location.index as usize).saturating_sub(1).min(text.len());
                            text.insert_str(at, &insert.text);
                        }
                        None => text.push_str(&insert.text),
                    }
                }
            }
        }
        self.batches
            .lock()
            .unwrap()
            .push((doc_id.to_string(), requests));
        Ok(())
    }

    async fn authorize(&self) -> Result<(), ClipError> {
        self.check_auth()
    }
}

/// Backend whose jobs stay `processing` until released
pub struct FakeBackend {
    pub released: AtomicBool,
    pub job_error: Mutex<Option<String>>,
    pub transcripts: Mutex<HashMap<String, String>>,
    pub insights: Mutex<String>,
    pub submits: Mutex<Vec<String>>,
    pub insight_requests: Mutex<Vec<String>>,
    jobs: Mutex<HashMap<String, String>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            released: AtomicBool::new(true),
            job_error: Mutex::new(None),
            transcripts: Mutex::new(HashMap::new()),
            insights: Mutex::new("Key Insights: 1. Say hello".to_string()),
            submits: Mutex::new(Vec::new()),
            insight_requests: Mutex::new(Vec::new()),
            jobs: Mutex::new(HashMap::new()),
        }
    }
}

impl FakeBackend {
    pub fn held() -> Self {
        let backend = Self::default();
        backend.released.store(false, Ordering::SeqCst);
        backend
    }

    pub fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
    }

    pub fn submit_count(&self) -> usize {
        self.submits.lock().unwrap().len()
    }
}

#[async_trait]
impl ClipBackend for FakeBackend {
    async fn submit(&self, clip: &ValidClip) -> Result<JobId, ClipError> {
        let mut submits = self.submits.lock().unwrap();
        submits.push(clip.source_id.clone());
        let job = format!("t{}", submits.len());
        self.jobs
            .lock()
            .unwrap()
            .insert(job.clone(), clip.source_id.clone());
        Ok(JobId(job))
    }

    async fn status(&self, job: &JobId) -> Result<JobStatusReport, ClipError> {
        if !self.released.load(Ordering::SeqCst) {
            return Ok(JobStatusReport {
                status: JobStatus::Processing,
                message: None,
                transcript: None,
            });
        }

        if let Some(message) = self.job_error.lock().unwrap().clone() {
            return Ok(JobStatusReport {
                status: JobStatus::Error,
                message: Some(message),
                transcript: None,
            });
        }

        let source_id = self
            .jobs
            .lock()
            .unwrap()
            .get(&job.0)
            .cloned()
            .unwrap_or_default();
        let transcript = self
            .transcripts
            .lock()
            .unwrap()
            .get(&source_id)
            .cloned()
            .unwrap_or_else(|| "hello world".to_string());

        Ok(JobStatusReport {
            status: JobStatus::Completed,
            message: None,
            transcript: Some(transcript),
        })
    }

    async fn generate_insights(&self, transcript: &str) -> Result<String, ClipError> {
        self.insight_requests
            .lock()
            .unwrap()
            .push(transcript.to_string());
        Ok(self.insights.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub saved: Mutex<HashMap<String, String>>,
}

impl RegistryStore for MemoryStore {
    fn load(&self) -> Result<HashMap<String, String>, ClipError> {
        Ok(self.saved.lock().unwrap().clone())
    }

    fn save(&self, mapping: &HashMap<String, String>) -> Result<(), ClipError> {
        *self.saved.lock().unwrap() = mapping.clone();
        Ok(())
    }
}

#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<ClipEvent>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<ClipEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn has(&self, wanted: &ClipEvent) -> bool {
        self.events.lock().unwrap().iter().any(|e| e == wanted)
    }
}

impl EventSink for Recorder {
    fn emit(&self, event: ClipEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub struct Harness {
    pub orchestrator: Arc<ClipOrchestrator>,
    pub docs: Arc<FakeDocs>,
    pub backend: Arc<FakeBackend>,
    pub store: Arc<MemoryStore>,
    pub events: Arc<Recorder>,
}

pub fn harness(backend: FakeBackend) -> Harness {
    let docs = Arc::new(FakeDocs::default());
    let backend = Arc::new(backend);
    let store = Arc::new(MemoryStore::default());
    let events = Arc::new(Recorder::default());

    let client = DocsClient::new(docs.clone());
    let registry = DocRegistry::load(store.clone(), client.clone(), "YouTube");
    let settings = OrchestratorSettings {
        poll: PollPolicy::new(Duration::from_millis(2), 2_000),
        ..OrchestratorSettings::default()
    };

    let orchestrator = Arc::new(ClipOrchestrator::new(
        client,
        registry,
        backend.clone(),
        events.clone(),
        settings,
    ));

    Harness {
        orchestrator,
        docs,
        backend,
        store,
        events,
    }
}

pub fn clip(source_id: &str, title: &str, start: f64, end: f64) -> ClipRequest {
    ClipRequest {
        source_url: String::new(),
        source_id: Some(source_id.to_string()),
        title: title.to_string(),
        start_time: start,
        end_time: end,
    }
}

/// Poll `check` every millisecond for up to five seconds
pub async fn eventually(mut check: impl FnMut() -> bool) {
    for _ in 0..5_000 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("condition not reached");
}
