pub mod auth;
pub mod backend;
pub mod clip;
pub mod config;
pub mod docs;
pub mod error;
pub mod events;
pub mod host;
pub mod notes;
pub mod orchestrator;
pub mod poller;
pub mod registry;

pub use clip::{ClipRequest, ValidClip};
pub use config::{AppConfig, Credentials};
pub use error::ClipError;
pub use events::{BroadcastEvents, ClipEvent, EventSink};
pub use orchestrator::{ClipOrchestrator, OrchestratorSettings, RecentClip};

use backend::HttpClipBackend;
use docs::{DocsClient, GoogleDocsApi};
use registry::{DocRegistry, JsonFileStore};
use std::sync::Arc;

/// Wire the HTTP adapters, token provider and JSON registry from configuration
pub fn build_orchestrator(
    config: &AppConfig,
    credentials: Credentials,
    events: Arc<dyn EventSink>,
) -> ClipOrchestrator {
    let timeout = config.request_timeout();
    let tokens = auth::provider_from_credentials(credentials, timeout);

    let docs = DocsClient::new(Arc::new(GoogleDocsApi::new(
        &config.docs_api_url,
        tokens,
        timeout,
    )));

    let registry_path = config.resolved_registry_path();
    tracing::info!("Registry file: {}", registry_path.display());
    let registry = DocRegistry::load(
        Arc::new(JsonFileStore::new(registry_path)),
        docs.clone(),
        &config.source_label,
    );

    let backend = Arc::new(HttpClipBackend::new(
        &config.backend_url,
        config.openai_key.clone(),
        timeout,
    ));

    ClipOrchestrator::new(
        docs,
        registry,
        backend,
        events,
        OrchestratorSettings::from_config(config),
    )
}

/// Entry point for the host binary
pub async fn run() -> std::io::Result<()> {
    // Load environment variables from .env file
    let _ = dotenvy::dotenv();
    host::init_tracing();

    let config = AppConfig::from_env();
    let credentials = config::credentials_from_env();
    tracing::info!(
        "clipnote starting: backend={}, docs={}",
        config.backend_url,
        config.docs_api_url
    );

    let events = Arc::new(BroadcastEvents::new(host::EVENT_CAPACITY));
    let orchestrator = Arc::new(build_orchestrator(&config, credentials, events.clone()));

    host::serve(orchestrator, events).await
}
