// src/registry/mod.rs
// One destination document per (source id, cleaned title)

mod store;

pub use store::{JsonFileStore, RegistryStore};

use crate::docs::DocsClient;
use crate::error::ClipError;
use crate::notes;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex as TokioMutex;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocKey(String);

impl DocKey {
    pub fn new(source_id: &str, clean_title: &str) -> Self {
        Self(format!("{}_{}", source_id, clean_title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a registry lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub doc_id: String,
    /// True when the document was created by this call
    pub created: bool,
}

pub struct DocRegistry {
    mapping: TokioMutex<HashMap<String, String>>,
    store: Arc<dyn RegistryStore>,
    docs: DocsClient,
    source_label: String,
}

impl DocRegistry {
    /// Load the persisted mapping once. An unreadable store starts empty.
    pub fn load(store: Arc<dyn RegistryStore>, docs: DocsClient, source_label: &str) -> Self {
        let mapping = match store.load() {
            Ok(mapping) => {
                tracing::info!("Registry: loaded {} document mappings", mapping.len());
                mapping
            }
            Err(e) => {
                tracing::warn!("Registry: {}; starting empty", e);
                HashMap::new()
            }
        };

        Self {
            mapping: TokioMutex::new(mapping),
            store,
            docs,
            source_label: source_label.to_string(),
        }
    }

    /// Existing id for `key`, or a new document titled `"<title> - <label>"`.
    ///
    /// The lock is held across creation so two concurrent misses on the same
    /// key create one document.
    pub async fn get_or_create(&self, key: &DocKey, clean_title: &str) -> Result<Resolved, ClipError> {
        let mut mapping = self.mapping.lock().await;

        if let Some(doc_id) = mapping.get(key.as_str()) {
            tracing::debug!("Registry: hit {} -> {}", key, doc_id);
            return Ok(Resolved {
                doc_id: doc_id.clone(),
                created: false,
            });
        }

        let title = notes::document_title(clean_title, &self.source_label);
        let doc_id = self.docs.create_document(&title).await?;

        if let Err(e) = self.docs.insert_header(&doc_id).await {
            tracing::warn!("Registry: header styling failed for {}: {}", doc_id, e);
        }

        mapping.insert(key.as_str().to_string(), doc_id.clone());
        if let Err(e) = self.store.save(&mapping) {
            tracing::warn!("Registry: persist failed, keeping in-memory mapping: {}", e);
        }

        Ok(Resolved {
            doc_id,
            created: true,
        })
    }

    pub async fn len(&self) -> usize {
        self.mapping.lock().await.len()
    }
}
