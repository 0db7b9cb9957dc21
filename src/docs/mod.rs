// src/docs/mod.rs
// Document mutation client over a pluggable remote document API

mod google;
pub mod text;
pub mod types;

pub use google::GoogleDocsApi;
pub use text::{utf16_len, FlatText};
pub use types::{Document, DocumentOffset, Request, StyleRange, TextStyleKind};

use crate::error::ClipError;
use crate::notes::{self, Marker};
use async_trait::async_trait;
use std::sync::Arc;

/// Raw document API: create, read, ordered batch of mutations
#[async_trait]
pub trait DocumentApi: Send + Sync {
    async fn create_document(&self, title: &str) -> Result<String, ClipError>;
    async fn get_document(&self, doc_id: &str) -> Result<Document, ClipError>;
    async fn batch_update(&self, doc_id: &str, requests: Vec<Request>) -> Result<(), ClipError>;

    /// Fail fast when no usable credentials are available
    async fn authorize(&self) -> Result<(), ClipError> {
        Ok(())
    }
}

/// Read/append/style operations used by the clip pipeline.
///
/// Mutations are never retried here. Every offset is recomputed from a fresh
/// read because each insert shifts everything after it.
#[derive(Clone)]
pub struct DocsClient {
    api: Arc<dyn DocumentApi>,
}

impl DocsClient {
    pub fn new(api: Arc<dyn DocumentApi>) -> Self {
        Self { api }
    }

    pub async fn authorize(&self) -> Result<(), ClipError> {
        self.api.authorize().await
    }

    pub async fn create_document(&self, title: &str) -> Result<String, ClipError> {
        let doc_id = self.api.create_document(title).await?;
        tracing::info!("Docs: created '{}' ({})", title, doc_id);
        Ok(doc_id)
    }

    /// Centered bold title at the very start of a fresh document
    pub async fn insert_header(&self, doc_id: &str) -> Result<(), ClipError> {
        let block = notes::header_block();
        let header = StyleRange::new(DocumentOffset(1), notes::HEADER_TEXT.utf16_len());
        let paragraph = StyleRange::new(DocumentOffset(1), notes::HEADER_TEXT.utf16_len() + 1);

        let requests = vec![
            Request::insert_at(1, block),
            Request::center_paragraph(paragraph),
            Request::header_font(header, notes::HEADER_FONT, notes::HEADER_FONT_SIZE_PT),
        ];

        self.api.batch_update(doc_id, requests).await
    }

    /// End-of-segment insert. Calling twice appends twice.
    pub async fn append_text(&self, doc_id: &str, text: &str) -> Result<(), ClipError> {
        self.api
            .batch_update(doc_id, vec![Request::append(text)])
            .await
    }

    /// Start of the last occurrence of `needle` in the current document
    pub async fn find_last_offset(
        &self,
        doc_id: &str,
        needle: &str,
    ) -> Result<Option<DocumentOffset>, ClipError> {
        let doc = self.api.get_document(doc_id).await?;
        Ok(FlatText::from_document(&doc).find_last(needle))
    }

    pub async fn apply_style(
        &self,
        doc_id: &str,
        range: StyleRange,
        style: &TextStyleKind,
    ) -> Result<(), ClipError> {
        self.api
            .batch_update(doc_id, vec![Request::style(range, style)])
            .await
    }

    /// Find the last occurrence of `marker` and style exactly its text.
    /// Returns the marker's offset, or `None` when it is absent.
    pub async fn restyle_last(
        &self,
        doc_id: &str,
        marker: Marker,
        style: &TextStyleKind,
    ) -> Result<Option<DocumentOffset>, ClipError> {
        let Some(offset) = self.find_last_offset(doc_id, marker.text()).await? else {
            tracing::warn!("Docs: marker '{}' not found in {}", marker.text(), doc_id);
            return Ok(None);
        };

        self.apply_style(doc_id, StyleRange::new(offset, marker.utf16_len()), style)
            .await?;
        Ok(Some(offset))
    }

    /// Hyperlink every standalone `word` at or after `from`, one mutation each.
    /// Returns how many occurrences were linked.
    pub async fn link_standalone_word(
        &self,
        doc_id: &str,
        word: &str,
        url: &str,
        from: DocumentOffset,
    ) -> Result<usize, ClipError> {
        let doc = self.api.get_document(doc_id).await?;
        let offsets = FlatText::from_document(&doc).standalone_word_offsets(word, from);
        let style = TextStyleKind::Hyperlink {
            url: url.to_string(),
        };

        for offset in &offsets {
            self.apply_style(doc_id, StyleRange::new(*offset, utf16_len(word)), &style)
                .await?;
        }

        tracing::debug!("Docs: linked {} standalone '{}' in {}", offsets.len(), word, doc_id);
        Ok(offsets.len())
    }
}
