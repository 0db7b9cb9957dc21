// src/docs/google.rs
// Google Docs REST adapter

use super::types::{BatchUpdateRequest, CreateDocumentRequest, Document, Request};
use super::DocumentApi;
use crate::auth::TokenProvider;
use crate::error::ClipError;
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::sync::Arc;
use std::time::Duration;

pub struct GoogleDocsApi {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl GoogleDocsApi {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into(),
            tokens,
        }
    }

    fn documents_url(&self) -> String {
        format!("{}/v1/documents", self.base_url)
    }

    async fn checked(response: Response, context: &str) -> Result<Response, ClipError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!("Docs {} failed: {} {}", context, status, body);
        Err(ClipError::from_status(status, &body))
    }
}

#[async_trait]
impl DocumentApi for GoogleDocsApi {
    async fn create_document(&self, title: &str) -> Result<String, ClipError> {
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .post(self.documents_url())
            .bearer_auth(&token)
            .json(&CreateDocumentRequest {
                title: title.to_string(),
            })
            .send()
            .await
            .map_err(|e| ClipError::from_transport("Docs create", e))?;

        let doc: Document = Self::checked(response, "create")
            .await?
            .json()
            .await
            .map_err(|e| ClipError::Remote(format!("Docs create parse: {}", e)))?;

        if doc.document_id.is_empty() {
            return Err(ClipError::Remote(
                "Document creation response lacks documentId".to_string(),
            ));
        }

        Ok(doc.document_id)
    }

    async fn get_document(&self, doc_id: &str) -> Result<Document, ClipError> {
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .get(format!("{}/{}", self.documents_url(), doc_id))
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| ClipError::from_transport("Docs get", e))?;

        Self::checked(response, "get")
            .await?
            .json()
            .await
            .map_err(|e| ClipError::Remote(format!("Docs get parse: {}", e)))
    }

    async fn batch_update(&self, doc_id: &str, requests: Vec<Request>) -> Result<(), ClipError> {
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .post(format!("{}/{}:batchUpdate", self.documents_url(), doc_id))
            .bearer_auth(&token)
            .json(&BatchUpdateRequest { requests })
            .send()
            .await
            .map_err(|e| ClipError::from_transport("Docs batchUpdate", e))?;

        Self::checked(response, "batchUpdate").await?;
        Ok(())
    }

    async fn authorize(&self) -> Result<(), ClipError> {
        self.tokens.access_token().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MissingTokenProvider, StaticTokenProvider};

    fn api(tokens: Arc<dyn TokenProvider>) -> GoogleDocsApi {
        GoogleDocsApi::new("http://127.0.0.1:9", tokens, Duration::from_millis(100))
    }

    #[tokio::test]
    async fn test_authorize_checks_tokens_without_calling_docs() {
        assert!(api(Arc::new(StaticTokenProvider::new("ya29.token")))
            .authorize()
            .await
            .is_ok());
        assert!(matches!(
            api(Arc::new(MissingTokenProvider)).authorize().await,
            Err(ClipError::Auth(_))
        ));
    }
}
