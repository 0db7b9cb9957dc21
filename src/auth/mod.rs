// src/auth/mod.rs
// Bearer token acquisition for the document API

mod refresh;

pub use refresh::RefreshTokenProvider;

use crate::config::Credentials;
use crate::error::ClipError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Source of bearer tokens for the document API
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Acquire a usable access token; may hit the identity provider
    async fn access_token(&self) -> Result<String, ClipError>;
}

/// Fixed token, e.g. from `GOOGLE_ACCESS_TOKEN`
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, ClipError> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(ClipError::Auth("access token is empty".to_string()));
        }
        Ok(token.to_string())
    }
}

/// Used when nothing is configured; every acquisition fails
pub struct MissingTokenProvider;

#[async_trait]
impl TokenProvider for MissingTokenProvider {
    async fn access_token(&self) -> Result<String, ClipError> {
        Err(ClipError::Auth(
            "no Google credentials configured. Set GOOGLE_ACCESS_TOKEN or a refresh token."
                .to_string(),
        ))
    }
}

pub fn provider_from_credentials(
    credentials: Credentials,
    timeout: Duration,
) -> Arc<dyn TokenProvider> {
    match credentials {
        Credentials::AccessToken(token) => {
            tracing::info!("Auth: using static access token");
            Arc::new(StaticTokenProvider::new(token))
        }
        Credentials::RefreshToken {
            client_id,
            client_secret,
            refresh_token,
        } => {
            tracing::info!("Auth: using refresh token flow");
            Arc::new(RefreshTokenProvider::new(
                client_id,
                client_secret,
                refresh_token,
                timeout,
            ))
        }
        Credentials::Missing => {
            tracing::warn!("Auth: no Google credentials configured");
            Arc::new(MissingTokenProvider)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_token() {
        let provider = StaticTokenProvider::new(" ya29.token ");
        assert_eq!(provider.access_token().await.unwrap(), "ya29.token");
    }

    #[tokio::test]
    async fn test_blank_and_missing_tokens_are_auth_errors() {
        let blank = StaticTokenProvider::new("  ");
        assert!(matches!(blank.access_token().await, Err(ClipError::Auth(_))));
        assert!(matches!(
            MissingTokenProvider.access_token().await,
            Err(ClipError::Auth(_))
        ));
    }
}
