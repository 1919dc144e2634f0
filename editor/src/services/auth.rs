use crate::config::YOUTUBE_READ_WRITE_SCOPE;
use crate::error::{EditorError, Result};
use async_trait::async_trait;
use log::info;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

type TokenFuture = Pin<Box<dyn Future<Output = Result<String>> + Send>>;

/// Source of OAuth bearer tokens for the read/write YouTube scope.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// A fixed token, e.g. one minted out of band.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Installed-app OAuth flow. Tokens are persisted to disk and refreshed by the authenticator.
pub struct InstalledFlowTokens {
    fetch: Box<dyn Fn() -> TokenFuture + Send + Sync>,
}

impl InstalledFlowTokens {
    pub async fn connect(client_secrets: &Path, token_cache: &Path) -> Result<Self> {
        let secret = yup_oauth2::read_application_secret(client_secrets)
            .await
            .map_err(|e| {
                EditorError::Auth(format!(
                    "could not read OAuth client secrets at {}: {e}. \
                     Download them from https://console.cloud.google.com/apis/credentials",
                    client_secrets.display()
                ))
            })?;

        // Opens the browser and waits on a local redirect the first time only.
        let auth = yup_oauth2::InstalledFlowAuthenticator::builder(
            secret,
            yup_oauth2::InstalledFlowReturnMethod::HTTPRedirect,
        )
        .persist_tokens_to_disk(token_cache)
        .build()
        .await
        .map_err(|e| EditorError::Auth(e.to_string()))?;

        info!("OAuth tokens cached at {}", token_cache.display());

        let auth = Arc::new(auth);
        let fetch = move || -> TokenFuture {
            let auth = auth.clone();
            Box::pin(async move {
                let token = auth
                    .token(&[YOUTUBE_READ_WRITE_SCOPE])
                    .await
                    .map_err(|e| EditorError::Auth(e.to_string()))?;
                token
                    .token()
                    .map(str::to_string)
                    .ok_or_else(|| EditorError::Auth("no access token was issued".to_string()))
            })
        };

        Ok(Self {
            fetch: Box::new(fetch),
        })
    }
}

#[async_trait]
impl TokenProvider for InstalledFlowTokens {
    async fn access_token(&self) -> Result<String> {
        (self.fetch)().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_token_is_returned_as_is() {
        let provider: Arc<dyn TokenProvider> = Arc::new(StaticToken("ya29.token".into()));
        assert_eq!(provider.access_token().await.unwrap(), "ya29.token");
    }

    #[tokio::test]
    async fn missing_client_secrets_is_an_auth_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = InstalledFlowTokens::connect(
            &dir.path().join("client_secrets_v2.json"),
            &dir.path().join("tokens.json"),
        )
        .await;

        match result {
            Err(EditorError::Auth(message)) => assert!(message.contains("client_secrets_v2.json")),
            Err(other) => panic!("expected auth error, got {other}"),
            Ok(_) => panic!("expected auth error"),
        }
    }
}
