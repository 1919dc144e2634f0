use crate::config::YOUTUBE_API_BASE_URL;
use crate::error::{EditorError, Result};
use crate::models::{Video, VideoListResponse, VideoUpdateRequest};
use crate::services::auth::TokenProvider;
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response};
use std::sync::Arc;

/// The two video RPCs the editor needs.
#[async_trait]
pub trait VideoApi: Send + Sync {
    /// `Ok(None)` when the API returns no item for the ID.
    async fn fetch_video(&self, video_id: &str) -> Result<Option<Video>>;

    /// Writes back the snippet of `video` and returns the stored resource.
    async fn update_snippet(&self, video: &Video) -> Result<Video>;
}

pub struct YouTubeClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl YouTubeClient {
    pub fn new(client: Client, tokens: Arc<dyn TokenProvider>) -> Self {
        Self::with_base_url(client, tokens, YOUTUBE_API_BASE_URL.as_str())
    }

    pub fn with_base_url(
        client: Client,
        tokens: Arc<dyn TokenProvider>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }
}

#[async_trait]
impl VideoApi for YouTubeClient {
    async fn fetch_video(&self, video_id: &str) -> Result<Option<Video>> {
        // Documentation: https://developers.google.com/youtube/v3/docs/videos/list
        let url = format!("{}/videos", self.base_url);
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .get(&url)
            .query(&[("id", video_id), ("part", "snippet,contentDetails")])
            .bearer_auth(token)
            .send()
            .await?;

        let list: VideoListResponse = check_status(response).await?.json().await?;
        debug!("videos.list returned {} item(s) for {video_id}", list.items.len());

        Ok(list.items.into_iter().next())
    }

    async fn update_snippet(&self, video: &Video) -> Result<Video> {
        // Documentation: https://developers.google.com/youtube/v3/docs/videos/update
        let url = format!("{}/videos", self.base_url);
        let snippet = video.snippet.as_ref().ok_or_else(|| {
            EditorError::validation(format!("video '{}' has no snippet to update", video.id))
        })?;
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .put(&url)
            .query(&[("part", "snippet")])
            .bearer_auth(token)
            .json(&VideoUpdateRequest {
                id: &video.id,
                snippet,
            })
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }
}

/// Turns a non-2xx response into `EditorError::Transport` carrying the status and body.
pub async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(EditorError::Transport {
        status: status.as_u16(),
        body,
    })
}
