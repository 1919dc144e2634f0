use crate::config::{SEARCH_PAGE_SIZE, YOUTUBE_API_BASE_URL};
use crate::error::Result;
use crate::models::{SearchListResponse, VideoSource};
use crate::services::video_service::check_status;
use crate::utils::parse_iso8601_to_timestamp;
use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;
use std::collections::HashSet;

#[async_trait]
pub trait ChannelSearch: Send + Sync {
    async fn search_page(
        &self,
        channel_id: &str,
        page_token: Option<&str>,
    ) -> Result<SearchListResponse>;
}

/// Key-authenticated client for the public search endpoint.
pub struct SearchClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SearchClient {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, YOUTUBE_API_BASE_URL.as_str())
    }

    pub fn with_base_url(
        client: Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl ChannelSearch for SearchClient {
    async fn search_page(
        &self,
        channel_id: &str,
        page_token: Option<&str>,
    ) -> Result<SearchListResponse> {
        // https://developers.google.com/youtube/v3/docs/search/list
        let url = format!("{}/search", self.base_url);
        let page_size = SEARCH_PAGE_SIZE.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("channelId", channel_id),
                ("part", "snippet"),
                ("maxResults", page_size.as_str()),
                ("pageToken", page_token.unwrap_or("")),
            ])
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }
}

/// Returns every video ID of the channel, most recently published first.
pub async fn fetch_channel_video_ids(
    search: &dyn ChannelSearch,
    channel_id: &str,
) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut used_tokens: HashSet<String> = HashSet::new();
    let mut videos: Vec<(String, String)> = Vec::new();
    let mut next_page_token: Option<String> = None;
    let mut pages = 0;

    loop {
        let page = search
            .search_page(channel_id, next_page_token.as_deref())
            .await?;
        pages += 1;

        for item in page.items {
            let (Some(video_id), Some(published_at)) =
                (item.id.video_id, item.snippet.published_at)
            else {
                continue;
            };
            if seen.insert(video_id.clone()) {
                videos.push((video_id, published_at));
            }
        }

        match page.next_page_token {
            Some(token) if !used_tokens.insert(token.clone()) => {
                warn!("Search returned an already used page token, stopping at page {pages}");
                break;
            }
            Some(token) => next_page_token = Some(token),
            None => break,
        }
    }

    // Newest first; unparseable dates sort last.
    videos.sort_by_cached_key(|(_, published_at)| {
        std::cmp::Reverse((parse_iso8601_to_timestamp(published_at), published_at.clone()))
    });

    info!(
        "Found {} videos on channel {channel_id} across {pages} page(s)",
        videos.len()
    );

    Ok(videos.into_iter().map(|(video_id, _)| video_id).collect())
}

/// Produces the batch's target list. Only the channel source touches the network.
pub async fn resolve_video_ids(source: &VideoSource, client: &Client) -> Result<Vec<String>> {
    match source {
        VideoSource::Explicit(ids) => Ok(ids.clone()),
        VideoSource::Channel {
            api_key,
            channel_id,
        } => {
            let search = SearchClient::new(client.clone(), api_key.clone());
            fetch_channel_video_ids(&search, channel_id).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use crate::models::{SearchResult, SearchResultId, SearchResultSnippet};
    use crate::services::test_server::serve_once;
    use std::sync::Mutex;

    struct FakeSearch {
        pages: Vec<SearchListResponse>,
        requested_tokens: Mutex<Vec<Option<String>>>,
    }

    impl FakeSearch {
        fn new(pages: Vec<SearchListResponse>) -> Self {
            Self {
                pages,
                requested_tokens: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChannelSearch for FakeSearch {
        async fn search_page(
            &self,
            channel_id: &str,
            page_token: Option<&str>,
        ) -> Result<SearchListResponse> {
            assert_eq!(channel_id, "UCchannel");
            let mut tokens = self.requested_tokens.lock().unwrap();
            let index = tokens.len();
            tokens.push(page_token.map(str::to_string));
            self.pages.get(index).cloned().ok_or(EditorError::Transport {
                status: 400,
                body: "no such page".into(),
            })
        }
    }

    fn result(video_id: Option<&str>, published_at: Option<&str>) -> SearchResult {
        SearchResult {
            id: SearchResultId {
                video_id: video_id.map(str::to_string),
            },
            snippet: SearchResultSnippet {
                published_at: published_at.map(str::to_string),
            },
        }
    }

    #[tokio::test]
    async fn follows_page_tokens_and_orders_newest_first() {
        // 51 uploads, one per day starting 2020-01-01; returned oldest first.
        let start = chrono::DateTime::parse_from_rfc3339("2020-01-01T12:00:00Z").unwrap();
        let all: Vec<SearchResult> = (0..51)
            .map(|day| {
                let published = (start + chrono::Duration::days(day)).to_rfc3339();
                result(Some(&format!("video{day:02}")), Some(&published))
            })
            .collect();

        let search = FakeSearch::new(vec![
            SearchListResponse {
                next_page_token: Some("page-2".into()),
                items: all[..50].to_vec(),
            },
            SearchListResponse {
                next_page_token: None,
                items: all[50..].to_vec(),
            },
        ]);

        let ids = fetch_channel_video_ids(&search, "UCchannel").await.unwrap();

        assert_eq!(ids.len(), 51);
        assert_eq!(ids.first().map(String::as_str), Some("video50"));
        assert_eq!(ids.last().map(String::as_str), Some("video00"));
        assert_eq!(
            *search.requested_tokens.lock().unwrap(),
            vec![None, Some("page-2".to_string())]
        );
    }

    #[tokio::test]
    async fn drops_duplicates_and_non_video_results() {
        let search = FakeSearch::new(vec![SearchListResponse {
            next_page_token: None,
            items: vec![
                result(Some("older"), Some("2019-03-01T00:00:00Z")),
                result(None, Some("2021-01-01T00:00:00Z")),
                result(Some("newer"), Some("2020-03-01T00:00:00Z")),
                result(Some("older"), Some("2019-03-01T00:00:00Z")),
                result(Some("undated"), None),
            ],
        }]);

        let ids = fetch_channel_video_ids(&search, "UCchannel").await.unwrap();
        assert_eq!(ids, vec!["newer".to_string(), "older".to_string()]);
    }

    #[tokio::test]
    async fn search_failure_is_propagated() {
        let search = FakeSearch::new(Vec::new());
        let err = fetch_channel_video_ids(&search, "UCchannel")
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn stops_when_page_tokens_cycle() {
        let page = |id: &str, token: &str| SearchListResponse {
            next_page_token: Some(token.into()),
            items: vec![result(Some(id), Some("2020-01-01T00:00:00Z"))],
        };
        let search = FakeSearch::new(vec![
            page("first", "A"),
            page("second", "B"),
            page("third", "A"),
            page("fourth", "B"),
        ]);

        let ids = fetch_channel_video_ids(&search, "UCchannel").await.unwrap();

        assert_eq!(ids.len(), 3);
        assert_eq!(
            *search.requested_tokens.lock().unwrap(),
            vec![None, Some("A".to_string()), Some("B".to_string())]
        );
    }

    #[tokio::test]
    async fn search_requests_full_pages() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"items":[{"id":{"videoId":"vid00000001"},"snippet":{"publishedAt":"2020-01-01T00:00:00Z"}}]}"#,
        )
        .await;
        let search = SearchClient::with_base_url(Client::new(), "key-1", format!("{base_url}/"));

        let page = search.search_page("UC123", Some("next-A")).await.unwrap();
        assert_eq!(page.items[0].id.video_id.as_deref(), Some("vid00000001"));

        let head = server.await.unwrap();
        assert!(head.starts_with("GET /search?"));
        assert!(head.contains("maxResults=50"));
        assert!(head.contains("channelId=UC123"));
        assert!(head.contains("pageToken=next-A"));
    }

    #[tokio::test]
    async fn explicit_source_needs_no_network() {
        let source = VideoSource::Explicit(vec!["a".into(), "b".into()]);
        let ids = resolve_video_ids(&source, &Client::new()).await.unwrap();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }
}
