use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Credentials used to enumerate a channel's uploads through the public search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCredentials {
    #[serde(rename = "API_KEY")]
    pub api_key: String,
    #[serde(rename = "CHANNEL_ID")]
    pub channel_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<Video>,
}

/// A video resource as returned by `videos.list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<VideoSnippet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_details: Option<ContentDetails>,
}

/// The editable part of a video. Fields this tool does not touch are kept in `other`
/// so they are sent back unchanged on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentDetails {
    #[serde(default)]
    pub duration: Option<String>,
}

/// Body of a `videos.update` call with `part=snippet`.
#[derive(Debug, Serialize)]
pub struct VideoUpdateRequest<'a> {
    pub id: &'a str,
    pub snippet: &'a VideoSnippet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchListResponse {
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub items: Vec<SearchResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub id: SearchResultId,
    #[serde(default)]
    pub snippet: SearchResultSnippet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultSnippet {
    #[serde(default)]
    pub published_at: Option<String>,
}

/// Where the batch gets its target video IDs from.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoSource {
    Explicit(Vec<String>),
    Channel { api_key: String, channel_id: String },
}

/// The single text operation applied to every video in a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Replace { find: String, replace_with: String },
    Append { text: String, tag: Option<String> },
}

/// One batch run. Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct EditRequest {
    pub source: VideoSource,
    pub operation: Operation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Updated,
    NotFound,
    FindStringAbsent,
    SkippedShort,
    SkippedLegacyFormat,
    TransportError(String),
}

impl EditOutcome {
    /// The line printed on stdout for this video.
    pub fn report_line(&self, video_id: &str) -> String {
        match self {
            EditOutcome::Updated => {
                format!("Description updated on video with video ID: '{video_id}'.")
            }
            EditOutcome::NotFound => format!("Video '{video_id}' was not found."),
            EditOutcome::FindStringAbsent => {
                format!("replace string not found in description of video with ID: '{video_id}'")
            }
            EditOutcome::SkippedShort => {
                format!("Video '{video_id}' appears to be a YouTube Short, skipping...")
            }
            EditOutcome::SkippedLegacyFormat => format!(
                "Video '{video_id}' is too old and does not use the modern description format, skipping..."
            ),
            EditOutcome::TransportError(detail) => detail.clone(),
        }
    }
}

impl fmt::Display for EditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditOutcome::Updated => "updated",
            EditOutcome::NotFound => "not found",
            EditOutcome::FindStringAbsent => "find string absent",
            EditOutcome::SkippedShort => "skipped (short)",
            EditOutcome::SkippedLegacyFormat => "skipped (legacy format)",
            EditOutcome::TransportError(_) => "transport error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub entries: Vec<(String, EditOutcome)>,
}

impl BatchReport {
    pub fn push(&mut self, video_id: &str, outcome: EditOutcome) {
        self.entries.push((video_id.to_string(), outcome));
    }

    pub fn count(&self, predicate: impl Fn(&EditOutcome) -> bool) -> usize {
        self.entries.iter().filter(|(_, o)| predicate(o)).count()
    }

    pub fn updated(&self) -> usize {
        self.count(|o| *o == EditOutcome::Updated)
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, EditOutcome::TransportError(_)))
    }

    pub fn skipped(&self) -> usize {
        self.entries.len() - self.updated() - self.failed()
    }
}
