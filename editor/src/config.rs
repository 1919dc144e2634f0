use crate::error::{EditorError, Result};
use crate::models::{ApiCredentials, EditRequest, Operation, VideoSource};
use crate::utils::{read_json_file, read_trimmed_text};
use clap::Parser;
use env_logger::Builder;
use lazy_static::lazy_static;
use log::{info, LevelFilter};
use std::env;
use std::path::{Path, PathBuf};

/// Shortest find / replace-with text accepted. Anything shorter risks rewriting
/// unrelated parts of every description in the batch.
pub const MIN_REPLACE_TEXT_LEN: usize = 4;

pub const YOUTUBE_READ_WRITE_SCOPE: &str = "https://www.googleapis.com/auth/youtube";

/// `maxResults` for channel search. 50 is the largest page the search endpoint serves.
pub const SEARCH_PAGE_SIZE: u32 = 50;

lazy_static! {
    pub static ref YOUTUBE_API_BASE_URL: String = env::var("YOUTUBE_API_BASE_URL")
        .unwrap_or_else(|_| "https://www.googleapis.com/youtube/v3".to_string());
}

/// Update the description on several YouTube videos.
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// File containing a JSON array of the video IDs to operate on
    #[arg(long, alias = "video_ids", value_name = "PATH")]
    pub video_ids: Option<PathBuf>,

    /// Operate on every video of the channel named in the API credentials file
    #[arg(long)]
    pub all: bool,

    /// File containing the text to find in each description
    #[arg(long, value_name = "PATH")]
    pub find: Option<PathBuf>,

    /// File containing the text that replaces the find text
    #[arg(long, alias = "replace_with", value_name = "PATH")]
    pub replace_with: Option<PathBuf>,

    /// File containing the text to append to the end of each description
    #[arg(long, value_name = "PATH")]
    pub append: Option<PathBuf>,

    /// Tag added to each video in append mode
    #[arg(long, alias = "append_tag", value_name = "TAG")]
    pub append_tag: Option<String>,

    /// JSON file with API_KEY and CHANNEL_ID, used with --all
    #[arg(
        long,
        env = "API_CREDENTIALS_FILE",
        default_value = "api_credentials.json",
        value_name = "PATH"
    )]
    pub api_credentials: PathBuf,

    /// OAuth client secret downloaded from the Google Cloud Console
    #[arg(
        long,
        env = "CLIENT_SECRETS_FILE",
        default_value = "client_secrets_v2.json",
        value_name = "PATH"
    )]
    pub client_secrets: PathBuf,

    /// Where OAuth tokens are cached between runs [default: <program>-oauth2.json]
    #[arg(long, env = "TOKEN_CACHE_FILE", value_name = "PATH")]
    pub token_cache: Option<PathBuf>,

    /// Use this OAuth access token instead of running the installed-app flow
    #[arg(long, env = "YOUTUBE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,
}

impl Args {
    pub fn token_cache_path(&self) -> PathBuf {
        self.token_cache
            .clone()
            .unwrap_or_else(default_token_cache_path)
    }
}

/// Token cache keyed by the path the tool was invoked with.
pub fn default_token_cache_path() -> PathBuf {
    let program = env::args().next().unwrap_or_else(|| "update-description".to_string());
    PathBuf::from(format!("{program}-oauth2.json"))
}

pub fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

impl EditRequest {
    /// Validates the flag combination and loads every input file. No network access.
    pub fn from_args(args: &Args) -> Result<Self> {
        let source = resolve_source(args)?;
        let operation = resolve_operation(args)?;
        info!(
            "Prepared {} run against {}",
            match &operation {
                Operation::Replace { .. } => "find-and-replace",
                Operation::Append { .. } => "append",
            },
            match &source {
                VideoSource::Explicit(ids) => format!("{} listed videos", ids.len()),
                VideoSource::Channel { channel_id, .. } => format!("channel {channel_id}"),
            }
        );
        Ok(EditRequest { source, operation })
    }
}

fn resolve_source(args: &Args) -> Result<VideoSource> {
    match (&args.video_ids, args.all) {
        (Some(path), false) => {
            let ids: Vec<String> = read_json_file(path)?;
            Ok(VideoSource::Explicit(ids))
        }
        (None, true) => {
            let creds: ApiCredentials = read_json_file(&args.api_credentials)?;
            Ok(VideoSource::Channel {
                api_key: creds.api_key,
                channel_id: creds.channel_id,
            })
        }
        _ => Err(EditorError::config(
            "must supply either 'video_ids' option or provide '--all' flag",
        )),
    }
}

fn resolve_operation(args: &Args) -> Result<Operation> {
    match (&args.find, &args.replace_with, &args.append) {
        (Some(find), Some(replace_with), None) if args.append_tag.is_none() => {
            let find = load_replace_text(find, "find")?;
            let replace_with = load_replace_text(replace_with, "replace_with")?;
            Ok(Operation::Replace { find, replace_with })
        }
        (None, None, Some(append)) => Ok(Operation::Append {
            text: read_trimmed_text(append)?,
            tag: args
                .append_tag
                .as_ref()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        }),
        _ => Err(EditorError::config(
            "invalid flag combination. Please use '--help' flag for more information",
        )),
    }
}

fn load_replace_text(path: &Path, label: &str) -> Result<String> {
    let text = read_trimmed_text(path)?;
    if text.chars().count() < MIN_REPLACE_TEXT_LEN {
        return Err(EditorError::validation(format!(
            "{label} string too short. A short {label} string could result in unintended consequences!"
        )));
    }
    Ok(text)
}
