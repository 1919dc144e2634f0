use anyhow::{Context, Result};
use clap::Parser;
use description_editor::config::{init_logger, load_environment, Args};
use description_editor::services::auth::{InstalledFlowTokens, StaticToken, TokenProvider};
use description_editor::services::channel_service::resolve_video_ids;
use description_editor::services::editor_service::run_batch;
use description_editor::services::video_service::YouTubeClient;
use description_editor::EditRequest;
use log::info;
use reqwest::Client;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    load_environment();
    init_logger();

    let args = Args::parse();

    // Every input file is read and validated before the first request goes out.
    let request = EditRequest::from_args(&args)?;

    let http = Client::new();
    let video_ids = resolve_video_ids(&request.source, &http)
        .await
        .context("Failed to list the channel's videos")?;

    if video_ids.is_empty() {
        info!("No videos to update.");
        return Ok(());
    }

    let tokens: Arc<dyn TokenProvider> = match &args.access_token {
        Some(token) => Arc::new(StaticToken(token.clone())),
        None => {
            let token_cache = args.token_cache_path();
            let tokens = InstalledFlowTokens::connect(&args.client_secrets, &token_cache)
                .await
                .context("Failed to authenticate with YouTube")?;
            Arc::new(tokens)
        }
    };
    let youtube = YouTubeClient::new(http, tokens);

    run_batch(&youtube, &request, &video_ids).await;

    Ok(())
}
