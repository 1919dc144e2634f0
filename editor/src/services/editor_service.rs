use crate::error::EditorError;
use crate::models::{BatchReport, EditOutcome, EditRequest, Operation, Video};
use crate::services::video_service::VideoApi;
use crate::utils::{
    legacy_format_cutoff, parse_iso8601_datetime, parse_iso8601_duration_to_seconds,
};
use log::{error, info, warn};

/// Videos at or under this length are treated as Shorts.
pub const SHORT_FORM_MAX_SECONDS: u64 = 180;

pub fn is_short_form(video: &Video) -> bool {
    video
        .content_details
        .as_ref()
        .and_then(|details| details.duration.as_deref())
        .and_then(parse_iso8601_duration_to_seconds)
        .is_some_and(|seconds| seconds <= SHORT_FORM_MAX_SECONDS)
}

/// Videos published after the cutoff share the description layout find-and-replace expects.
pub fn uses_modern_format(video: &Video) -> bool {
    let Some(published_at) = video
        .snippet
        .as_ref()
        .and_then(|snippet| snippet.published_at.as_deref())
    else {
        return false;
    };

    match parse_iso8601_datetime(published_at) {
        Some(published) => published > legacy_format_cutoff(),
        None => {
            warn!("Could not parse publishedAt: {published_at}");
            true
        }
    }
}

/// Literal, global replacement. `None` when `find` does not occur in `description`.
pub fn replace_text(description: &str, find: &str, replace_with: &str) -> Option<String> {
    if find.is_empty() || !description.contains(find) {
        return None;
    }
    Some(description.replace(find, replace_with))
}

pub fn append_text(description: &str, text: &str) -> String {
    let mut updated = String::with_capacity(description.len() + text.len());
    updated.push_str(description);
    updated.push_str(text);
    updated
}

/// Applies `operation` to the fetched video in place. `Err` carries the outcome to
/// report when the video must not be written back.
pub fn apply_operation(video: &mut Video, operation: &Operation) -> Result<(), EditOutcome> {
    if let Operation::Replace { .. } = operation {
        if is_short_form(video) {
            return Err(EditOutcome::SkippedShort);
        }
        if !uses_modern_format(video) {
            return Err(EditOutcome::SkippedLegacyFormat);
        }
    }

    let snippet = video.snippet.get_or_insert_with(Default::default);
    let description = snippet.description.as_deref().unwrap_or("");

    match operation {
        Operation::Replace { find, replace_with } => {
            let updated = replace_text(description, find, replace_with)
                .ok_or(EditOutcome::FindStringAbsent)?;
            snippet.description = Some(updated);
        }
        Operation::Append { text, tag } => {
            let updated = append_text(description, text);
            snippet.description = Some(updated);
            if let Some(tag) = tag {
                let tags = snippet.tags.get_or_insert_with(Vec::new);
                if !tags.contains(tag) {
                    tags.push(tag.clone());
                }
            }
        }
    }
    Ok(())
}

/// Runs the fetch → filter → transform → update cycle for one video.
pub async fn process_video(
    api: &dyn VideoApi,
    request: &EditRequest,
    video_id: &str,
) -> EditOutcome {
    let mut video = match api.fetch_video(video_id).await {
        Ok(Some(video)) => video,
        Ok(None) => return EditOutcome::NotFound,
        Err(e) => return transport_outcome(video_id, e),
    };

    if video.id.is_empty() {
        video.id = video_id.to_string();
    }

    if let Err(outcome) = apply_operation(&mut video, &request.operation) {
        return outcome;
    }

    match api.update_snippet(&video).await {
        Ok(_) => EditOutcome::Updated,
        Err(e) => transport_outcome(video_id, e),
    }
}

fn transport_outcome(video_id: &str, e: EditorError) -> EditOutcome {
    match e {
        EditorError::Transport { status, body } => {
            error!("Video {video_id}: HTTP {status}: {body}");
            EditOutcome::TransportError(format!("An HTTP error {status} occurred:\n{body}"))
        }
        other => {
            if other.is_transport() {
                error!("Video {video_id}: request failed: {other}");
            } else {
                error!("Video {video_id}: request could not be sent: {other}");
            }
            EditOutcome::TransportError(format!("Request for video '{video_id}' failed: {other}"))
        }
    }
}

/// Processes every ID in order, printing one outcome line per video.
/// Per-video failures are recorded and never stop the batch.
pub async fn run_batch(
    api: &dyn VideoApi,
    request: &EditRequest,
    video_ids: &[String],
) -> BatchReport {
    info!("Starting description update on {} videos...", video_ids.len());

    let mut report = BatchReport::default();
    for video_id in video_ids {
        info!("Processing video ID: {video_id}");
        let outcome = process_video(api, request, video_id).await;
        println!("{}", outcome.report_line(video_id));
        match &outcome {
            EditOutcome::Updated => info!("Video {video_id}: {outcome}"),
            EditOutcome::TransportError(_) => {}
            _ => warn!("Video {video_id}: {outcome}"),
        }
        report.push(video_id, outcome);
    }

    info!(
        "Description update completed: {} updated, {} skipped, {} failed.",
        report.updated(),
        report.skipped(),
        report.failed()
    );
    report
}
