use crate::error::{EditorError, Result};
use chrono::{DateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::path::Path;

lazy_static! {
    static ref DURATION_PATTERN: Regex =
        Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").expect("duration pattern is valid");
}

/// Parse ISO8601 date string to Unix timestamp for sorting
pub fn parse_iso8601_to_timestamp(date_str: &str) -> Option<i64> {
    parse_iso8601_datetime(date_str).map(|dt| dt.timestamp())
}

pub fn parse_iso8601_datetime(date_str: &str) -> Option<DateTime<Utc>> {
    if date_str.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc3339(date_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse ISO8601 duration string (PT1H2M3S) to total seconds.
///
/// Only the hour/minute/second form YouTube uses for regular uploads is accepted;
/// anything else (including a bare `PT`) yields `None`.
pub fn parse_iso8601_duration_to_seconds(duration_str: &str) -> Option<u64> {
    let captures = DURATION_PATTERN.captures(duration_str)?;
    if captures.iter().skip(1).all(|group| group.is_none()) {
        return None;
    }

    let component = |index: usize| -> Option<u64> {
        match captures.get(index) {
            Some(m) => m.as_str().parse::<u64>().ok(),
            None => Some(0),
        }
    };

    let hours = component(1)?;
    let minutes = component(2)?;
    let seconds = component(3)?;

    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// Midnight UTC, January 7th 2018.
pub fn legacy_format_cutoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2018, 1, 7, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Reads a text input file and strips trailing whitespace.
pub fn read_trimmed_text(path: &Path) -> Result<String> {
    let contents = std::fs::read_to_string(path).map_err(|e| EditorError::io(path, e))?;
    Ok(contents.trim_end().to_string())
}

pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path).map_err(|e| EditorError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| EditorError::json(path, e))
}
