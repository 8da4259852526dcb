//! Past predictions and per-crop statistics.

use time::{OffsetDateTime, PrimitiveDateTime};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use crate::api::endpoints::{HistoryQuery, ListHistory};
use crate::api::types::HistoryEntry;
use crate::api::{ApiClient, ApiError};

pub const HISTORY_FAILED_MESSAGE: &str = "Failed to load history";
/// Number of crops shown in the statistics strip.
pub const TOP_CROPS: usize = 8;

pub fn fetch_history(api: &ApiClient, limit: usize) -> Result<Vec<HistoryEntry>, ApiError> {
    let page = api.call::<ListHistory>(&HistoryQuery { limit })?;
    tracing::debug!(entries = page.history.len(), "history loaded");
    Ok(page.history)
}

/// How often each crop was recommended.
///
/// Names are lower-cased; ordered by descending count, ties in first-seen order.
pub fn crop_stats<'a>(predictions: impl IntoIterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut stats: Vec<(String, usize)> = Vec::new();
    for prediction in predictions {
        let crop = prediction.to_lowercase();
        match stats.iter_mut().find(|(name, _)| *name == crop) {
            Some((_, count)) => *count += 1,
            None => stats.push((crop, 1)),
        }
    }
    stats.sort_by(|a, b| b.1.cmp(&a.1));
    stats
}

/// Per-crop counts over fetched rows; rows without a crop are skipped.
pub fn entry_stats(entries: &[HistoryEntry]) -> Vec<(String, usize)> {
    crop_stats(
        entries
            .iter()
            .map(|entry| entry.prediction.trim())
            .filter(|crop| !crop.is_empty()),
    )
}

pub const HISTORY_COLUMNS: [&str; 10] = [
    "When",
    "Crop",
    "Confidence",
    "N",
    "P",
    "K",
    "Temp (°C)",
    "Humidity (%)",
    "pH",
    "Rainfall (mm)",
];

/// Display cells for one row, in [`HISTORY_COLUMNS`] order. Missing values show as `-`.
pub fn history_cells(entry: &HistoryEntry) -> [String; 10] {
    let input = &entry.input;
    let crop = match entry.prediction.trim() {
        "" => "-".to_string(),
        crop => crop.to_string(),
    };
    let when = match entry.timestamp.trim() {
        "" => "-".to_string(),
        raw => format_timestamp(raw),
    };
    [
        when,
        crop,
        entry
            .confidence
            .map(|confidence| format!("{confidence:.1}%"))
            .unwrap_or_else(|| "-".to_string()),
        cell(input.n),
        cell(input.p),
        cell(input.k),
        cell(input.temperature),
        cell(input.humidity),
        cell(input.ph),
        cell(input.rainfall),
    ]
}

fn cell(value: Option<f64>) -> String {
    value.map(|value| value.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Render a timestamp for display.
///
/// RFC 3339 values are shifted to local time; offset-less ISO values are shown
/// as written; anything else is returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    let display = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let trimmed = raw.trim();
    if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        let local = time::UtcOffset::current_local_offset()
            .map(|offset| parsed.to_offset(offset))
            .unwrap_or(parsed);
        return local.format(display).unwrap_or_else(|_| raw.to_string());
    }
    let naive = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
    );
    match PrimitiveDateTime::parse(trimmed, naive) {
        Ok(parsed) => parsed.format(display).unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}
