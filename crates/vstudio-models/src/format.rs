//! Date and duration formatting shared by the listing, editor and publish views.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{ModelError, ModelResult};

const NOT_AVAILABLE: &str = "N/A";
const INVALID_DATE: &str = "Invalid Date";

/// Narration pace used for script duration estimates.
pub const WORDS_PER_MINUTE: f64 = 150.0;

/// Characters per spoken second used by the editor footer.
pub const CHARS_PER_SECOND: f64 = 2.5;

/// Parse a server or form timestamp into UTC.
///
/// Accepts RFC 3339, naive ISO date-times (with or without seconds and
/// fractions) and bare dates. Naive values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> ModelResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(ModelError::InvalidTimestamp(raw.to_string()))
}

fn format_with(raw: Option<&str>, pattern: &str) -> String {
    match raw.filter(|s| !s.is_empty()) {
        None => NOT_AVAILABLE.to_string(),
        Some(raw) => parse_timestamp(raw)
            .map(|dt| dt.format(pattern).to_string())
            .unwrap_or_else(|_| INVALID_DATE.to_string()),
    }
}

/// `dd/mm/yyyy`, or `N/A` when absent.
pub fn format_date(raw: Option<&str>) -> String {
    format_with(raw, "%d/%m/%Y")
}

/// `HH:MM:SS`, or `N/A` when absent.
pub fn format_time(raw: Option<&str>) -> String {
    format_with(raw, "%H:%M:%S")
}

/// `dd/mm/yyyy HH:MM`, used for scheduled publication times.
pub fn format_date_time(raw: Option<&str>) -> String {
    format_with(raw, "%d/%m/%Y %H:%M")
}

/// Estimated narration length in whole seconds at [`WORDS_PER_MINUTE`].
pub fn estimate_duration(text: &str) -> u64 {
    let words = text.split_whitespace().count();
    if words == 0 {
        return 0;
    }
    ((words as f64 / WORDS_PER_MINUTE) * 60.0).ceil() as u64
}

/// Spoken-length estimate from character count.
pub fn script_read_seconds(text: &str) -> u64 {
    (text.chars().count() as f64 / CHARS_PER_SECOND).ceil() as u64
}

/// `0s`, `42s` or `3m 5s`.
pub fn format_duration(seconds: u64) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}
