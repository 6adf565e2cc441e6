//! Parsing of compound durations and alert times given on the command line.

use std::sync::LazyLock;
use std::time::Duration;

use chrono::NaiveTime;
use regex::Regex;

use crate::error::{CoreError, Result};

static COMPOUND_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+)h)? ?(?:(\d+)m)? ?(?:(\d+)s)?$").expect("Invalid duration regex")
});

/// Parses a compound duration such as `2h`, `1h30m`, `45m 10s` or `90s`.
///
/// Zero-length durations are rejected: a zero poll interval would spin.
pub fn parse_compound_duration(input: &str) -> Result<Duration> {
    let trimmed = input.trim();
    let caps = COMPOUND_REGEX
        .captures(trimmed)
        .ok_or_else(|| CoreError::InvalidDuration(input.to_string()))?;

    let part = |idx: usize| -> Result<u64> {
        caps.get(idx)
            .map(|m| m.as_str().parse::<u64>())
            .transpose()
            .map(Option::unwrap_or_default)
            .map_err(|_| CoreError::InvalidDuration(input.to_string()))
    };

    let seconds = part(1)?
        .saturating_mul(3600)
        .saturating_add(part(2)?.saturating_mul(60))
        .saturating_add(part(3)?);

    if seconds == 0 {
        return Err(CoreError::InvalidDuration(input.to_string()));
    }
    Ok(Duration::from_secs(seconds))
}

/// Parses a 24-hour `HH:MM` time of day.
pub fn parse_alert_time(input: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .map_err(|_| CoreError::InvalidTime(input.to_string()))
}
