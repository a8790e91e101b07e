//! Trading-Day Resolver — maps a message header plus its UTC instant onto
//! an exchange-local business calendar date.
//!
//! The header never carries a year: the year always comes from the message
//! timestamp converted to the exchange time zone. Weekday names in the
//! header are informational only and never consulted.

use crate::config::EngineConfig;
use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalendarError {
    /// No header date and no usable timestamp. Fatal for the message; the
    /// caller must not default to "today" or a fabricated date.
    #[error("message timestamp missing; trading day unresolvable")]
    MissingTimestamp,
}

/// English month names, indexed by month number minus one.
const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Match a token against the month table: full name or 3-letter prefix.
fn month_number(token: &str) -> Option<u32> {
    if token.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| *m == token || (token.len() == 3 && m.starts_with(token)))
        .map(|i| i as u32 + 1)
}

/// Parse a token as a calendar day-of-month, stripping an ordinal suffix
/// ("29th", "1st", "2nd", "3rd").
fn day_number(token: &str) -> Option<u32> {
    let digits = token.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    if digits.is_empty() || digits.len() > 2 {
        return None;
    }
    let day: u32 = digits.parse().ok()?;
    (1..=31).contains(&day).then_some(day)
}

/// Resolve the trading day for a message.
///
/// Scans the first `header_scan_lines` lines for an adjacent
/// (month-name, day-number) token pair; combines it with the calendar year of
/// `timestamp` in the exchange time zone. Falls back to the timestamp's
/// exchange-local date when no pair is found. Always returns a concrete date
/// or `MissingTimestamp` — never a fabricated default.
///
/// Deterministic: same `(content, timestamp)` always yields the same date.
pub fn resolve_trading_day(
    content: &str,
    timestamp: Option<DateTime<Utc>>,
    config: &EngineConfig,
) -> Result<NaiveDate, CalendarError> {
    let instant = timestamp.ok_or(CalendarError::MissingTimestamp)?;
    let local = instant.with_timezone(&config.exchange_timezone);
    let local_year = local.year();

    let tokens: Vec<String> = content
        .lines()
        .take(config.header_scan_lines)
        .flat_map(crate::classify::tokenize)
        .collect();

    for pair in tokens.windows(2) {
        let (Some(month), Some(day)) = (month_number(&pair[0]), day_number(&pair[1])) else {
            continue;
        };
        // An impossible combination for this year (e.g. "Feb 30") is treated
        // as not-found and scanning continues.
        if let Some(date) = NaiveDate::from_ymd_opt(local_year, month, day) {
            return Ok(date);
        }
    }

    Ok(local.date_naive())
}

/// Advisory post-condition: a resolved date on Saturday/Sunday is tagged for
/// audit but setups are still returned.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
