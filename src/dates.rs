//! Date and time parsing for deadlines and events.
//!
//! User input and stored lines both go through [`parse_date_time`], which walks a fixed,
//! ordered table of formats and keeps the first one that matches. Changing the order of
//! [`FORMATS`] changes how ambiguous input is read, so the table is the single place the
//! priority is defined.

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::error::{Error, Result, DATE_FORMAT_HINT};

const DAY_MONTH_YEAR_TIME: &str = "%d/%m/%Y %H%M";
const MONTH_DAY_YEAR: &str = "%b %d %Y";
const MONTH_DAY_YEAR_SHORT_HOUR: &str = "%b %d %Y %-I:%M%p";
const MONTH_DAY_YEAR_PADDED_HOUR: &str = "%b %d %Y %I:%M%p";

/// One entry of the fallback table.
#[derive(Clone, Copy)]
pub struct DateAttempt {
    /// Human-readable pattern, used in logs and tests.
    pub name: &'static str,
    pub parse: fn(&str) -> Option<NaiveDateTime>,
}

/// Formats tried by [`parse_date_time`], highest priority first.
pub const FORMATS: &[DateAttempt] = &[
    DateAttempt { name: "dd/MM/yyyy HHmm", parse: day_month_year_time },
    DateAttempt { name: "dd/MM/yyyy", parse: day_month_year_midnight },
    DateAttempt { name: "MMM dd yyyy", parse: month_day_year },
    DateAttempt { name: "MMM d yyyy h:mma", parse: month_day_year_short_hour },
    DateAttempt { name: "MMM dd yyyy hh:mma", parse: month_day_year_padded_hour },
];

fn day_month_year_time(input: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, DAY_MONTH_YEAR_TIME).ok()
}

fn day_month_year_midnight(input: &str) -> Option<NaiveDateTime> {
    day_month_year_time(&format!("{input} 0000"))
}

fn month_day_year(input: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(input, MONTH_DAY_YEAR)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn month_day_year_short_hour(input: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, MONTH_DAY_YEAR_SHORT_HOUR).ok()
}

fn month_day_year_padded_hour(input: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, MONTH_DAY_YEAR_PADDED_HOUR).ok()
}

/// Return the first table entry that accepts `input`, with the parsed value.
pub fn matching_attempt(input: &str) -> Option<(&'static str, NaiveDateTime)> {
    let input = input.trim();
    FORMATS
        .iter()
        .find_map(|attempt| (attempt.parse)(input).map(|dt| (attempt.name, dt)))
}

/// Parse free-form date/time text.
///
/// Supports, in this order:
/// - `02/12/2024 1800`
/// - `02/12/2024` (midnight)
/// - `Dec 02 2024` (midnight)
/// - `Dec 2 2024 6:00pm`
/// - `Dec 02 2024 06:00pm`
pub fn parse_date_time(input: &str) -> Result<NaiveDateTime> {
    match matching_attempt(input) {
        Some((name, dt)) => {
            log::debug!("Parsed '{}' as {} using '{}'", input, dt, name);
            Ok(dt)
        }
        None => Err(Error::InvalidDateFormat(DATE_FORMAT_HINT.to_string())),
    }
}

/// Drop seconds and sub-seconds. Stored lines only carry hours and minutes.
pub fn truncate_to_minute(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

/// Format a point in time for display and storage.
///
/// Midnight is shown as a bare date (`Dec 02 2024`), anything else with a 12-hour clock
/// (`Dec 02 2024 6:00pm`). Both forms are accepted again by [`parse_date_time`].
pub fn format_date_time(dt: &NaiveDateTime) -> String {
    if dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0 {
        dt.format(MONTH_DAY_YEAR).to_string()
    } else {
        dt.format("%b %d %Y %-I:%M%P").to_string()
    }
}
