//! Date arithmetic for the week grid.
//!
//! All values here are wall-clock (shop-local) dates and times. The backend
//! describes slots as "first slot at HH:MM, then every N minutes", so a slot's
//! start time is always derived from its index rather than read from the
//! payload.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use thiserror::Error;

use crate::calendar::{WEEKDAYS_EN, WEEKDAYS_JA};

/// Error returned when a time-of-day string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    /// The value is not a valid `HH:MM` time of day.
    #[error("invalid time of day '{0}', expected HH:MM")]
    InvalidTimeOfDay(String),
}

/// Locale used by [`format_date_time`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateLocale {
    /// `2024/8/19(月) 09:00`
    #[default]
    Ja,
    /// `Mon, 8/19/2024 09:00 AM`
    En,
}

/// Returns `date` shifted by `days` (negative moves backwards), or `None`
/// when the result falls outside the supported date range.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|delta| date.checked_add_signed(delta))
}

/// Returns `datetime` shifted by `minutes`, or `None` on overflow.
pub fn add_minutes(datetime: NaiveDateTime, minutes: i64) -> Option<NaiveDateTime> {
    Duration::try_minutes(minutes).and_then(|delta| datetime.checked_add_signed(delta))
}

/// Returns the Sunday on or before `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    start_of_week_from(date, Weekday::Sun)
}

/// Returns the first day of the week containing `date`, for weeks that
/// begin on `week_start`.
///
/// Clamped to [`NaiveDate::MIN`] for the first, partial week of the range.
pub fn start_of_week_from(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let offset = (7 + date.weekday().num_days_from_sunday() - week_start.num_days_from_sunday()) % 7;
    add_days(date, -i64::from(offset)).unwrap_or(NaiveDate::MIN)
}

/// Returns the seven dates of the Sunday-first week containing `date`.
///
/// Days past [`NaiveDate::MAX`] repeat the last representable date.
pub fn week_days(date: NaiveDate) -> [NaiveDate; 7] {
    let start = start_of_week(date);
    std::array::from_fn(|i| add_days(start, i as i64).unwrap_or(NaiveDate::MAX))
}

/// Parses an `HH:MM` time of day.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, TimeParseError> {
    let trimmed = value.trim();
    let (hours, minutes) = trimmed
        .split_once(':')
        .ok_or_else(|| TimeParseError::InvalidTimeOfDay(value.to_string()))?;

    if hours.is_empty()
        || minutes.len() != 2
        || !hours.bytes().all(|b| b.is_ascii_digit())
        || !minutes.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(TimeParseError::InvalidTimeOfDay(value.to_string()));
    }

    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .map_err(|_| TimeParseError::InvalidTimeOfDay(value.to_string()))
}

/// Computes the wall-clock start of slot `index` on `base_date`.
///
/// Returns `None` when the start lies outside the supported date range.
pub fn slot_start(
    base_date: NaiveDate,
    first_slot_start_at: NaiveTime,
    increment_minutes: u32,
    index: usize,
) -> Option<NaiveDateTime> {
    let offset = i64::try_from(index)
        .ok()?
        .checked_mul(i64::from(increment_minutes))?;
    add_minutes(base_date.and_time(first_slot_start_at), offset)
}

/// Computes `(start, end)` of slot `index`; every slot lasts one increment.
pub fn slot_range(
    base_date: NaiveDate,
    first_slot_start_at: NaiveTime,
    increment_minutes: u32,
    index: usize,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = slot_start(base_date, first_slot_start_at, increment_minutes, index)?;
    let end = add_minutes(start, i64::from(increment_minutes))?;
    Some((start, end))
}

/// Formats the time of day as `HH:MM`.
pub fn format_time(datetime: NaiveDateTime) -> String {
    datetime.format("%H:%M").to_string()
}

/// Formats a date and time for display in the given locale.
pub fn format_date_time(datetime: NaiveDateTime, locale: DateLocale) -> String {
    let date = datetime.date();
    let weekday = date.weekday().num_days_from_sunday() as usize;
    match locale {
        DateLocale::Ja => format!(
            "{}/{}/{}({}) {}",
            date.year(),
            date.month(),
            date.day(),
            WEEKDAYS_JA[weekday],
            format_time(datetime)
        ),
        DateLocale::En => format!(
            "{}, {}/{}/{} {}",
            WEEKDAYS_EN[weekday],
            date.month(),
            date.day(),
            date.year(),
            datetime.format("%I:%M %p")
        ),
    }
}
