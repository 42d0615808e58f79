//! Calendar data model.
//!
//! One [`CalendarData`] value is one fetch response and describes one
//! displayed week. Slots are positional: index `i` in every day stands for
//! the same time of day, `firstSlotStartAt + i * availabilityIncrements`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::time::{TimeParseError, parse_time_of_day, slot_start};

/// Japanese weekday labels, Sunday first.
pub const WEEKDAYS_JA: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

/// English weekday labels, Sunday first.
pub const WEEKDAYS_EN: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Label the backend uses for public holidays.
pub const HOLIDAY_LABEL: &str = "祝";

/// Booking status of a single slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    /// The slot cannot be booked (closed, past, no staff).
    Unavailable,
    /// The slot can be booked.
    Available,
    /// The slot is already taken.
    Reserved,
}

impl SlotStatus {
    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Available => "available",
            Self::Reserved => "reserved",
        }
    }

    /// Returns the grid symbol for the status.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Unavailable => "-",
            Self::Available => "◎",
            Self::Reserved => "×",
        }
    }

    /// Returns `true` if a slot with this status can be selected.
    pub fn is_bookable(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One bookable time unit within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    /// Staff member the slot belongs to, if the backend assigned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<u64>,
    /// Booking status.
    pub status: SlotStatus,
    /// Informational start time; the grid derives the real one from the index.
    #[serde(with = "wall_clock")]
    pub start_time: NaiveDateTime,
    /// Informational end time.
    #[serde(with = "wall_clock")]
    pub end_time: NaiveDateTime,
}

/// One column of the week grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Display label, e.g. `月` or `祝`.
    pub weekday: String,
    /// Slots ordered by index.
    #[serde(default)]
    pub slots: Vec<TimeSlot>,
}

impl CalendarDay {
    /// Returns the calendar date of this day, if the fields form a valid date.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// Returns `true` for Sundays and holidays.
    pub fn is_holiday(&self) -> bool {
        self.weekday == WEEKDAYS_JA[0] || self.weekday == HOLIDAY_LABEL
    }

    /// Returns `true` for Saturdays.
    pub fn is_saturday(&self) -> bool {
        self.weekday == WEEKDAYS_JA[6]
    }
}

/// Per-staff synchronization token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffSyncToken {
    pub staff_id: u64,
    pub sync_token: String,
}

/// One week of bookable slots, as returned by a data provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarData {
    /// Anchor date of the week.
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Time of day of slot 0, `HH:MM`.
    pub first_slot_start_at: String,
    /// Minutes between consecutive slot starts.
    pub availability_increments: u32,
    pub has_prev: bool,
    pub has_next: bool,
    pub days: Vec<CalendarDay>,
    /// Per-staff tokens, preferred over `sync_token` when the staff matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_tokens: Option<Vec<StaffSyncToken>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_token: Option<String>,
}

impl CalendarData {
    /// Returns the anchor date, if the fields form a valid date.
    pub fn anchor_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// Parses `first_slot_start_at`.
    pub fn first_slot_time(&self) -> Result<NaiveTime, TimeParseError> {
        parse_time_of_day(&self.first_slot_start_at)
    }

    /// Number of grid rows, taken from the first day.
    pub fn slots_per_day(&self) -> usize {
        self.days.first().map_or(0, |day| day.slots.len())
    }

    /// Returns the slot at the given position, if both indices resolve.
    pub fn slot_at(&self, day_index: usize, slot_index: usize) -> Option<&TimeSlot> {
        self.days.get(day_index)?.slots.get(slot_index)
    }

    /// Derives the wall-clock start of a slot from its position.
    pub fn slot_start_for(&self, day_index: usize, slot_index: usize) -> Option<NaiveDateTime> {
        let date = self.days.get(day_index)?.date()?;
        let first = match self.first_slot_time() {
            Ok(first) => first,
            Err(e) => {
                warn!(error = %e, "calendar data has an unusable firstSlotStartAt");
                return None;
            }
        };
        let start = slot_start(date, first, self.availability_increments, slot_index);
        if start.is_none() {
            warn!(
                slot_index,
                increment = self.availability_increments,
                "slot start is out of the representable range"
            );
        }
        start
    }

    /// Resolves the token to echo back when booking a slot of `staff_id`.
    ///
    /// A matching per-staff token wins, then the top-level token, then the
    /// empty string.
    pub fn sync_token_for(&self, staff_id: Option<u64>) -> &str {
        staff_id
            .and_then(|id| {
                self.sync_tokens
                    .as_deref()?
                    .iter()
                    .find(|token| token.staff_id == id)
            })
            .map(|token| token.sync_token.as_str())
            .or(self.sync_token.as_deref())
            .unwrap_or("")
    }
}

/// Serde adapter for slot timestamps.
///
/// Accepts RFC 3339 (the offset is dropped and the local wall clock kept) or
/// naive ISO 8601, and always writes naive ISO 8601.
mod wall_clock {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(dt.naive_local());
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|e| D::Error::custom(format!("invalid timestamp '{raw}': {e}")))
    }
}
