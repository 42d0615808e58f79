//! Core types: calendar data, date arithmetic, slot selection, grid rendering
//!
//! Everything in this crate is synchronous and side-effect free apart from
//! [`tracing::init_tracing`]. Data providers live in `slotcal-providers` and
//! the stateful calendar in `slotcal-client`.

pub mod calendar;
pub mod grid;
pub mod selection;
pub mod time;
pub mod tracing;

pub use calendar::{
    CalendarData, CalendarDay, HOLIDAY_LABEL, SlotStatus, StaffSyncToken, TimeSlot, WEEKDAYS_EN,
    WEEKDAYS_JA,
};
pub use grid::{DayHeader, GridCell, GridRow, WeekGrid, day_class};
pub use selection::{ActivationContext, SlotSelection, StaffRef, activate_slot};
pub use time::{
    DateLocale, TimeParseError, add_days, add_minutes, format_date_time, format_time,
    parse_time_of_day, slot_range, slot_start, start_of_week, start_of_week_from, week_days,
};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
