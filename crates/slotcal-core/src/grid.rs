//! Week grid layout and plain-text rendering.
//!
//! [`WeekGrid`] is the presentation model of one week: a title, seven day
//! headers and one row per slot index. Hosts can render it themselves using
//! the CSS-style class names, or call [`WeekGrid::render`] for a terminal view.

use chrono::{Datelike, NaiveDate, NaiveTime};

use crate::calendar::{CalendarData, CalendarDay, SlotStatus, WEEKDAYS_JA};
use crate::time::{format_time, slot_start, week_days};

/// Rows shown before any data arrives.
pub const SKELETON_ROWS: usize = 20;

/// Slot increment assumed by the skeleton grid.
pub const SKELETON_INCREMENT_MINUTES: u32 = 30;

/// First slot of the skeleton grid.
pub const SKELETON_FIRST_SLOT: NaiveTime = match NaiveTime::from_hms_opt(9, 0, 0) {
    Some(time) => time,
    None => panic!("09:00 is a valid time of day"),
};

/// Header of one day column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayHeader {
    pub day: u32,
    pub weekday: String,
    pub class: &'static str,
}

impl DayHeader {
    fn from_day(day: &CalendarDay) -> Self {
        Self {
            day: day.day,
            weekday: day.weekday.clone(),
            class: day_class(&day.weekday),
        }
    }
}

/// One cell of the grid. `status` is `None` when the day has no slot at
/// this index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub day_index: usize,
    pub slot_index: usize,
    pub status: Option<SlotStatus>,
}

impl GridCell {
    /// Class names of the cell.
    pub fn class(&self) -> &'static str {
        match self.status {
            Some(SlotStatus::Available) => "available red",
            Some(SlotStatus::Reserved) => "reserved gray",
            Some(SlotStatus::Unavailable) | None => "off",
        }
    }

    /// Symbol shown in the cell.
    pub fn symbol(&self) -> &'static str {
        self.status.map_or("-", |status| status.symbol())
    }

    /// Returns `true` if activating this cell can select a slot.
    pub fn is_clickable(&self) -> bool {
        self.status.is_some_and(|status| status.is_bookable())
    }
}

/// One time-of-day row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub time_label: String,
    pub cells: Vec<GridCell>,
}

/// Presentation model of one displayed week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekGrid {
    pub title: String,
    pub headers: Vec<DayHeader>,
    pub rows: Vec<GridRow>,
    /// `true` when built without data.
    pub skeleton: bool,
}

impl WeekGrid {
    /// Builds the grid for a fetched week.
    pub fn from_data(data: &CalendarData) -> Self {
        let first = data.first_slot_time().ok();
        let anchor = data.anchor_date();

        let rows = (0..data.slots_per_day())
            .map(|slot_index| {
                let time_label = match (anchor, first) {
                    (Some(anchor), Some(first)) => {
                        slot_start(anchor, first, data.availability_increments, slot_index)
                            .map(format_time)
                    }
                    _ => None,
                }
                .unwrap_or_else(|| skeleton_label(slot_index));
                let cells = data
                    .days
                    .iter()
                    .enumerate()
                    .map(|(day_index, day)| GridCell {
                        day_index,
                        slot_index,
                        status: day.slots.get(slot_index).map(|slot| slot.status),
                    })
                    .collect();
                GridRow { time_label, cells }
            })
            .collect();

        Self {
            title: title(data.year, data.month),
            headers: data.days.iter().map(DayHeader::from_day).collect(),
            rows,
            skeleton: false,
        }
    }

    /// Builds a placeholder grid for the week containing `current_date`.
    pub fn skeleton(current_date: NaiveDate) -> Self {
        let headers = week_days(current_date)
            .iter()
            .zip(WEEKDAYS_JA)
            .map(|(date, weekday)| DayHeader {
                day: date.day(),
                weekday: weekday.to_string(),
                class: day_class(weekday),
            })
            .collect();

        let rows = (0..SKELETON_ROWS)
            .map(|slot_index| GridRow {
                time_label: skeleton_label(slot_index),
                cells: (0..7)
                    .map(|day_index| GridCell {
                        day_index,
                        slot_index,
                        status: None,
                    })
                    .collect(),
            })
            .collect();

        Self {
            title: title(current_date.year(), current_date.month()),
            headers,
            rows,
            skeleton: true,
        }
    }

    /// Renders the grid as text, one line per row.
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(self.title.clone());

        let mut header = String::from("     ");
        for day in &self.headers {
            header.push_str(&format!(" {:>2}{}", day.day, day.weekday));
        }
        lines.push(header);

        for row in &self.rows {
            let mut line = row.time_label.clone();
            for cell in &row.cells {
                line.push_str(&format!(" {:>3}", cell.symbol()));
            }
            lines.push(line);
        }

        lines.join("\n")
    }
}

/// Class names of a day header.
pub fn day_class(weekday: &str) -> &'static str {
    match weekday {
        "日" | "祝" => "red",
        "土" => "blue",
        _ => "",
    }
}

fn title(year: i32, month: u32) -> String {
    format!("{year}年{month}月")
}

fn skeleton_label(slot_index: usize) -> String {
    slot_start(
        NaiveDate::default(),
        SKELETON_FIRST_SLOT,
        SKELETON_INCREMENT_MINUTES,
        slot_index,
    )
    .map(format_time)
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::TimeSlot;

    fn slot(date: NaiveDate, status: SlotStatus) -> TimeSlot {
        let start_time = date.and_hms_opt(9, 0, 0).unwrap();
        TimeSlot {
            staff_id: Some(1),
            status,
            start_time,
            end_time: start_time + chrono::Duration::minutes(30),
        }
    }

    fn data() -> CalendarData {
        let days = (0..7u32)
            .map(|i| {
                let date = NaiveDate::from_ymd_opt(2024, 8, 18 + i).unwrap();
                let slots = if i == 0 {
                    vec![slot(date, SlotStatus::Available), slot(date, SlotStatus::Reserved)]
                } else {
                    vec![slot(date, SlotStatus::Unavailable)]
                };
                CalendarDay {
                    year: 2024,
                    month: 8,
                    day: 18 + i,
                    weekday: WEEKDAYS_JA[i as usize].to_string(),
                    slots,
                }
            })
            .collect();
        CalendarData {
            year: 2024,
            month: 8,
            day: 19,
            first_slot_start_at: "09:00".to_string(),
            availability_increments: 30,
            has_prev: false,
            has_next: true,
            days,
            sync_tokens: None,
            sync_token: None,
        }
    }

    #[test]
    fn renders_week_from_data() {
        let grid = WeekGrid::from_data(&data());
        assert!(!grid.skeleton);
        insta::assert_snapshot!(grid.render(), @r"
2024年8月
      18日 19月 20火 21水 22木 23金 24土
09:00   ◎   -   -   -   -   -   -
09:30   ×   -   -   -   -   -   -
");
    }

    #[test]
    fn cell_classes_follow_status() {
        let grid = WeekGrid::from_data(&data());
        let first = &grid.rows[0].cells;
        assert_eq!(first[0].class(), "available red");
        assert!(first[0].is_clickable());
        assert_eq!(first[1].class(), "off");
        assert_eq!(grid.rows[1].cells[0].class(), "reserved gray");
        // day 1 has a single slot, so row 1 is a missing cell
        assert_eq!(grid.rows[1].cells[1].status, None);
        assert!(!grid.rows[1].cells[1].is_clickable());
    }

    #[test]
    fn header_classes_mark_weekends() {
        let grid = WeekGrid::from_data(&data());
        assert_eq!(grid.headers[0].class, "red");
        assert_eq!(grid.headers[3].class, "");
        assert_eq!(grid.headers[6].class, "blue");
        assert_eq!(day_class("祝"), "red");
    }

    #[test]
    fn skeleton_covers_sunday_week() {
        let grid = WeekGrid::skeleton(NaiveDate::from_ymd_opt(2024, 8, 21).unwrap());
        assert!(grid.skeleton);
        assert_eq!(grid.title, "2024年8月");
        assert_eq!(grid.headers[0].day, 18);
        assert_eq!(grid.headers[0].weekday, "日");
        assert_eq!(grid.rows.len(), SKELETON_ROWS);
        assert_eq!(grid.rows[0].time_label, "09:00");
        assert_eq!(grid.rows[19].time_label, "18:30");
        assert!(grid.rows.iter().flat_map(|r| &r.cells).all(|c| c.class() == "off"));
    }

    #[test]
    fn unrepresentable_slot_times_use_skeleton_labels() {
        let mut data = data();
        data.availability_increments = u32::MAX;
        let filler = data.days[0].slots[0].clone();
        data.days[0].slots.resize(40, filler);

        let grid = WeekGrid::from_data(&data);
        assert_eq!(grid.rows.len(), 40);
        assert_eq!(grid.rows[0].time_label, "09:00");
        // 09:00 + 39 * 30 minutes on the skeleton clock
        assert_eq!(grid.rows[39].time_label, "04:30");
    }
}
