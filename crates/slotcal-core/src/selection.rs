//! Slot activation and the selection reported to the host page.
//!
//! Activating a cell only produces a [`SlotSelection`] when the cell resolves
//! to an `available` slot and the widget is enabled. Everything else is a
//! no-op.

use chrono::{SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calendar::CalendarData;

/// Display name used when the caller picked a specific staff member.
pub const SELECTED_STAFF_LABEL: &str = "Selected Staff";

/// Display name used when any staff member will do.
pub const NO_PREFERENCE_LABEL: &str = "No Preference";

/// Staff reference carried in a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRef {
    pub id: u64,
    pub name_display: String,
}

/// The slot the user picked, ready to be sent to a booking endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSelection {
    /// Slot start as a UTC RFC 3339 timestamp with milliseconds.
    pub start_at: String,
    pub staff: StaffRef,
    /// Token of the data version that displayed this slot.
    pub sync_token: String,
}

/// Widget flags that influence activation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivationContext {
    /// A disabled widget ignores every activation.
    pub disabled: bool,
    /// Whether the caller filtered by a specific staff member.
    pub is_staff_selected: bool,
}

impl ActivationContext {
    /// Builder method to set the disabled flag.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Builder method to set whether a staff member is selected.
    pub fn with_staff_selected(mut self, selected: bool) -> Self {
        self.is_staff_selected = selected;
        self
    }
}

/// Resolves an activated cell into a selection.
///
/// The start time is recomputed from the slot index, interpreted as wall
/// clock time in `tz`. Returns `None` for disabled widgets, out-of-range
/// cells, slots that are not available, and local times that do not exist
/// in `tz`.
pub fn activate_slot<Tz: TimeZone>(
    data: &CalendarData,
    day_index: usize,
    slot_index: usize,
    ctx: ActivationContext,
    tz: &Tz,
) -> Option<SlotSelection> {
    if ctx.disabled {
        debug!(day_index, slot_index, "ignoring activation on disabled calendar");
        return None;
    }

    let slot = data.slot_at(day_index, slot_index)?;
    if !slot.status.is_bookable() {
        debug!(day_index, slot_index, status = %slot.status, "slot is not bookable");
        return None;
    }

    let Some(local_start) = data.slot_start_for(day_index, slot_index) else {
        warn!(day_index, slot_index, "slot has no usable start time");
        return None;
    };
    let Some(start) = tz.from_local_datetime(&local_start).earliest() else {
        warn!(%local_start, "slot start does not exist in the shop timezone");
        return None;
    };

    let name_display = if ctx.is_staff_selected {
        SELECTED_STAFF_LABEL
    } else {
        NO_PREFERENCE_LABEL
    };

    Some(SlotSelection {
        start_at: start
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        staff: StaffRef {
            id: slot.staff_id.unwrap_or(0),
            name_display: name_display.to_string(),
        },
        sync_token: data.sync_token_for(slot.staff_id).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, NaiveDate};

    use super::*;
    use crate::calendar::{CalendarDay, SlotStatus, StaffSyncToken, TimeSlot};

    fn week(statuses: &[SlotStatus], staff_id: Option<u64>) -> CalendarData {
        let start = NaiveDate::from_ymd_opt(2024, 8, 18).unwrap();
        let days = (0..7)
            .map(|i| {
                let date = start + chrono::Duration::days(i);
                let slots = statuses
                    .iter()
                    .enumerate()
                    .map(|(n, status)| {
                        let (start_time, end_time) = crate::time::slot_range(
                            date,
                            chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                            30,
                            n,
                        )
                        .unwrap();
                        TimeSlot {
                            staff_id,
                            status: *status,
                            start_time,
                            end_time,
                        }
                    })
                    .collect();
                CalendarDay {
                    year: 2024,
                    month: 8,
                    day: 18 + i as u32,
                    weekday: crate::calendar::WEEKDAYS_JA[i as usize].to_string(),
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
            has_prev: true,
            has_next: true,
            days,
            sync_tokens: Some(vec![StaffSyncToken {
                staff_id: 3,
                sync_token: "staff-3-token".to_string(),
            }]),
            sync_token: Some("week-token".to_string()),
        }
    }

    #[test]
    fn available_slot_produces_selection() {
        let data = week(
            &[SlotStatus::Unavailable, SlotStatus::Reserved, SlotStatus::Available, SlotStatus::Available],
            Some(3),
        );
        let ctx = ActivationContext::default().with_staff_selected(true);
        let selection = activate_slot(&data, 1, 3, ctx, &Utc).unwrap();

        insta::assert_json_snapshot!(selection, @r#"
        {
          "startAt": "2024-08-19T10:30:00.000Z",
          "staff": {
            "id": 3,
            "nameDisplay": "Selected Staff"
          },
          "syncToken": "staff-3-token"
        }
        "#);
    }

    #[test]
    fn start_at_is_converted_from_shop_timezone() {
        let data = week(&[SlotStatus::Available], None);
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();
        let selection = activate_slot(&data, 1, 0, ActivationContext::default(), &jst).unwrap();

        assert_eq!(selection.start_at, "2024-08-19T00:00:00.000Z");
        assert_eq!(selection.staff.id, 0);
        assert_eq!(selection.staff.name_display, NO_PREFERENCE_LABEL);
        assert_eq!(selection.sync_token, "week-token");
    }

    #[test]
    fn unbookable_cells_never_select() {
        let statuses = [SlotStatus::Unavailable, SlotStatus::Reserved];
        let data = week(&statuses, Some(3));
        for day in 0..7 {
            for slot in 0..statuses.len() {
                assert!(activate_slot(&data, day, slot, ActivationContext::default(), &Utc).is_none());
            }
        }
    }

    #[test]
    fn disabled_calendar_ignores_available_slots() {
        let data = week(&[SlotStatus::Available], Some(3));
        let ctx = ActivationContext::default().with_disabled(true);
        assert!(activate_slot(&data, 2, 0, ctx, &Utc).is_none());
    }

    #[test]
    fn out_of_range_cells_are_ignored() {
        let data = week(&[SlotStatus::Available], Some(3));
        assert!(activate_slot(&data, 7, 0, ActivationContext::default(), &Utc).is_none());
        assert!(activate_slot(&data, 0, 1, ActivationContext::default(), &Utc).is_none());
    }

    #[test]
    fn missing_tokens_fall_back_to_empty_string() {
        let mut data = week(&[SlotStatus::Available], Some(4));
        data.sync_token = None;
        let selection = activate_slot(&data, 0, 0, ActivationContext::default(), &Utc).unwrap();
        assert_eq!(selection.sync_token, "");
    }

    #[test]
    fn unrepresentable_slot_start_is_ignored() {
        let mut data = week(&[SlotStatus::Available; 40], None);
        data.availability_increments = u32::MAX;
        let ctx = ActivationContext::default();
        assert!(activate_slot(&data, 0, 39, ctx, &Utc).is_none());
        assert!(activate_slot(&data, 0, 0, ctx, &Utc).is_some());
    }
}
