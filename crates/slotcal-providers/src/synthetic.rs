//! Synthetic data provider.
//!
//! Generates plausible weeks locally, for demos, tests and development
//! without a backend. Output can be made reproducible by fixing both the
//! random seed and the reference "now".

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slotcal_core::time::{add_days, slot_range, start_of_week};
use slotcal_core::{CalendarData, CalendarDay, SlotStatus, TimeSlot, WEEKDAYS_JA};
use tracing::debug;

use crate::error::{FetchError, ProviderResult};
use crate::provider::{BoxFuture, DataProvider, FetchSlotsParams};

const PROVIDER_NAME: &str = "static";

/// Slots generated per day (09:00 to 18:00).
pub const SLOTS_PER_DAY: usize = 18;

/// Time of day of the first generated slot.
pub const FIRST_SLOT_START_AT: &str = "09:00";

const FIRST_SLOT: NaiveTime = match NaiveTime::from_hms_opt(9, 0, 0) {
    Some(time) => time,
    None => panic!("09:00 is a valid time of day"),
};

/// Minutes between generated slots.
pub const INCREMENT_MINUTES: u32 = 30;

/// Staff id used when the request has no staff filter.
pub const DEFAULT_STAFF_ID: u64 = 1;

/// Configuration for the synthetic provider.
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    /// Simulated network delay.
    pub delay: Duration,
    /// Random seed; `None` draws fresh randomness on every fetch.
    pub seed: Option<u64>,
    /// Reference time for past-slot suppression and paging; `None` reads
    /// the local clock.
    pub now: Option<NaiveDateTime>,
    /// Weeks after the current one that may be displayed; `None` is unbounded.
    pub booking_horizon_weeks: Option<u32>,
}

impl StaticConfig {
    /// Builder method to set the simulated delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Builder method to set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method to pin the reference time.
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    /// Builder method to limit forward navigation.
    pub fn with_booking_horizon_weeks(mut self, weeks: u32) -> Self {
        self.booking_horizon_weeks = Some(weeks);
        self
    }
}

/// Data provider that synthesizes weeks, or returns injected data verbatim.
#[derive(Debug, Default)]
pub struct StaticDataProvider {
    config: StaticConfig,
    custom_data: RwLock<Option<CalendarData>>,
}

impl StaticDataProvider {
    /// Creates a generating provider.
    pub fn new(config: StaticConfig) -> Self {
        Self {
            config,
            custom_data: RwLock::new(None),
        }
    }

    /// Creates a provider that returns `data` for every request.
    pub fn with_custom_data(config: StaticConfig, data: CalendarData) -> Self {
        Self {
            config,
            custom_data: RwLock::new(Some(data)),
        }
    }

    pub fn config(&self) -> &StaticConfig {
        &self.config
    }

    /// Sets the data returned for every request.
    pub fn set_custom_data(&self, data: CalendarData) {
        *self.custom_data.write().unwrap_or_else(PoisonError::into_inner) = Some(data);
    }

    /// Reverts to generated data.
    pub fn clear_custom_data(&self) {
        *self.custom_data.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn custom_data(&self) -> Option<CalendarData> {
        self.custom_data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn now(&self) -> NaiveDateTime {
        self.config.now.unwrap_or_else(|| Local::now().naive_local())
    }

    /// Generates the week containing the anchor date of `params`.
    pub fn generate(&self, params: &FetchSlotsParams) -> ProviderResult<CalendarData> {
        let anchor = params.anchor_date()?;
        let week_start = start_of_week(anchor);
        let now = self.now();
        let staff_id = params.effective_staff_id().unwrap_or(DEFAULT_STAFF_ID);

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ week_start.num_days_from_ce() as u64),
            None => StdRng::from_os_rng(),
        };

        let mut days = Vec::with_capacity(WEEKDAYS_JA.len());
        for (day_index, weekday) in WEEKDAYS_JA.iter().enumerate() {
            let date =
                add_days(week_start, day_index as i64).ok_or_else(|| out_of_range(anchor))?;
            let mut slots = Vec::with_capacity(SLOTS_PER_DAY);
            for slot_index in 0..SLOTS_PER_DAY {
                let (start_time, end_time) =
                    slot_range(date, FIRST_SLOT, INCREMENT_MINUTES, slot_index)
                        .ok_or_else(|| out_of_range(anchor))?;
                let mut status = draw_status(&mut rng, day_index);
                if start_time < now {
                    status = SlotStatus::Unavailable;
                }
                slots.push(TimeSlot {
                    staff_id: Some(staff_id),
                    status,
                    start_time,
                    end_time,
                });
            }

            days.push(CalendarDay {
                year: date.year(),
                month: date.month(),
                day: date.day(),
                weekday: weekday.to_string(),
                slots,
            });
        }

        let has_prev = week_start.and_time(NaiveTime::default()) > now;
        let next_week = add_days(week_start, 7);
        let has_next = match (next_week, self.config.booking_horizon_weeks) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(next_week), Some(weeks)) => {
                // a horizon past the end of the date range is unbounded
                add_days(start_of_week(now.date()), 7 * i64::from(weeks))
                    .is_none_or(|last_week| next_week <= last_week)
            }
        };

        debug!(%week_start, has_prev, has_next, "generated synthetic week");

        Ok(CalendarData {
            year: anchor.year(),
            month: anchor.month(),
            day: anchor.day(),
            first_slot_start_at: FIRST_SLOT_START_AT.to_string(),
            availability_increments: INCREMENT_MINUTES,
            has_prev,
            has_next,
            days,
            sync_tokens: None,
            sync_token: Some(format!("static-{}", now.and_utc().timestamp_millis())),
        })
    }
}

fn out_of_range(anchor: NaiveDate) -> FetchError {
    FetchError::invalid_request(format!("week of {} is out of the supported date range", anchor))
}

/// Weekend columns (Sunday, Saturday) are mostly closed; weekdays mix all
/// three statuses.
fn draw_status(rng: &mut impl Rng, day_index: usize) -> SlotStatus {
    let draw: f64 = rng.random();
    if day_index == 0 || day_index == 6 {
        if draw < 0.3 {
            SlotStatus::Available
        } else {
            SlotStatus::Unavailable
        }
    } else if draw < 0.5 {
        SlotStatus::Available
    } else if draw < 0.7 {
        SlotStatus::Reserved
    } else {
        SlotStatus::Unavailable
    }
}

impl DataProvider for StaticDataProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn fetch_slots(&self, params: FetchSlotsParams) -> BoxFuture<'_, ProviderResult<CalendarData>> {
        Box::pin(async move {
            if !self.config.delay.is_zero() {
                tokio::time::sleep(self.config.delay).await;
            }

            if let Some(data) = self.custom_data() {
                debug!("returning custom calendar data");
                return Ok(data);
            }

            self.generate(&params).map_err(|e| e.with_provider(PROVIDER_NAME))
        })
    }
}
