//! Calendar state for a booking widget.
//!
//! [`SlotCalendar`] owns the displayed week, the loading flag and the last
//! error, and drives a [`DataProvider`] to refresh them. Navigation only moves
//! the current date; the host decides when to call [`SlotCalendar::load`].
//!
//! Every load is tagged with a generation number. A completion that is not
//! the latest issued is discarded, so the displayed week always matches the
//! most recent request even if responses arrive out of order.

use std::fmt;
use std::sync::Arc;

use chrono::{FixedOffset, Local, NaiveDate, Offset};
use serde::{Deserialize, Serialize};
use slotcal_core::{ActivationContext, CalendarData, SlotSelection, activate_slot, add_days};
use slotcal_providers::api::{ApiConfig, ApiDataProvider};
use slotcal_providers::{
    DataProvider, ErrorProvider, FetchErrorKind, FetchSlotsParams, ProviderResult,
};
use tracing::{debug, warn};

/// Observer called with `true` when a load starts and `false` when it ends.
///
/// A superseded load reports no `false` of its own. When loads overlap the
/// observer sees one `true` per load and a single `false`, sent once the
/// latest load completes.
pub type LoadingObserver = Box<dyn Fn(bool) + Send + Sync>;

/// Callback receiving the slot the user picked.
pub type SelectionHandler = Box<dyn Fn(&SlotSelection) + Send + Sync>;

/// Coarse lifecycle phase derived from [`CalendarState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// What happens to the displayed week when a load fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Keep showing the previous week next to the error.
    #[default]
    #[serde(rename = "keep", alias = "keep_data")]
    KeepData,
    /// Drop the previous week.
    #[serde(rename = "clear", alias = "clear_data")]
    ClearData,
}

impl FailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeepData => "keep",
            Self::ClearData => "clear",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keep" | "keep_data" => Ok(Self::KeepData),
            "clear" | "clear_data" => Ok(Self::ClearData),
            _ => Err(format!("unknown failure policy: {}", s)),
        }
    }
}

/// Observable state of the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarState {
    /// Anchor of the week being shown or requested.
    pub current_date: NaiveDate,
    pub calendar_data: Option<CalendarData>,
    pub is_loading: bool,
    /// Message of the last failed load, cleared when a new load starts.
    pub error: Option<String>,
    pub error_kind: Option<FetchErrorKind>,
}

impl CalendarState {
    /// Creates an idle state anchored at `current_date`.
    pub fn new(current_date: NaiveDate) -> Self {
        Self {
            current_date,
            calendar_data: None,
            is_loading: false,
            error: None,
            error_kind: None,
        }
    }

    pub fn phase(&self) -> LoadPhase {
        if self.is_loading {
            LoadPhase::Loading
        } else if self.error.is_some() {
            LoadPhase::Failed
        } else if self.calendar_data.is_some() {
            LoadPhase::Loaded
        } else {
            LoadPhase::Idle
        }
    }
}

/// Filters of a load, everything except the date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotQuery {
    pub shop_id: u64,
    pub menu_item_ids: Vec<u64>,
    pub staff_id: Option<u64>,
    /// Whether the user picked a specific staff member.
    pub is_staff_selected: bool,
    pub reservation_id: Option<u64>,
}

impl SlotQuery {
    pub fn new(shop_id: u64) -> Self {
        Self {
            shop_id,
            ..Default::default()
        }
    }

    pub fn with_menu_item_ids(mut self, ids: Vec<u64>) -> Self {
        self.menu_item_ids = ids;
        self
    }

    /// Filters by staff and marks the staff as explicitly selected.
    pub fn with_staff(mut self, staff_id: u64) -> Self {
        self.staff_id = Some(staff_id);
        self.is_staff_selected = true;
        self
    }

    pub fn with_staff_id(mut self, staff_id: Option<u64>) -> Self {
        self.staff_id = staff_id;
        self
    }

    pub fn with_staff_selected(mut self, selected: bool) -> Self {
        self.is_staff_selected = selected;
        self
    }

    pub fn with_reservation_id(mut self, reservation_id: Option<u64>) -> Self {
        self.reservation_id = reservation_id;
        self
    }

    /// Builds provider parameters for the week anchored at `date`.
    pub fn to_params(&self, date: NaiveDate) -> FetchSlotsParams {
        FetchSlotsParams::new(self.shop_id, date)
            .with_menu_item_ids(self.menu_item_ids.clone())
            .with_staff_id(self.staff_id)
            .with_reservation_id(self.reservation_id)
    }
}

/// Identifies one started load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub params: FetchSlotsParams,
}

/// A started load whose fetch has not run yet.
///
/// Holds its own handle to the provider, so several pending loads can be in
/// flight while the calendar stays borrowable.
pub struct PendingLoad {
    ticket: LoadTicket,
    provider: Arc<dyn DataProvider>,
}

impl PendingLoad {
    pub fn ticket(&self) -> &LoadTicket {
        &self.ticket
    }

    /// Runs the fetch.
    pub async fn fetch(self) -> CompletedLoad {
        let result = self.provider.fetch_slots(self.ticket.params.clone()).await;
        CompletedLoad {
            ticket: self.ticket,
            result,
        }
    }
}

impl fmt::Debug for PendingLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingLoad")
            .field("ticket", &self.ticket)
            .field("provider", &self.provider.name())
            .finish()
    }
}

/// A finished fetch, ready to be applied.
#[derive(Debug)]
pub struct CompletedLoad {
    pub ticket: LoadTicket,
    pub result: ProviderResult<CalendarData>,
}

/// Result of applying a completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed,
    /// A newer load was started; the result was dropped.
    Superseded,
}

/// Stateful calendar driving a [`DataProvider`].
pub struct SlotCalendar {
    provider: Arc<dyn DataProvider>,
    state: CalendarState,
    on_loading_change: Option<LoadingObserver>,
    on_select: Option<SelectionHandler>,
    failure_policy: FailurePolicy,
    generation: u64,
    disabled: bool,
    is_staff_selected: bool,
    utc_offset: FixedOffset,
}

impl SlotCalendar {
    /// Returns a builder with the remote provider as default.
    pub fn builder() -> SlotCalendarBuilder {
        SlotCalendarBuilder::default()
    }

    /// Creates a calendar for `provider` anchored at today.
    pub fn with_provider(provider: Arc<dyn DataProvider>) -> Self {
        Self::builder().provider(provider).build()
    }

    pub fn state(&self) -> &CalendarState {
        &self.state
    }

    pub fn current_date(&self) -> NaiveDate {
        self.state.current_date
    }

    pub fn provider(&self) -> &Arc<dyn DataProvider> {
        &self.provider
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Disables or enables slot activation.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Registers the loading observer, replacing any previous one.
    pub fn set_loading_observer(&mut self, observer: impl Fn(bool) + Send + Sync + 'static) {
        self.on_loading_change = Some(Box::new(observer));
    }

    /// Registers the selection callback, replacing any previous one.
    pub fn set_selection_handler(
        &mut self,
        handler: impl Fn(&SlotSelection) + Send + Sync + 'static,
    ) {
        self.on_select = Some(Box::new(handler));
    }

    /// Moves one week back. Does not fetch.
    ///
    /// Returns `false` and keeps the current date at the start of the date
    /// range.
    pub fn navigate_prev(&mut self) -> bool {
        self.navigate_weeks(-1)
    }

    /// Moves one week forward. Does not fetch.
    ///
    /// Returns `false` and keeps the current date at the end of the date
    /// range.
    pub fn navigate_next(&mut self) -> bool {
        self.navigate_weeks(1)
    }

    /// Moves `weeks` weeks (negative moves back). Does not fetch.
    ///
    /// Returns `false` and leaves the current date untouched when the target
    /// is not a representable date.
    pub fn navigate_weeks(&mut self, weeks: i64) -> bool {
        let Some(target) = weeks
            .checked_mul(7)
            .and_then(|days| add_days(self.state.current_date, days))
        else {
            warn!(
                current_date = %self.state.current_date,
                weeks,
                "navigation target is out of range"
            );
            return false;
        };
        self.state.current_date = target;
        debug!(current_date = %self.state.current_date, weeks, "navigated");
        true
    }

    /// Jumps to `date`. Does not fetch.
    pub fn set_current_date(&mut self, date: NaiveDate) {
        self.state.current_date = date;
    }

    /// Whether the loaded week allows paging back.
    pub fn can_navigate_prev(&self) -> bool {
        self.state.calendar_data.as_ref().is_some_and(|data| data.has_prev)
    }

    /// Whether the loaded week allows paging forward.
    pub fn can_navigate_next(&self) -> bool {
        self.state.calendar_data.as_ref().is_some_and(|data| data.has_next)
    }

    /// Loads the week of the current date and applies the result.
    pub async fn load(&mut self, query: &SlotQuery) -> LoadOutcome {
        let pending = self.begin_load(query);
        let completed = pending.fetch().await;
        self.complete_load(completed)
    }

    /// Enters the loading state and returns the fetch to run.
    pub fn begin_load(&mut self, query: &SlotQuery) -> PendingLoad {
        self.generation += 1;
        self.is_staff_selected = query.is_staff_selected;
        self.state.is_loading = true;
        self.state.error = None;
        self.state.error_kind = None;
        self.notify_loading(true);

        let ticket = LoadTicket {
            generation: self.generation,
            params: query.to_params(self.state.current_date),
        };
        debug!(
            generation = ticket.generation,
            provider = self.provider.name(),
            date = %self.state.current_date,
            "load started"
        );

        PendingLoad {
            ticket,
            provider: Arc::clone(&self.provider),
        }
    }

    /// Applies a finished fetch unless a newer load has been started.
    pub fn complete_load(&mut self, completed: CompletedLoad) -> LoadOutcome {
        let generation = completed.ticket.generation;
        if generation != self.generation {
            debug!(generation, latest = self.generation, "discarding superseded load");
            return LoadOutcome::Superseded;
        }

        self.state.is_loading = false;
        let outcome = match completed.result {
            Ok(data) => {
                self.state.calendar_data = Some(data);
                LoadOutcome::Loaded
            }
            Err(e) => {
                warn!(generation, kind = %e.kind(), error = %e, "load failed");
                self.state.error = Some(e.message().to_string());
                self.state.error_kind = Some(e.kind());
                if self.failure_policy == FailurePolicy::ClearData {
                    self.state.calendar_data = None;
                }
                LoadOutcome::Failed
            }
        };
        self.notify_loading(false);
        outcome
    }

    /// Activates a cell of the loaded week.
    ///
    /// Calls the selection handler and returns the selection when the slot is
    /// available and the calendar is enabled.
    pub fn activate(&self, day_index: usize, slot_index: usize) -> Option<SlotSelection> {
        let data = self.state.calendar_data.as_ref()?;
        let ctx = ActivationContext::default()
            .with_disabled(self.disabled)
            .with_staff_selected(self.is_staff_selected);
        let selection = activate_slot(data, day_index, slot_index, ctx, &self.utc_offset)?;
        if let Some(handler) = &self.on_select {
            handler(&selection);
        }
        Some(selection)
    }

    fn notify_loading(&self, is_loading: bool) {
        if let Some(observer) = &self.on_loading_change {
            observer(is_loading);
        }
    }
}

impl fmt::Debug for SlotCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotCalendar")
            .field("provider", &self.provider.name())
            .field("state", &self.state)
            .field("failure_policy", &self.failure_policy)
            .field("generation", &self.generation)
            .field("disabled", &self.disabled)
            .field("utc_offset", &self.utc_offset)
            .finish_non_exhaustive()
    }
}

/// Builder for [`SlotCalendar`].
#[derive(Default)]
pub struct SlotCalendarBuilder {
    provider: Option<Arc<dyn DataProvider>>,
    initial_date: Option<NaiveDate>,
    failure_policy: FailurePolicy,
    utc_offset: Option<FixedOffset>,
    disabled: bool,
    on_loading_change: Option<LoadingObserver>,
    on_select: Option<SelectionHandler>,
}

impl SlotCalendarBuilder {
    pub fn provider(mut self, provider: Arc<dyn DataProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Sets the starting date; defaults to today.
    pub fn initial_date(mut self, date: NaiveDate) -> Self {
        self.initial_date = Some(date);
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Sets the offset slot times are interpreted in; defaults to the local one.
    pub fn utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = Some(offset);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn on_loading_change(mut self, observer: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.on_loading_change = Some(Box::new(observer));
        self
    }

    pub fn on_select(mut self, handler: impl Fn(&SlotSelection) + Send + Sync + 'static) -> Self {
        self.on_select = Some(Box::new(handler));
        self
    }

    pub fn build(self) -> SlotCalendar {
        let now = Local::now();
        let provider = self.provider.unwrap_or_else(default_provider);
        SlotCalendar {
            provider,
            state: CalendarState::new(self.initial_date.unwrap_or_else(|| now.date_naive())),
            on_loading_change: self.on_loading_change,
            on_select: self.on_select,
            failure_policy: self.failure_policy,
            generation: 0,
            disabled: self.disabled,
            is_staff_selected: false,
            utc_offset: self.utc_offset.unwrap_or_else(|| now.offset().fix()),
        }
    }
}

fn default_provider() -> Arc<dyn DataProvider> {
    match ApiDataProvider::new(ApiConfig::default()) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            warn!(error = %e, "failed to create API provider");
            Arc::new(ErrorProvider::new("api", e.kind(), e.message()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use chrono::{Datelike, NaiveDateTime};
    use slotcal_core::{CalendarDay, SlotStatus, TimeSlot, WEEKDAYS_JA, start_of_week};
    use slotcal_providers::synthetic::{StaticConfig, StaticDataProvider};
    use slotcal_providers::{BoxFuture, FetchError};

    use super::*;

    /// Provider replaying queued results and recording requests.
    #[derive(Default)]
    struct ScriptedProvider {
        results: Mutex<VecDeque<ProviderResult<CalendarData>>>,
        requests: Mutex<Vec<FetchSlotsParams>>,
    }

    impl ScriptedProvider {
        fn new(results: Vec<ProviderResult<CalendarData>>) -> Arc<Self> {
            Arc::new(Self {
                results: Mutex::new(results.into()),
                requests: Mutex::default(),
            })
        }

        fn requests(&self) -> Vec<FetchSlotsParams> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl DataProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn fetch_slots(
            &self,
            params: FetchSlotsParams,
        ) -> BoxFuture<'_, ProviderResult<CalendarData>> {
            self.requests.lock().unwrap().push(params);
            let result = self
                .results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::transport("no scripted result")));
            Box::pin(async move { result })
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn week(anchor: NaiveDate, status: SlotStatus) -> CalendarData {
        let start = start_of_week(anchor);
        let days = (0..7)
            .map(|i| {
                let day = add_days(start, i).unwrap();
                let slot_start = day.and_hms_opt(9, 0, 0).unwrap();
                CalendarDay {
                    year: day.year(),
                    month: day.month(),
                    day: day.day(),
                    weekday: WEEKDAYS_JA[i as usize].to_string(),
                    slots: vec![TimeSlot {
                        start_time: slot_start,
                        end_time: slot_start + chrono::Duration::minutes(30),
                        status,
                        staff_id: Some(7),
                    }],
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
            sync_token: Some("tok".to_string()),
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<bool>>>, impl Fn(bool) + Send + Sync + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |v| sink.lock().unwrap().push(v))
    }

    fn calendar(provider: Arc<dyn DataProvider>) -> SlotCalendar {
        SlotCalendar::builder()
            .provider(provider)
            .initial_date(date(2024, 8, 19))
            .utc_offset(FixedOffset::east_opt(0).unwrap())
            .build()
    }

    #[tokio::test]
    async fn successful_load_notifies_true_then_false() {
        let provider = ScriptedProvider::new(vec![Ok(week(date(2024, 8, 19), SlotStatus::Available))]);
        let (calls, observer) = recorder();
        let mut calendar = calendar(provider.clone());
        calendar.set_loading_observer(observer);

        let outcome = calendar.load(&SlotQuery::new(123)).await;

        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(*calls.lock().unwrap(), vec![true, false]);
        assert_eq!(calendar.state().phase(), LoadPhase::Loaded);
        assert!(calendar.state().error.is_none());
        assert!(calendar.can_navigate_next());
        assert!(!calendar.can_navigate_prev());
    }

    #[tokio::test]
    async fn load_passes_current_date_and_filters() {
        let provider = ScriptedProvider::new(vec![Ok(week(date(2024, 8, 19), SlotStatus::Available))]);
        let mut calendar = calendar(provider.clone());

        let query = SlotQuery::new(123)
            .with_menu_item_ids(vec![1, 2])
            .with_staff(456)
            .with_reservation_id(Some(789));
        calendar.load(&query).await;

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let params = &requests[0];
        assert_eq!((params.year, params.month, params.day), (2024, 8, 19));
        assert_eq!(params.shop_id, 123);
        assert_eq!(params.menu_item_ids, Some(vec![1, 2]));
        assert_eq!(params.staff_id, Some(456));
        assert_eq!(params.reservation_id, Some(789));
    }

    #[tokio::test]
    async fn failure_keeps_previous_week_by_default() {
        let provider = ScriptedProvider::new(vec![
            Ok(week(date(2024, 8, 19), SlotStatus::Available)),
            Err(FetchError::http_status(500, "Internal Server Error")),
        ]);
        let (calls, observer) = recorder();
        let mut calendar = calendar(provider);
        calendar.load(&SlotQuery::new(1)).await;
        calendar.set_loading_observer(observer);

        let outcome = calendar.load(&SlotQuery::new(1)).await;

        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(*calls.lock().unwrap(), vec![true, false]);
        let state = calendar.state();
        assert_eq!(state.phase(), LoadPhase::Failed);
        assert_eq!(state.error.as_deref(), Some("API request failed: 500 Internal Server Error"));
        assert_eq!(state.error_kind, Some(FetchErrorKind::HttpStatus));
        assert!(state.calendar_data.is_some());
    }

    #[tokio::test]
    async fn failure_clears_week_with_clear_policy() {
        let provider = ScriptedProvider::new(vec![
            Ok(week(date(2024, 8, 19), SlotStatus::Available)),
            Err(FetchError::transport("Network error")),
        ]);
        let mut calendar = SlotCalendar::builder()
            .provider(provider)
            .initial_date(date(2024, 8, 19))
            .failure_policy(FailurePolicy::ClearData)
            .build();
        calendar.load(&SlotQuery::new(1)).await;
        calendar.load(&SlotQuery::new(1)).await;

        assert_eq!(calendar.state().error.as_deref(), Some("Network error"));
        assert!(calendar.state().calendar_data.is_none());
    }

    #[tokio::test]
    async fn new_load_clears_previous_error() {
        let provider = ScriptedProvider::new(vec![
            Err(FetchError::transport("Network error")),
            Ok(week(date(2024, 8, 19), SlotStatus::Available)),
        ]);
        let mut calendar = calendar(provider);
        calendar.load(&SlotQuery::new(1)).await;
        assert_eq!(calendar.state().phase(), LoadPhase::Failed);

        let _pending = calendar.begin_load(&SlotQuery::new(1));
        assert_eq!(calendar.state().phase(), LoadPhase::Loading);
        assert!(calendar.state().error.is_none());
        assert!(calendar.state().error_kind.is_none());
    }

    #[tokio::test]
    async fn stale_completion_is_discarded() {
        let provider = Arc::new(StaticDataProvider::new(
            StaticConfig::default()
                .with_seed(7)
                .with_now(NaiveDateTime::parse_from_str("2024-01-01 00:00", "%Y-%m-%d %H:%M").unwrap()),
        ));
        let (calls, observer) = recorder();
        let mut calendar = calendar(provider);
        calendar.set_loading_observer(observer);

        let first = calendar.begin_load(&SlotQuery::new(1));
        calendar.navigate_next();
        let second = calendar.begin_load(&SlotQuery::new(1));
        assert!(second.ticket().generation > first.ticket().generation);

        let second_done = second.fetch().await;
        let first_done = first.fetch().await;

        assert_eq!(calendar.complete_load(second_done), LoadOutcome::Loaded);
        assert_eq!(calendar.complete_load(first_done), LoadOutcome::Superseded);

        let data = calendar.state().calendar_data.as_ref().unwrap();
        assert_eq!(data.days[0].day, 25);
        assert!(!calendar.state().is_loading);
        assert_eq!(*calls.lock().unwrap(), vec![true, true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn loading_flag_is_set_while_fetch_is_pending() {
        let provider = Arc::new(StaticDataProvider::new(
            StaticConfig::default().with_delay(Duration::from_millis(500)),
        ));
        let mut calendar = calendar(provider);

        let pending = calendar.begin_load(&SlotQuery::new(1));
        assert!(calendar.state().is_loading);
        let completed = pending.fetch().await;
        calendar.complete_load(completed);
        assert!(!calendar.state().is_loading);
        assert_eq!(calendar.state().phase(), LoadPhase::Loaded);
    }

    #[test]
    fn navigation_round_trip_does_not_fetch() {
        let provider = ScriptedProvider::new(Vec::new());
        let mut calendar = calendar(provider.clone());

        assert!(calendar.navigate_next());
        assert_eq!(calendar.current_date(), date(2024, 8, 26));
        assert!(calendar.navigate_prev());
        assert!(calendar.navigate_prev());
        assert_eq!(calendar.current_date(), date(2024, 8, 12));
        assert!(calendar.navigate_weeks(3));
        assert_eq!(calendar.current_date(), date(2024, 9, 2));
        calendar.set_current_date(date(2025, 1, 1));
        assert_eq!(calendar.current_date(), date(2025, 1, 1));

        assert!(provider.requests().is_empty());
        assert_eq!(calendar.state().phase(), LoadPhase::Idle);
    }

    #[test]
    fn navigation_stops_at_the_ends_of_the_date_range() {
        let mut calendar = calendar(ScriptedProvider::new(Vec::new()));

        calendar.set_current_date(NaiveDate::MAX);
        assert!(!calendar.navigate_next());
        assert_eq!(calendar.current_date(), NaiveDate::MAX);

        calendar.set_current_date(NaiveDate::MIN);
        assert!(!calendar.navigate_prev());
        assert_eq!(calendar.current_date(), NaiveDate::MIN);

        calendar.set_current_date(date(2024, 8, 19));
        assert!(!calendar.navigate_weeks(i64::MAX));
        assert!(!calendar.navigate_weeks(2_000_000_000));
        assert_eq!(calendar.current_date(), date(2024, 8, 19));
    }

    async fn loaded_with_selections(status: SlotStatus) -> (SlotCalendar, Arc<Mutex<Vec<SlotSelection>>>) {
        let provider = ScriptedProvider::new(vec![Ok(week(date(2024, 8, 19), status))]);
        let selections = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&selections);
        let mut calendar = calendar(provider);
        calendar.set_selection_handler(move |s| sink.lock().unwrap().push(s.clone()));
        calendar.load(&SlotQuery::new(1).with_staff(7)).await;
        (calendar, selections)
    }

    #[tokio::test]
    async fn activating_available_slot_reports_selection_once() {
        let (calendar, selections) = loaded_with_selections(SlotStatus::Available).await;

        let selection = calendar.activate(1, 0).unwrap();

        assert_eq!(selection.start_at, "2024-08-19T09:00:00.000Z");
        assert_eq!(selection.staff.id, 7);
        assert_eq!(selection.staff.name_display, "Selected Staff");
        assert_eq!(selection.sync_token, "tok");
        assert_eq!(*selections.lock().unwrap(), vec![selection]);
    }

    #[tokio::test]
    async fn activating_unbookable_slots_is_a_no_op() {
        for status in [SlotStatus::Reserved, SlotStatus::Unavailable] {
            let (calendar, selections) = loaded_with_selections(status).await;
            assert!(calendar.activate(1, 0).is_none());
            assert!(selections.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn disabled_calendar_ignores_activation() {
        let (mut calendar, selections) = loaded_with_selections(SlotStatus::Available).await;
        calendar.set_disabled(true);
        assert!(calendar.activate(1, 0).is_none());
        assert!(calendar.activate(1, 5).is_none());
        assert!(selections.lock().unwrap().is_empty());
    }

    #[test]
    fn failure_policy_parses() {
        assert_eq!("keep".parse::<FailurePolicy>().unwrap(), FailurePolicy::KeepData);
        assert_eq!("CLEAR".parse::<FailurePolicy>().unwrap(), FailurePolicy::ClearData);
        assert!("drop".parse::<FailurePolicy>().is_err());
    }
}
