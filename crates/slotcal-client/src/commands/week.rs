//! Week view command.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;
use slotcal_core::{CalendarData, DateLocale, SlotSelection, WeekGrid, format_date_time};
use slotcal_providers::FetchError;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::state::{CalendarState, SlotCalendar};

/// Options of the week view.
#[derive(Debug, Clone, Default)]
pub struct WeekOptions {
    /// Date inside the first week to show; today if unset.
    pub date: Option<NaiveDate>,
    /// Weeks to navigate before loading.
    pub weeks_ahead: i32,
    /// Cell to activate after loading.
    pub select: Option<(usize, usize)>,
    pub locale: DateLocale,
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WeekReport<'a> {
    current_date: NaiveDate,
    calendar_data: Option<&'a CalendarData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selection: Option<&'a SlotSelection>,
}

/// Creates the calendar described by `config`, moved to the requested week.
pub fn build_calendar(config: &ClientConfig, options: &WeekOptions) -> ClientResult<SlotCalendar> {
    let provider = config
        .build_provider()
        .map_err(|e| ClientError::Config(e.to_string()))?;

    let mut builder = SlotCalendar::builder()
        .provider(provider)
        .failure_policy(config.calendar.failure_policy)
        .on_loading_change(|is_loading| debug!(is_loading, "loading state changed"))
        .on_select(|selection| {
            info!(
                start_at = %selection.start_at,
                staff_id = selection.staff.id,
                "slot selected"
            )
        });
    if let Some(offset) = config
        .calendar
        .utc_offset()
        .map_err(|e| ClientError::Config(e.to_string()))?
    {
        builder = builder.utc_offset(offset);
    }
    if let Some(date) = options.date {
        builder = builder.initial_date(date);
    }

    let mut calendar = builder.build();
    if !calendar.navigate_weeks(i64::from(options.weeks_ahead)) {
        return Err(ClientError::Usage(format!(
            "cannot move {} weeks from {}",
            options.weeks_ahead,
            calendar.current_date()
        )));
    }
    Ok(calendar)
}

/// Loads the week and activates the requested cell, if any.
pub async fn load_week(
    config: &ClientConfig,
    options: &WeekOptions,
) -> ClientResult<(SlotCalendar, Option<SlotSelection>)> {
    let mut calendar = build_calendar(config, options)?;
    calendar.load(&config.calendar.query()).await;

    let state = calendar.state();
    if state.calendar_data.is_none()
        && let (Some(message), Some(kind)) = (&state.error, state.error_kind)
    {
        return Err(ClientError::Provider(FetchError::new(kind, message)));
    }

    let selection = match options.select {
        Some((day, slot)) => Some(
            calendar
                .activate(day, slot)
                .ok_or_else(|| {
                    ClientError::Usage(format!("slot {}:{} is not bookable", day, slot))
                })?,
        ),
        None => None,
    };
    Ok((calendar, selection))
}

/// Renders the loaded state as text.
pub fn render_text(
    state: &CalendarState,
    selection: Option<&SlotSelection>,
    select: Option<(usize, usize)>,
    locale: DateLocale,
) -> String {
    let grid = match &state.calendar_data {
        Some(data) => WeekGrid::from_data(data),
        None => WeekGrid::skeleton(state.current_date),
    };
    let mut out = grid.render();
    out.push('\n');

    if let Some(data) = &state.calendar_data {
        let prev = if data.has_prev { "< prev" } else { "      " };
        let next = if data.has_next { "next >" } else { "" };
        let _ = writeln!(out, "{}  {}", prev, next);
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "error: {}", error);
    }
    if let (Some(selection), Some((day, slot)), Some(data)) =
        (selection, select, &state.calendar_data)
        && let Some(start) = data.slot_start_for(day, slot)
    {
        let _ = writeln!(
            out,
            "selected: {} ({}, sync token {})",
            format_date_time(start, locale),
            selection.staff.name_display,
            if selection.sync_token.is_empty() { "-" } else { &selection.sync_token }
        );
    }
    out
}

/// Renders the loaded state as JSON.
pub fn render_json(state: &CalendarState, selection: Option<&SlotSelection>) -> ClientResult<String> {
    let report = WeekReport {
        current_date: state.current_date,
        calendar_data: state.calendar_data.as_ref(),
        error: state.error.as_deref(),
        error_kind: state.error_kind.map(|kind| kind.as_str()),
        selection,
    };
    serde_json::to_string_pretty(&report).map_err(|e| ClientError::Output(e.to_string()))
}

/// Shows one week.
pub async fn show(config: &ClientConfig, options: &WeekOptions) -> ClientResult<()> {
    let (calendar, selection) = load_week(config, options).await?;
    let state = calendar.state();
    if options.json {
        println!("{}", render_json(state, selection.as_ref())?);
    } else {
        print!(
            "{}",
            render_text(state, selection.as_ref(), options.select, options.locale)
        );
    }
    Ok(())
}
