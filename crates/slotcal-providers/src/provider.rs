//! DataProvider trait definition.
//!
//! A [`DataProvider`] turns "shop, anchor date, optional filters" into one
//! week of [`CalendarData`]. Implementations either resolve with a complete
//! week or fail; they never hand back partial data.

use std::future::Future;
use std::pin::Pin;

use chrono::{Datelike, NaiveDate};
use slotcal_core::CalendarData;

use crate::error::{FetchError, FetchErrorKind, ProviderResult};

/// A boxed future for async trait methods.
///
/// Boxing keeps the trait object-safe so the calendar can hold an
/// `Arc<dyn DataProvider>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Parameters of one week request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSlotsParams {
    pub shop_id: u64,
    /// Anchor date of the requested week.
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Menu items the booking is for; empty means no filter.
    pub menu_item_ids: Option<Vec<u64>>,
    /// Staff filter; `None` and `Some(0)` both mean any staff.
    pub staff_id: Option<u64>,
    /// Reservation being edited, if any.
    pub reservation_id: Option<u64>,
}

impl FetchSlotsParams {
    /// Creates parameters for the week anchored at `date`.
    pub fn new(shop_id: u64, date: NaiveDate) -> Self {
        Self {
            shop_id,
            year: date.year(),
            month: date.month(),
            day: date.day(),
            menu_item_ids: None,
            staff_id: None,
            reservation_id: None,
        }
    }

    /// Builder method to set the menu item filter.
    pub fn with_menu_item_ids(mut self, ids: Vec<u64>) -> Self {
        self.menu_item_ids = Some(ids);
        self
    }

    /// Builder method to set the staff filter.
    pub fn with_staff_id(mut self, staff_id: Option<u64>) -> Self {
        self.staff_id = staff_id;
        self
    }

    /// Builder method to set the reservation being edited.
    pub fn with_reservation_id(mut self, reservation_id: Option<u64>) -> Self {
        self.reservation_id = reservation_id;
        self
    }

    /// Returns the anchor date, if the fields form a valid date.
    pub fn anchor_date(&self) -> ProviderResult<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or_else(|| {
            FetchError::invalid_request(format!(
                "invalid anchor date {}-{}-{}",
                self.year, self.month, self.day
            ))
        })
    }

    /// Staff filter with zero treated as absent.
    pub fn effective_staff_id(&self) -> Option<u64> {
        self.staff_id.filter(|id| *id != 0)
    }

    /// Reservation id with zero treated as absent.
    pub fn effective_reservation_id(&self) -> Option<u64> {
        self.reservation_id.filter(|id| *id != 0)
    }

    /// Query parameters in wire order.
    ///
    /// Optional filters are omitted entirely when absent: the backend reads a
    /// missing key as "no filter", whereas an explicit zero would be ambiguous.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("shopId", self.shop_id.to_string()),
            ("year", self.year.to_string()),
            ("month", self.month.to_string()),
            ("day", self.day.to_string()),
        ];

        if let Some(ids) = self.menu_item_ids.as_ref().filter(|ids| !ids.is_empty())
            && let Ok(encoded) = serde_json::to_string(ids)
        {
            pairs.push(("menuItemIds", encoded));
        }
        if let Some(staff_id) = self.effective_staff_id() {
            pairs.push(("staffId", staff_id.to_string()));
        }
        if let Some(reservation_id) = self.effective_reservation_id() {
            pairs.push(("reservationId", reservation_id.to_string()));
        }

        pairs
    }
}

/// Source of calendar weeks.
///
/// # Example Implementation
///
/// ```ignore
/// struct FixedProvider(CalendarData);
///
/// impl DataProvider for FixedProvider {
///     fn name(&self) -> &str { "fixed" }
///
///     fn fetch_slots(&self, _params: FetchSlotsParams) -> BoxFuture<'_, ProviderResult<CalendarData>> {
///         let data = self.0.clone();
///         Box::pin(async move { Ok(data) })
///     }
/// }
/// ```
pub trait DataProvider: Send + Sync {
    /// Returns the name of this provider (e.g., "api", "static").
    fn name(&self) -> &str;

    /// Fetches the week described by `params`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] on transport failures, non-success statuses
    /// and undecodable responses. No retry is attempted.
    fn fetch_slots(&self, params: FetchSlotsParams) -> BoxFuture<'_, ProviderResult<CalendarData>>;
}

/// A provider that always fails.
///
/// Useful in tests and as a placeholder when a real provider fails to
/// initialize.
#[derive(Debug, Clone)]
pub struct ErrorProvider {
    name: String,
    kind: FetchErrorKind,
    message: String,
}

impl ErrorProvider {
    /// Creates a provider failing with `kind` and `message`.
    pub fn new(name: impl Into<String>, kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            message: message.into(),
        }
    }
}

impl DataProvider for ErrorProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_slots(&self, _params: FetchSlotsParams) -> BoxFuture<'_, ProviderResult<CalendarData>> {
        let error = FetchError::new(self.kind, &self.message).with_provider(&self.name);
        Box::pin(async move { Err(error) })
    }
}
