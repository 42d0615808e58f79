//! DataProvider trait and implementations.
//!
//! - [`DataProvider`] - The capability the calendar state drives
//! - [`FetchSlotsParams`] - Shop, anchor date and optional filters of one request
//! - [`FetchError`] - Failure with a message and a [`FetchErrorKind`]
//! - [`api::ApiDataProvider`] - Fetches weeks from the booking backend
//! - [`synthetic::StaticDataProvider`] - Generates weeks locally
//!
//! # Example
//!
//! ```ignore
//! use slotcal_providers::{DataProvider, FetchSlotsParams};
//!
//! async fn week(provider: &dyn DataProvider, today: NaiveDate) -> ProviderResult<CalendarData> {
//!     provider.fetch_slots(FetchSlotsParams::new(123, today)).await
//! }
//! ```

#[cfg(feature = "api")]
pub mod api;
pub mod error;
pub mod provider;
#[cfg(feature = "synthetic")]
pub mod synthetic;

pub use error::{FetchError, FetchErrorKind, ProviderResult};
pub use provider::{BoxFuture, DataProvider, ErrorProvider, FetchSlotsParams};
