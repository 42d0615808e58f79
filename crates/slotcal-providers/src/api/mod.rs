//! HTTP API data provider.
//!
//! # Example
//!
//! ```ignore
//! use slotcal_providers::api::{ApiConfig, ApiDataProvider};
//!
//! let config = ApiConfig::new("https://shop.example.com/")?
//!     .with_header("Authorization", "Bearer token");
//! let provider = ApiDataProvider::new(config)?;
//! let week = provider.fetch_slots(FetchSlotsParams::new(123, today)).await?;
//! ```

mod config;
mod provider;

pub use config::ApiConfig;
pub use provider::ApiDataProvider;
