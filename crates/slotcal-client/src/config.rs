//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/slotcal/config.toml` by default:
//!
//! ```toml
//! provider = "api"
//!
//! [api]
//! base_url = "https://shop.example.com"
//! endpoint = "/api/slots"
//!
//! [api.headers]
//! Authorization = "env::SLOTCAL_TOKEN"
//!
//! [static_data]
//! delay_ms = 300
//! seed = 42
//!
//! [calendar]
//! shop_id = 123
//! menu_item_ids = [1, 2]
//! failure_policy = "keep"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use slotcal_core::CalendarData;
use slotcal_providers::DataProvider;
use slotcal_providers::api::{ApiConfig, ApiDataProvider};
use slotcal_providers::synthetic::{StaticConfig, StaticDataProvider};
use thiserror::Error;

use crate::secret;
use crate::state::{FailurePolicy, SlotQuery};

/// Errors raised while loading or applying the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid custom data in {}: {source}", path.display())]
    CustomData {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value: {0}")]
    Invalid(String),

    #[error("secret resolution failed: {0}")]
    Secret(String),

    #[error("provider configuration: {0}")]
    Provider(#[from] slotcal_providers::FetchError),
}

/// Which data provider the client uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// The booking backend over HTTP.
    #[default]
    Api,
    /// Locally generated weeks.
    Static,
}

/// Configuration for the slotcal client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub provider: ProviderKind,

    /// Debug mode.
    pub debug: bool,

    pub api: ApiSettings,

    pub static_data: StaticSettings,

    pub calendar: CalendarSettings,
}

/// HTTP provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL that a relative endpoint is resolved against.
    pub base_url: Option<String>,

    pub endpoint: String,

    /// Extra request headers; values support `env::` and `pass::` references.
    pub headers: std::collections::BTreeMap<String, String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            endpoint: ApiConfig::DEFAULT_ENDPOINT.to_string(),
            headers: Default::default(),
            timeout_secs: ApiConfig::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiSettings {
    /// Converts to provider configuration, resolving header references.
    pub fn to_provider_config(&self) -> Result<ApiConfig, ConfigError> {
        let config = match &self.base_url {
            Some(base) => ApiConfig::new(base)
                .map_err(|e| ConfigError::Invalid(format!("base_url '{}': {}", base, e)))?,
            None => ApiConfig::default(),
        };

        let mut config = config
            .with_endpoint(&self.endpoint)
            .with_timeout(Duration::from_secs(self.timeout_secs));
        for (name, value) in &self.headers {
            config = config.with_header(name, secret::resolve(value)?);
        }
        Ok(config)
    }
}

/// Synthetic provider settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticSettings {
    /// Simulated latency in milliseconds.
    pub delay_ms: u64,

    /// Seed for reproducible weeks.
    pub seed: Option<u64>,

    /// Weeks after the current one that may be browsed.
    pub booking_horizon_weeks: Option<u32>,

    /// JSON file with a fixed week to serve instead of generated ones.
    pub custom_data_path: Option<PathBuf>,
}

impl StaticSettings {
    /// Converts to provider configuration.
    pub fn to_provider_config(&self) -> StaticConfig {
        let mut config = StaticConfig::default().with_delay(Duration::from_millis(self.delay_ms));
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(weeks) = self.booking_horizon_weeks {
            config = config.with_booking_horizon_weeks(weeks);
        }
        config
    }

    /// Reads the fixed week, if one is configured.
    pub fn custom_data(&self) -> Result<Option<CalendarData>, ConfigError> {
        let Some(path) = &self.custom_data_path else {
            return Ok(None);
        };
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::CustomData {
                path: path.clone(),
                source,
            })
    }
}

/// Default query and widget behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    pub shop_id: u64,

    pub menu_item_ids: Vec<u64>,

    /// Staff filter; setting it marks the staff as explicitly selected.
    pub staff_id: Option<u64>,

    /// Reservation being edited.
    pub reservation_id: Option<u64>,

    pub failure_policy: FailurePolicy,

    /// Offset of the shop's wall clock from UTC; the local offset if unset.
    pub utc_offset_minutes: Option<i32>,
}

impl CalendarSettings {
    /// Builds the load filters.
    pub fn query(&self) -> SlotQuery {
        SlotQuery::new(self.shop_id)
            .with_menu_item_ids(self.menu_item_ids.clone())
            .with_staff_id(self.staff_id)
            .with_staff_selected(self.staff_id.is_some_and(|id| id != 0))
            .with_reservation_id(self.reservation_id)
    }

    /// Resolves the configured UTC offset.
    pub fn utc_offset(&self) -> Result<Option<FixedOffset>, ConfigError> {
        self.utc_offset_minutes
            .map(|minutes| {
                minutes
                    .checked_mul(60)
                    .and_then(FixedOffset::east_opt)
                    .ok_or_else(|| {
                        ConfigError::Invalid(format!("utc_offset_minutes {} is out of range", minutes))
                    })
            })
            .transpose()
    }
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if it is absent.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("slotcal")
    }

    /// Checks everything that can be checked without network access.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.calendar.utc_offset()?;
        match self.provider {
            ProviderKind::Api => {
                let api = self.api.to_provider_config()?;
                api.endpoint_url()?;
            }
            ProviderKind::Static => {
                self.static_data.custom_data()?;
            }
        }
        Ok(())
    }

    /// Creates the configured provider.
    pub fn build_provider(&self) -> Result<Arc<dyn DataProvider>, ConfigError> {
        match self.provider {
            ProviderKind::Api => {
                let provider = ApiDataProvider::new(self.api.to_provider_config()?)?;
                Ok(Arc::new(provider))
            }
            ProviderKind::Static => {
                let config = self.static_data.to_provider_config();
                let provider = match self.static_data.custom_data()? {
                    Some(data) => StaticDataProvider::with_custom_data(config, data),
                    None => StaticDataProvider::new(config),
                };
                Ok(Arc::new(provider))
            }
        }
    }
}
