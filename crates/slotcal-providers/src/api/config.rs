//! HTTP API provider configuration.

use std::collections::BTreeMap;
use std::time::Duration;

use url::Url;

use crate::error::{FetchError, ProviderResult};
use crate::provider::FetchSlotsParams;

/// Configuration for the HTTP API provider.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL that relative endpoints are resolved against.
    pub base_url: Option<Url>,

    /// Slot endpoint, absolute or relative to `base_url`.
    pub endpoint: String,

    /// Extra request headers, sent after `Content-Type`.
    pub headers: BTreeMap<String, String>,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            headers: BTreeMap::new(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("slotcal/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiConfig {
    /// Default slot endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "/api/slots";

    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a configuration resolving the default endpoint against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Some(Url::parse(base_url.as_ref())?),
            ..Default::default()
        })
    }

    /// Sets the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Adds a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolves the endpoint to an absolute URL.
    pub fn endpoint_url(&self) -> ProviderResult<Url> {
        match Url::parse(&self.endpoint) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = self.base_url.as_ref().ok_or_else(|| {
                    FetchError::configuration(format!(
                        "endpoint '{}' is relative and no base URL is configured",
                        self.endpoint
                    ))
                })?;
                base.join(&self.endpoint).map_err(|e| {
                    FetchError::configuration(format!("invalid endpoint '{}': {}", self.endpoint, e))
                })
            }
            Err(e) => Err(FetchError::configuration(format!(
                "invalid endpoint '{}': {}",
                self.endpoint, e
            ))),
        }
    }

    /// Builds the full request URL for `params`.
    pub fn request_url(&self, params: &FetchSlotsParams) -> ProviderResult<Url> {
        let mut url = self.endpoint_url()?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params.to_query_pairs() {
                query.append_pair(key, &value);
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::NaiveDate;

    use super::*;
    use crate::error::FetchErrorKind;

    fn params() -> FetchSlotsParams {
        FetchSlotsParams::new(123, NaiveDate::from_ymd_opt(2024, 8, 19).unwrap())
            .with_menu_item_ids(vec![1, 2, 3])
    }

    fn query(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.endpoint, "/api/slots");
        assert!(config.headers.is_empty());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("slotcal/"));
    }

    #[test]
    fn relative_endpoint_resolves_against_base() {
        let config = ApiConfig::new("https://shop.example.com/app/").unwrap();
        assert_eq!(
            config.endpoint_url().unwrap().as_str(),
            "https://shop.example.com/api/slots"
        );
    }

    #[test]
    fn absolute_endpoint_ignores_base() {
        let config = ApiConfig::new("https://shop.example.com/")
            .unwrap()
            .with_endpoint("https://slots.example.net/v2/slots");
        assert_eq!(
            config.endpoint_url().unwrap().as_str(),
            "https://slots.example.net/v2/slots"
        );
    }

    #[test]
    fn relative_endpoint_without_base_is_configuration_error() {
        let err = ApiConfig::default().endpoint_url().unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Configuration);
    }

    #[test]
    fn request_url_with_all_filters() {
        let config = ApiConfig::new("https://shop.example.com/").unwrap();
        let params = params().with_staff_id(Some(456)).with_reservation_id(Some(789));
        let url = config.request_url(&params).unwrap();
        let query = query(&url);

        assert_eq!(url.path(), "/api/slots");
        assert_eq!(query["shopId"], "123");
        assert_eq!(query["year"], "2024");
        assert_eq!(query["month"], "8");
        assert_eq!(query["day"], "19");
        assert_eq!(query["menuItemIds"], "[1,2,3]");
        assert_eq!(query["staffId"], "456");
        assert_eq!(query["reservationId"], "789");
    }

    #[test]
    fn request_url_without_optional_filters() {
        let config = ApiConfig::new("https://shop.example.com/").unwrap();
        let url = config.request_url(&params()).unwrap();
        let query = query(&url);

        assert_eq!(query["shopId"], "123");
        assert!(!query.contains_key("staffId"));
        assert!(!query.contains_key("reservationId"));
        assert!(!url.as_str().contains("staffId"));
        assert!(!url.as_str().contains("reservationId"));
    }

    #[test]
    fn builder_methods() {
        let config = ApiConfig::default()
            .with_endpoint("https://api.example.com/slots")
            .with_header("Authorization", "Bearer abc")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.headers.get("Authorization"), Some(&"Bearer abc".to_string()));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_base_url_returns_error() {
        assert!(ApiConfig::new("not a url").is_err());
    }
}
