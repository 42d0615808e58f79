//! HTTP API provider implementation.
//!
//! Issues `GET <endpoint>?shopId=..&year=..&month=..&day=..[&filters]` and
//! decodes the JSON body as [`CalendarData`].

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use slotcal_core::CalendarData;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::{FetchError, ProviderResult};
use crate::provider::{BoxFuture, DataProvider, FetchSlotsParams};

use super::config::ApiConfig;

const PROVIDER_NAME: &str = "api";

/// Data provider backed by the booking backend's slot endpoint.
///
/// Endpoint and headers may be changed after construction; a change applies
/// to requests started afterwards.
#[derive(Debug)]
pub struct ApiDataProvider {
    client: Client,
    config: RwLock<ApiConfig>,
}

impl ApiDataProvider {
    /// Creates a provider with the given configuration.
    pub fn new(config: ApiConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| FetchError::configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: RwLock::new(config),
        })
    }

    /// Returns a snapshot of the current configuration.
    pub fn config(&self) -> ApiConfig {
        self.config.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Replaces the endpoint.
    pub fn set_endpoint(&self, endpoint: impl Into<String>) {
        self.config.write().unwrap_or_else(PoisonError::into_inner).endpoint = endpoint.into();
    }

    /// Merges `headers` into the configured headers, overwriting equal names.
    pub fn set_headers<K, V>(&self, headers: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        config
            .headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Removes a configured header.
    pub fn clear_header(&self, name: &str) {
        self.config
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .headers
            .remove(name);
    }

    /// Builds the URL a fetch for `params` would request.
    pub fn request_url(&self, params: &FetchSlotsParams) -> ProviderResult<Url> {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .request_url(params)
    }

    fn request_parts(&self, params: &FetchSlotsParams) -> ProviderResult<(Url, BTreeMap<String, String>)> {
        let config = self.config.read().unwrap_or_else(PoisonError::into_inner);
        Ok((config.request_url(params)?, config.headers.clone()))
    }

    async fn fetch(&self, params: FetchSlotsParams) -> ProviderResult<CalendarData> {
        let (url, headers) = self.request_parts(&params)?;
        debug!(shop_id = params.shop_id, year = params.year, month = params.month, day = params.day, "fetching slots");
        trace!(url = %url, "sending request");

        let mut request = self.client.get(url);
        if !headers.keys().any(|name| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str())) {
            request = request.header(CONTENT_TYPE, "application/json");
        }
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                FetchError::configuration(format!("invalid request: {}", e))
            } else if e.is_timeout() {
                FetchError::transport("request timeout")
            } else {
                FetchError::transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(format!("failed to read response: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| {
            FetchError::decode(format!("failed to decode calendar data: {}", e)).with_source(e)
        })
    }
}

impl DataProvider for ApiDataProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn fetch_slots(&self, params: FetchSlotsParams) -> BoxFuture<'_, ProviderResult<CalendarData>> {
        Box::pin(async move {
            self.fetch(params).await.map_err(|e| {
                warn!(kind = %e.kind(), error = %e, "failed to fetch slots from API");
                e.with_provider(PROVIDER_NAME)
            })
        })
    }
}
