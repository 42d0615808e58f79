//! Error types for data provider operations.
//!
//! Every failure carries a human-readable message, which is what the calendar
//! state shows, and a [`FetchErrorKind`] for hosts that want to react to the
//! category (e.g. offer a retry on transport errors).

use std::fmt;
use thiserror::Error;

/// The category of a fetch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// Connection failed, timed out, or the body could not be read.
    Transport,
    /// The backend answered with a non-2xx status.
    HttpStatus,
    /// The response body is not valid calendar data.
    Decode,
    /// The provider is misconfigured (bad endpoint, bad header).
    Configuration,
    /// The request parameters do not describe a valid week.
    InvalidRequest,
}

impl FetchErrorKind {
    /// Returns true if repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport | Self::HttpStatus)
    }

    /// Returns a stable name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::HttpStatus => "http_status",
            Self::Decode => "decode",
            Self::Configuration => "configuration",
            Self::InvalidRequest => "invalid_request",
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed attempt to produce a week of calendar data.
#[derive(Debug, Error)]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
    /// HTTP status code, for [`FetchErrorKind::HttpStatus`].
    status: Option<u16>,
    /// The provider that failed (e.g. "api", "static").
    provider: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl FetchError {
    /// Creates a new error with the given kind and message.
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            provider: None,
            source: None,
        }
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Transport, message)
    }

    /// Creates an error for a non-success HTTP status.
    ///
    /// The message reads `API request failed: <code> <reason>`.
    pub fn http_status(code: u16, reason: &str) -> Self {
        let message = format!("API request failed: {} {}", code, reason);
        let mut err = Self::new(FetchErrorKind::HttpStatus, message.trim_end());
        err.status = Some(code);
        err
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Decode, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Configuration, message)
    }

    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::InvalidRequest, message)
    }

    /// Sets the provider name for this error.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, FetchError>;
