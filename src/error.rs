//! Error types for the Gazpar to InfluxDB2 forwarder.
//!
//! This module defines typed errors for the different components of the application.
//! Portal errors additionally map onto a small closed [`ErrorKind`] set, which is
//! what the retry wrapper uses to decide whether another attempt can succeed.

use thiserror::Error;

/// Result type alias using our custom error types.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error type that encompasses all application errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("configuration error")]
    Config(#[from] ConfigError),

    /// GrDF portal communication and parsing errors
    #[error("GrDF portal error")]
    Grdf(#[from] GrdfError),

    /// Metric collection errors
    #[error("collector error")]
    Collector(#[from] CollectorError),

    /// InfluxDB storage errors
    #[error("storage error")]
    Storage(#[from] StorageError),

    /// Generic errors that don't fit other categories
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable parsing failed
    #[error("failed to parse environment variables: {0}")]
    EnvParse(String),

    /// Configuration value is invalid
    #[error("invalid configuration value for {field}: {message}")]
    Invalid { field: String, message: String },
}

/// The closed set of failure classes a scrape can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credentials rejected or session cookie missing after login.
    Auth,
    /// The portal wants the user to accept new terms of use.
    ConsentRequired,
    /// The portal answered but the expected markup was not there.
    Parse,
    /// Network failure or unexpected HTTP status.
    Transport,
}

impl ErrorKind {
    /// Whether retrying the whole scrape can plausibly succeed.
    ///
    /// Consent can only be given by a human on the website, so it is the one
    /// kind that is never retried.
    pub fn is_retryable(self) -> bool {
        !matches!(self, ErrorKind::ConsentRequired)
    }
}

/// GrDF portal communication and parsing errors.
#[derive(Error, Debug)]
pub enum GrdfError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The session cookie was not issued after the login sequence
    #[error("login unsuccessful, check your credentials")]
    LoginFailed,

    /// The portal shows a terms-of-use interstitial instead of data
    #[error("you need to accept the latest terms of use: log into the website manually, then come back")]
    TermsOfUse,

    /// Server returned an error status
    #[error("server error (status {status}): {message}")]
    ServerError { status: u16, message: String },

    /// The configured portal URL cannot be used
    #[error("invalid portal URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// Response parsing failed
    #[error("response parsing error")]
    Parse(#[from] ParseError),
}

impl GrdfError {
    /// Creates a server error from HTTP status and response body.
    pub fn server_error(status: reqwest::StatusCode, body: String) -> Self {
        Self::ServerError {
            status: status.as_u16(),
            message: body,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: err.to_string(),
        }
    }

    /// Classifies this error for the retry policy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GrdfError::LoginFailed => ErrorKind::Auth,
            GrdfError::TermsOfUse => ErrorKind::ConsentRequired,
            GrdfError::Parse(_) => ErrorKind::Parse,
            GrdfError::Http(_) | GrdfError::ServerError { .. } | GrdfError::InvalidUrl { .. } => {
                ErrorKind::Transport
            }
        }
    }
}

/// Errors raised while picking tokens and series out of portal responses.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Element not found in HTML
    #[error("element not found: {selector}")]
    ElementNotFound { selector: String },

    /// Invalid CSS selector
    #[error("invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    /// Expected attribute missing on a matched element
    #[error("attribute '{attribute}' missing on element: {selector}")]
    MissingAttribute { selector: String, attribute: String },

    /// Literal script marker not present in the page
    #[error("marker not found in response: {marker}")]
    MarkerNotFound { marker: String },

    /// Marker could not be turned into a pattern
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Malformed XML partial response
    #[error("malformed XML: {0}")]
    Xml(String),

    /// Failed to parse numeric value
    #[error("failed to parse number from '{text}': {message}")]
    NumberParse { text: String, message: String },

    /// Failed to parse date/time
    #[error("failed to parse date/time from '{text}': {message}")]
    DateTimeParse { text: String, message: String },

    /// The portal returned a series without a single value
    #[error("no readings in {series} series")]
    EmptySeries { series: String },

    /// The value series is shorter than the time series
    #[error("series length mismatch: {times} timestamps but {values} values")]
    SeriesLengthMismatch { times: usize, values: usize },
}

impl ParseError {
    /// Creates an element not found error.
    pub fn element_not_found(selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
        }
    }

    /// Creates an invalid selector error.
    pub fn invalid_selector(selector: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: err.to_string(),
        }
    }

    /// Creates a missing attribute error.
    pub fn missing_attribute(selector: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            selector: selector.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: err.to_string(),
        }
    }

    /// Creates a marker not found error.
    pub fn marker_not_found(marker: impl Into<String>) -> Self {
        Self::MarkerNotFound {
            marker: marker.into(),
        }
    }

    /// Creates an empty series error.
    pub fn empty_series(series: impl Into<String>) -> Self {
        Self::EmptySeries {
            series: series.into(),
        }
    }

    /// Creates a number parse error.
    pub fn number_parse(text: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::NumberParse {
            text: text.into(),
            message: err.to_string(),
        }
    }

    /// Creates a datetime parse error.
    pub fn datetime_parse(text: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::DateTimeParse {
            text: text.into(),
            message: err.to_string(),
        }
    }
}

/// Metric collection errors.
#[derive(Error, Debug)]
pub enum CollectorError {
    /// Collector task timed out
    #[error("collector '{name}' timed out after {timeout} seconds")]
    Timeout { name: String, timeout: u64 },

    /// Data source error
    #[error("failed to collect from source")]
    Source(#[from] GrdfError),

    /// Data validation failed
    #[error("invalid metric data: {0}")]
    ValidationFailed(String),
}

/// InfluxDB storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// InfluxDB client error
    #[error("InfluxDB error: {0}")]
    Client(#[from] influxdb2::RequestError),

    /// Invalid data point
    #[error("invalid data point: {0}")]
    InvalidDataPoint(String),
}

impl ConfigError {
    /// Creates a new environment parse error.
    pub fn env_parse(err: impl std::fmt::Display) -> Self {
        Self::EnvParse(err.to_string())
    }

    /// Creates a new invalid configuration error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl CollectorError {
    /// Creates a timeout error.
    pub fn timeout(name: impl Into<String>, timeout: u64) -> Self {
        Self::Timeout {
            name: name.into(),
            timeout,
        }
    }
}
