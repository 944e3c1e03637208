//! Error types.
//!
//! [`FetchError`] is the single failure kind of a page fetch. Its variants
//! only exist so the diagnostic log line can say what went wrong; the
//! controller treats every variant the same way.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned HTTP {0}")]
    Status(StatusCode),

    #[error("malformed provider JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request timed out")]
    Timeout,

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("no API key configured (use --api-key, GNEWS_API_KEY, or api_key in the config file)")]
    MissingApiKey,

    #[error("invalid URL for {field}: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("unknown category '{0}' (expected one of general, technology, business, sports, health, entertainment)")]
    InvalidCategory(String),
}
