//! Runtime configuration.
//!
//! Settings come from three layers, later layers winning:
//!
//! 1. Built-in defaults ([`FeedConfig::default`])
//! 2. An optional YAML file passed with `--config`
//! 3. Command-line flags and their environment variables (see [`Cli`])
//!
//! # Example
//!
//! ```yaml
//! api_key: "0123456789abcdef"
//! default_category: technology
//! timeout_secs: 15
//! relay:
//!   enabled: true
//! ```

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::models::Category;
use crate::request::RequestSettings;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://gnews.io/api/v4";
pub const DEFAULT_RELAY_PREFIX: &str = "https://api.allorigins.win/raw?url=";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Assumed match count when the provider omits `totalArticles`.
pub const DEFAULT_TOTAL_ARTICLES: u64 = 100;
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// The full set of tunables, as read from the YAML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub language: String,
    pub country: String,
    pub page_size: u32,
    pub default_total_articles: u64,
    pub default_category: Category,
    pub placeholder_image: String,
    /// Per-request timeout. Unset means a hung request stays loading.
    pub timeout_secs: Option<u64>,
    pub relay: RelayConfig,
}

/// Pass-through endpoint used to get around browser cross-origin rules in
/// some deployments.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub enabled: bool,
    /// Prefix the percent-encoded provider URL is appended to.
    pub prefix: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            language: "en".to_string(),
            country: "us".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            default_total_articles: DEFAULT_TOTAL_ARTICLES,
            default_category: Category::General,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            timeout_secs: None,
            relay: RelayConfig::default(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            prefix: DEFAULT_RELAY_PREFIX.to_string(),
        }
    }
}

/// Load configuration from `path`, or the defaults when no path is given.
#[instrument(level = "info")]
pub fn load_config(path: Option<&str>) -> Result<FeedConfig, ConfigError> {
    let Some(path) = path else {
        debug!("No config file given; using defaults");
        return Ok(FeedConfig::default());
    };

    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    let config = parse_config(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })?;
    info!(path, "Loaded configuration");
    Ok(config)
}

fn parse_config(raw: &str) -> Result<FeedConfig, serde_yaml::Error> {
    // An empty file deserializes to unit, not to an empty mapping.
    if raw.trim().is_empty() {
        return Ok(FeedConfig::default());
    }
    serde_yaml::from_str(raw)
}

impl FeedConfig {
    /// Overlay command-line flags on top of file values.
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(key) = &cli.api_key {
            self.api_key = Some(key.clone());
        }
        if let Some(base) = &cli.base_url {
            self.base_url = base.clone();
        }
        if cli.relay {
            self.relay.enabled = true;
        }
        if let Some(secs) = cli.timeout_secs {
            self.timeout_secs = Some(secs);
        }
        if let Some(category) = cli.category {
            self.default_category = category;
        }
        self
    }

    /// Validate and build the settings the request builder needs.
    pub fn request_settings(&self) -> Result<RequestSettings, ConfigError> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?
            .to_string();

        let base_url = Url::parse(&self.base_url)
            .ok()
            .filter(|u| !u.cannot_be_a_base())
            .ok_or_else(|| ConfigError::InvalidUrl {
                field: "base_url",
                value: self.base_url.clone(),
            })?;

        let relay_prefix = if self.relay.enabled {
            Url::parse(&self.relay.prefix).map_err(|_| ConfigError::InvalidUrl {
                field: "relay.prefix",
                value: self.relay.prefix.clone(),
            })?;
            Some(self.relay.prefix.clone())
        } else {
            None
        };

        Ok(RequestSettings {
            base_url,
            api_key,
            language: self.language.clone(),
            country: self.country.clone(),
            page_size: self.page_size.max(1),
            relay_prefix,
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let config = FeedConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.default_total_articles, 100);
        assert_eq!(config.language, "en");
        assert_eq!(config.country, "us");
        assert!(!config.relay.enabled);
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = parse_config(
            "api_key: abc\ndefault_category: sports\nrelay:\n  enabled: true\n",
        )
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.default_category, Category::Sports);
        assert!(config.relay.enabled);
        assert_eq!(config.relay.prefix, DEFAULT_RELAY_PREFIX);
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = parse_config("  \n").unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = parse_config("api_key: from-file\nbase_url: http://file.invalid\n").unwrap();
        let cli = Cli::parse_from([
            "newshub",
            "--api-key",
            "from-cli",
            "--relay",
            "--category",
            "health",
        ]);
        let config = file.merge_cli(&cli);
        assert_eq!(config.api_key.as_deref(), Some("from-cli"));
        assert_eq!(config.base_url, "http://file.invalid");
        assert!(config.relay.enabled);
        assert_eq!(config.default_category, Category::Health);
    }

    #[test]
    fn test_missing_api_key() {
        let err = FeedConfig::default().request_settings().unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn test_request_settings_relay_only_when_enabled() {
        let mut config = FeedConfig {
            api_key: Some("k".to_string()),
            ..FeedConfig::default()
        };
        assert!(config.request_settings().unwrap().relay_prefix.is_none());

        config.relay.enabled = true;
        assert_eq!(
            config.request_settings().unwrap().relay_prefix.as_deref(),
            Some(DEFAULT_RELAY_PREFIX)
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = FeedConfig {
            api_key: Some("k".to_string()),
            base_url: "not a url".to_string(),
            ..FeedConfig::default()
        };
        assert!(matches!(
            config.request_settings(),
            Err(ConfigError::InvalidUrl { field: "base_url", .. })
        ));
    }
}
