//! Application configuration structures.
//!
//! Configuration is built once at process start, either from the process
//! environment or from a TOML file, and passed by reference to every
//! component of the run.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Environment variable names read by [`Config::from_env`].
pub mod env_keys {
    pub const PRODUCT_URL: &str = "PRODUCT_URL";
    pub const PRODUCT_PAGE: &str = "PRODUCT_PAGE";
    pub const PRODUCT_PARAMS: &str = "PRODUCT_PARAMS";
    pub const PRODUCT_REQUEST_MODE: &str = "PRODUCT_REQUEST_MODE";
    pub const NTFY_TOPIC: &str = "NTFY_TOPIC";
    pub const NTFY_SERVER: &str = "NTFY_SERVER";
    pub const STATE_PATH: &str = "STATE_PATH";
    pub const HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";
}

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Product endpoint and variant selection
    pub product: ProductConfig,

    /// Push notification channel
    pub notify: NotifyConfig,

    /// Persisted state location
    #[serde(default)]
    pub state: StateConfig,

    /// HTTP client behavior
    #[serde(default)]
    pub http: HttpConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Build configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| {
            get(key).ok_or_else(|| AppError::config(format!("{key} is not set")))
        };

        let params = match get(env_keys::PRODUCT_PARAMS) {
            Some(raw) => serde_json::from_str::<BTreeMap<String, String>>(&raw).map_err(|e| {
                AppError::config(format!(
                    "{} must be a JSON object of strings: {e}",
                    env_keys::PRODUCT_PARAMS
                ))
            })?,
            None => defaults::params(),
        };

        let request_mode = match get(env_keys::PRODUCT_REQUEST_MODE) {
            Some(raw) => raw.parse()?,
            None => RequestMode::default(),
        };

        let timeout_secs = match get(env_keys::HTTP_TIMEOUT_SECS) {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                AppError::config(format!("{} is not a number: {e}", env_keys::HTTP_TIMEOUT_SECS))
            })?,
            None => defaults::timeout(),
        };

        Ok(Self {
            product: ProductConfig {
                endpoint_url: required(env_keys::PRODUCT_URL)?,
                page_url: required(env_keys::PRODUCT_PAGE)?,
                request_mode,
                params,
            },
            notify: NotifyConfig {
                server_url: get(env_keys::NTFY_SERVER).unwrap_or_else(defaults::server_url),
                topic: required(env_keys::NTFY_TOPIC)?,
                title: defaults::title(),
                priority: defaults::priority(),
            },
            state: StateConfig {
                path: get(env_keys::STATE_PATH)
                    .map(PathBuf::from)
                    .unwrap_or_else(defaults::state_path),
            },
            http: HttpConfig {
                timeout_secs,
                ..HttpConfig::default()
            },
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.product.endpoint_url)
            .map_err(|e| AppError::validation(format!("product.endpoint_url: {e}")))?;
        self.product
            .page_url()
            .map_err(|e| AppError::validation(format!("product.page_url: {e}")))?;
        if self.product.params.is_empty() {
            return Err(AppError::validation("product.params is empty"));
        }
        if self.notify.topic.trim().is_empty() {
            return Err(AppError::validation("notify.topic is empty"));
        }
        self.notify
            .endpoint()
            .map_err(|e| AppError::validation(format!("notify endpoint: {e}")))?;
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        Ok(())
    }
}

/// How the variant parameters are sent to the product endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestMode {
    /// `GET` with the parameters in the query string
    #[default]
    Query,
    /// `POST` with a JSON body carrying the encoded query string
    Json,
}

impl FromStr for RequestMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "query" | "get" => Ok(Self::Query),
            "json" | "post" => Ok(Self::Json),
            other => Err(AppError::config(format!(
                "unknown request mode '{other}' (expected 'query' or 'json')"
            ))),
        }
    }
}

impl fmt::Display for RequestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => f.write_str("query"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Product endpoint and variant selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Internal API endpoint returning the product variant JSON
    pub endpoint_url: String,

    /// Public product page, used as referer and notification click target
    pub page_url: String,

    #[serde(default)]
    pub request_mode: RequestMode,

    /// Variant selection parameters (color, size, product id, quantity)
    #[serde(default = "defaults::params")]
    pub params: BTreeMap<String, String>,
}

impl ProductConfig {
    /// Product page as a parsed URL.
    ///
    /// The normalised form is what goes into the `Referer` and `Click`
    /// headers, so both see the same value.
    pub fn page_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.page_url)?)
    }
}

/// Push notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Base URL of the notification service
    #[serde(default = "defaults::server_url")]
    pub server_url: String,

    /// Topic (channel) the alert is published to
    pub topic: String,

    #[serde(default = "defaults::title")]
    pub title: String,

    #[serde(default = "defaults::priority")]
    pub priority: String,
}

impl NotifyConfig {
    /// Full URL alerts are posted to: `{server_url}/{topic}`.
    pub fn endpoint(&self) -> Result<Url> {
        let url = format!(
            "{}/{}",
            self.server_url.trim_end_matches('/'),
            self.topic.trim_matches('/')
        );
        Ok(Url::parse(&url)?)
    }
}

/// Persisted state location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default = "defaults::state_path")]
    pub path: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: defaults::state_path(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds, applied to every outbound call
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

mod defaults {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    // Product defaults
    pub fn params() -> BTreeMap<String, String> {
        [
            ("dwvar_4164_pv_rahmenfarbe", "R138_P01"),
            ("dwvar_4164_pv_rahmengroesse", "M"),
            ("pid", "4164"),
            ("quantity", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    // Notification defaults
    pub fn server_url() -> String {
        "https://ntfy.sh".into()
    }
    pub fn title() -> String {
        "AVAILABILITY ALERT".into()
    }
    pub fn priority() -> String {
        "high".into()
    }

    // State defaults
    pub fn state_path() -> PathBuf {
        PathBuf::from(".state/last.json")
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0".into()
    }
    pub fn timeout() -> u64 {
        30
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base_env() -> HashMap<String, String> {
        env(&[
            ("PRODUCT_URL", "https://shop.example.com/Product-Variation"),
            ("PRODUCT_PAGE", "https://shop.example.com/bike-4164.html"),
            ("NTFY_TOPIC", "bike-alerts"),
        ])
    }

    fn from_map(map: &HashMap<String, String>) -> Result<Config> {
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn from_lookup_applies_defaults() {
        let config = from_map(&base_env()).unwrap();

        assert_eq!(config.state.path, PathBuf::from(".state/last.json"));
        assert_eq!(config.product.request_mode, RequestMode::Query);
        assert_eq!(config.product.params.get("pid").unwrap(), "4164");
        assert_eq!(config.product.params.len(), 4);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.notify.server_url, "https://ntfy.sh");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_lookup_requires_topic() {
        let mut map = base_env();
        map.remove("NTFY_TOPIC");

        let err = from_map(&map).unwrap_err();
        assert!(err.to_string().contains("NTFY_TOPIC"));
    }

    #[test]
    fn from_lookup_treats_blank_as_unset() {
        let mut map = base_env();
        map.insert("STATE_PATH".into(), "   ".into());
        map.insert("PRODUCT_PAGE".into(), "".into());

        assert!(from_map(&map).is_err());

        map.insert("PRODUCT_PAGE".into(), "https://shop.example.com/p".into());
        let config = from_map(&map).unwrap();
        assert_eq!(config.state.path, PathBuf::from(".state/last.json"));
    }

    #[test]
    fn from_lookup_reads_overrides() {
        let mut map = base_env();
        map.insert("STATE_PATH".into(), "/var/lib/watch/state.json".into());
        map.insert("PRODUCT_PARAMS".into(), r#"{"pid":"9000","quantity":"2"}"#.into());
        map.insert("PRODUCT_REQUEST_MODE".into(), "json".into());
        map.insert("HTTP_TIMEOUT_SECS".into(), "5".into());
        map.insert("NTFY_SERVER".into(), "https://push.example.org/".into());

        let config = from_map(&map).unwrap();
        assert_eq!(config.state.path, PathBuf::from("/var/lib/watch/state.json"));
        assert_eq!(config.product.params.len(), 2);
        assert_eq!(config.product.params.get("pid").unwrap(), "9000");
        assert_eq!(config.product.request_mode, RequestMode::Json);
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(
            config.notify.endpoint().unwrap().as_str(),
            "https://push.example.org/bike-alerts"
        );
    }

    #[test]
    fn from_lookup_rejects_malformed_params() {
        let mut map = base_env();
        map.insert("PRODUCT_PARAMS".into(), "pid=4164".into());

        let err = from_map(&map).unwrap_err();
        assert!(err.to_string().contains("PRODUCT_PARAMS"));
    }

    #[test]
    fn request_mode_parsing() {
        assert_eq!("query".parse::<RequestMode>().unwrap(), RequestMode::Query);
        assert_eq!("POST".parse::<RequestMode>().unwrap(), RequestMode::Json);
        assert!("xml".parse::<RequestMode>().is_err());
    }

    #[test]
    fn parse_toml_with_defaults() {
        let config = Config::parse(
            r#"
            [product]
            endpoint_url = "https://shop.example.com/Product-Variation"
            page_url = "https://shop.example.com/bike-4164.html"
            request_mode = "json"

            [notify]
            topic = "bike-alerts"
            priority = "urgent"
            "#,
        )
        .unwrap();

        assert_eq!(config.product.request_mode, RequestMode::Json);
        assert_eq!(config.product.params.len(), 4);
        assert_eq!(config.notify.priority, "urgent");
        assert_eq!(config.notify.title, "AVAILABILITY ALERT");
        assert_eq!(config.state.path, PathBuf::from(".state/last.json"));
        assert_eq!(config.http.user_agent, "Mozilla/5.0");
    }

    #[test]
    fn validate_rejects_bad_values() {
        let config = from_map(&base_env()).unwrap();

        let mut bad_url = config.clone();
        bad_url.product.endpoint_url = "not a url".into();
        assert!(bad_url.validate().is_err());

        let mut zero_timeout = config.clone();
        zero_timeout.http.timeout_secs = 0;
        assert!(zero_timeout.validate().is_err());

        let mut no_params = config.clone();
        no_params.product.params.clear();
        assert!(no_params.validate().is_err());

        let mut blank_topic = config;
        blank_topic.notify.topic = " ".into();
        assert!(blank_topic.validate().is_err());
    }
}
