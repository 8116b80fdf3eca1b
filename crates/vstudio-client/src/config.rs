//! Client configuration.
//!
//! Base URLs are resolved in layers so one build can target different
//! backend hosts without rebuilding:
//!
//! 1. runtime-injected values: a runtime config file written at deploy time
//!    (keys substituted by `envsubst` or similar), then the process
//!    environment
//! 2. values captured at build time with `option_env!`
//! 3. localhost defaults
//!
//! A runtime value still containing a `${...}` placeholder means the
//! substitution never ran and is ignored.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::error::{StudioError, StudioResult};
use crate::retry::RetryConfig;

pub const API_BASE_URL_KEY: &str = "VITE_API_BASE_URL";
pub const YOUTUBE_API_BASE_URL_KEY: &str = "VITE_YOUTUBE_API_BASE_URL";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_YOUTUBE_API_BASE_URL: &str = "http://localhost:8005";

const BUILD_API_BASE_URL: Option<&str> = option_env!("VITE_API_BASE_URL");
const BUILD_YOUTUBE_API_BASE_URL: Option<&str> = option_env!("VITE_YOUTUBE_API_BASE_URL");

/// True when a runtime value was actually substituted.
pub fn is_configured(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !value.contains("${")
}

/// Pick the first configured runtime value, else the build-time value, else the default.
pub fn resolve_base_url<'a>(
    runtime: impl IntoIterator<Item = Option<&'a str>>,
    build_time: Option<&str>,
    default: &str,
) -> String {
    runtime
        .into_iter()
        .flatten()
        .find(|v| is_configured(v))
        .or(build_time.filter(|v| !v.trim().is_empty()))
        .unwrap_or(default)
        .trim()
        .trim_end_matches('/')
        .to_string()
}

/// Key/value pairs injected at deploy time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeValues {
    values: HashMap<String, String>,
}

impl RuntimeValues {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a flat JSON object of string values.
    pub fn from_json_str(raw: &str) -> StudioResult<Self> {
        let parsed: HashMap<String, serde_json::Value> = serde_json::from_str(raw)
            .map_err(|e| StudioError::config(format!("runtime config is not a JSON object: {}", e)))?;

        let values = parsed
            .into_iter()
            .filter_map(|(k, v)| match v {
                serde_json::Value::String(s) => Some((k, s)),
                serde_json::Value::Null => None,
                other => Some((k, other.to_string())),
            })
            .collect();

        Ok(Self { values })
    }

    /// Load a runtime config file.
    pub fn load(path: impl AsRef<Path>) -> StudioResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StudioError::config(format!("cannot read runtime config {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Raw value for a key, substituted or not.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Resolved client configuration, passed explicitly to every client.
#[derive(Debug, Clone, PartialEq)]
pub struct StudioConfig {
    /// Core project API host (without the `/api/v1` prefix)
    pub api_base_url: String,
    /// YouTube proxy host (without the `/api/youtube` prefix)
    pub youtube_api_base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Retry policy for reads
    pub retry: RetryConfig,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            youtube_api_base_url: DEFAULT_YOUTUBE_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(5),
            retry: RetryConfig::default(),
        }
    }
}

impl StudioConfig {
    /// Both base URLs pointing at explicit hosts, other knobs at defaults.
    pub fn with_base_urls(api: impl Into<String>, youtube: impl Into<String>) -> Self {
        Self {
            api_base_url: api.into(),
            youtube_api_base_url: youtube.into(),
            ..Self::default()
        }
    }

    /// Create config from runtime values and the process environment.
    pub fn from_env(runtime: &RuntimeValues) -> StudioResult<Self> {
        Self::resolve(runtime, |key| std::env::var(key).ok())
    }

    /// Create config from runtime values and an arbitrary variable lookup.
    pub fn resolve(
        runtime: &RuntimeValues,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> StudioResult<Self> {
        let env_api = lookup(API_BASE_URL_KEY);
        let env_youtube = lookup(YOUTUBE_API_BASE_URL_KEY);

        let api_base_url = resolve_base_url(
            [runtime.get(API_BASE_URL_KEY), env_api.as_deref()],
            BUILD_API_BASE_URL,
            DEFAULT_API_BASE_URL,
        );
        let youtube_api_base_url = resolve_base_url(
            [runtime.get(YOUTUBE_API_BASE_URL_KEY), env_youtube.as_deref()],
            BUILD_YOUTUBE_API_BASE_URL,
            DEFAULT_YOUTUBE_API_BASE_URL,
        );

        let secs = |key: &str, fallback: u64| {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(fallback)
        };

        let config = Self {
            api_base_url,
            youtube_api_base_url,
            timeout: Duration::from_secs(secs("STUDIO_HTTP_TIMEOUT_SECS", 60)),
            connect_timeout: Duration::from_secs(secs("STUDIO_CONNECT_TIMEOUT_SECS", 5)),
            retry: RetryConfig::from_lookup(&lookup),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check both base URLs are absolute http(s) URLs.
    pub fn validate(&self) -> StudioResult<()> {
        for (name, raw) in [
            ("core API", &self.api_base_url),
            ("YouTube API", &self.youtube_api_base_url),
        ] {
            let url = Url::parse(raw)
                .map_err(|e| StudioError::config(format!("invalid {} base URL {:?}: {}", name, raw, e)))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(StudioError::config(format!(
                    "{} base URL must be http(s), got {:?}",
                    name, raw
                )));
            }
        }
        Ok(())
    }
}
