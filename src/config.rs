use std::env;
use std::time::Duration;

use tracing::warn;
use url::Url;

use crate::lang::DEFAULT_CJK_THRESHOLD;
use crate::prompt::OutputMode;

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DEEPSEEK_API_KEY is not set")]
    MissingApiKey,

    #[error("invalid DEEPSEEK_BASE_URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Connection settings for the chat-completion backend.
#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub api_key: ApiKey,
    pub base_url: Url,
    pub model: String,
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads settings through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("DEEPSEEK_API_KEY").ok_or(ConfigError::MissingApiKey)?;

        let raw_url = get("DEEPSEEK_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&raw_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: raw_url.clone(),
            source,
        })?;
        if base_url.scheme() != "https" {
            warn!(url = %base_url, "backend URL is not HTTPS; the API key is sent in clear text");
        }

        let model = get("DEEPSEEK_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let timeout = match get("MEDDOC_REQUEST_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidValue {
                    name: "MEDDOC_REQUEST_TIMEOUT_SECS",
                    value: v,
                })?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            api_key: ApiKey::new(api_key),
            base_url,
            model,
            timeout,
        })
    }
}

/// How analyses are produced, independent of the backend connection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalyzerSettings {
    pub mode: OutputMode,
    pub cjk_threshold: f64,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            mode: OutputMode::Bilingual,
            cjk_threshold: DEFAULT_CJK_THRESHOLD,
        }
    }
}

impl AnalyzerSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut settings = Self::default();

        if let Some(v) = lookup("MEDDOC_OUTPUT_MODE").filter(|v| !v.trim().is_empty()) {
            settings.mode = v.parse().map_err(|_| ConfigError::InvalidValue {
                name: "MEDDOC_OUTPUT_MODE",
                value: v.clone(),
            })?;
        }

        if let Some(v) = lookup("MEDDOC_CJK_THRESHOLD").filter(|v| !v.trim().is_empty()) {
            settings.cjk_threshold = v
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|t| (0.0..=1.0).contains(t))
                .ok_or(ConfigError::InvalidValue {
                    name: "MEDDOC_CJK_THRESHOLD",
                    value: v.clone(),
                })?;
        }

        Ok(settings)
    }
}
