use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    ReadError(String),

    #[error("Failed to write configuration: {0}")]
    WriteError(String),

    #[error("Invalid configuration format: {0}")]
    InvalidFormat(String),

    #[error("Invalid API URL '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "TODO_API_URL";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_url: Option<String>,
    pub cache_ttl_seconds: u64,
    pub request_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            cache_ttl_seconds: 300, // 5 minutes
            request_timeout_seconds: 30,
        }
    }
}

impl AppConfig {
    /// Command line beats environment, environment beats the config file.
    pub fn with_overrides(mut self, cli_url: Option<String>, env_url: Option<String>) -> Self {
        let non_blank = |url: Option<String>| url.filter(|u| !u.trim().is_empty());

        if let Some(url) = non_blank(cli_url).or_else(|| non_blank(env_url)) {
            self.api_url = Some(url);
        }
        self
    }

    /// Parsed base URL, `None` when nothing is configured.
    pub fn api_base_url(&self) -> ConfigResult<Option<Url>> {
        let Some(raw) = self.api_url.as_deref() else {
            return Ok(None);
        };

        let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidApiUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(Some(url)),
            other => Err(ConfigError::InvalidApiUrl {
                url: raw.to_string(),
                reason: format!("unsupported scheme '{other}'"),
            }),
        }
    }
}

#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn load_config(&self) -> ConfigResult<AppConfig>;
    async fn save_config(&self, config: &AppConfig) -> ConfigResult<()>;
}
