use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

use crate::ports::{AppConfig, ConfigError, ConfigResult, ConfigStore};

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    api_url: Option<String>,
    cache_ttl_seconds: Option<u64>,
    request_timeout_seconds: Option<u64>,
}

/// JSON config at `<config dir>/todo-tui/config.json`.
pub struct FileConfigStore {
    config_path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> ConfigResult<Self> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::ReadError("Cannot determine config directory".to_string())
        })?;

        Ok(Self::with_path(config_dir.join("todo-tui").join("config.json")))
    }

    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    async fn ensure_config_dir(&self) -> ConfigResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load_config(&self) -> ConfigResult<AppConfig> {
        let content = match fs::read_to_string(&self.config_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No config file at {}", self.config_path.display());
                return Ok(AppConfig::default());
            }
            Err(e) => return Err(ConfigError::ReadError(e.to_string())),
        };

        let config_file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        let defaults = AppConfig::default();
        Ok(AppConfig {
            api_url: config_file.api_url,
            cache_ttl_seconds: config_file
                .cache_ttl_seconds
                .unwrap_or(defaults.cache_ttl_seconds),
            request_timeout_seconds: config_file
                .request_timeout_seconds
                .unwrap_or(defaults.request_timeout_seconds),
        })
    }

    async fn save_config(&self, config: &AppConfig) -> ConfigResult<()> {
        self.ensure_config_dir().await?;

        let config_file = ConfigFile {
            api_url: config.api_url.clone(),
            cache_ttl_seconds: Some(config.cache_ttl_seconds),
            request_timeout_seconds: Some(config.request_timeout_seconds),
        };

        let content = serde_json::to_string_pretty(&config_file)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        fs::write(&self.config_path, content)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("todo-tui-test-{}-{name}", std::process::id()))
            .join("config.json")
    }

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let store = FileConfigStore::with_path(scratch_path("missing"));
        let config = store.load_config().await.unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn saved_config_loads_back() {
        let path = scratch_path("roundtrip");
        let store = FileConfigStore::with_path(path.clone());
        let config = AppConfig {
            api_url: Some("http://localhost:4000".to_string()),
            cache_ttl_seconds: 60,
            request_timeout_seconds: 5,
        };

        store.save_config(&config).await.unwrap();
        assert_eq!(store.load_config().await.unwrap(), config);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn partial_file_fills_in_defaults() {
        let path = scratch_path("partial");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{ "api_url": "https://todo.example" }"#).unwrap();

        let config = FileConfigStore::with_path(path.clone()).load_config().await.unwrap();
        assert_eq!(config.api_url.as_deref(), Some("https://todo.example"));
        assert_eq!(config.cache_ttl_seconds, 300);
        assert_eq!(config.request_timeout_seconds, 30);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn malformed_file_is_reported() {
        let path = scratch_path("malformed");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        let err = FileConfigStore::with_path(path.clone())
            .load_config()
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormat(_)));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
