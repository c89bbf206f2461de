//! Application configuration, read from a RON file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ingest_engine::ClientSettings;
use ingest_logging::{ingest_info, LogDestination};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILENAME: &str = "ingest_app.ron";
pub const CONFIG_ENV: &str = "INGEST_APP_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("unknown log level {0:?}")]
    LogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub product_types_path: String,
    pub ingest_path: String,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub log_destination: LogDestination,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            base_url: client.base_url,
            product_types_path: client.product_types_path,
            ingest_path: client.ingest_path,
            connect_timeout_secs: client.connect_timeout.map(|timeout| timeout.as_secs()),
            request_timeout_secs: client.request_timeout.map(|timeout| timeout.as_secs()),
            log_destination: LogDestination::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Resolves the config path: explicit argument, then `INGEST_APP_CONFIG`,
    /// then `ingest_app.ron` in the working directory.
    pub fn resolve_path(explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME))
    }

    /// Loads the config at `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: AppConfig = ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        config.level_filter()?;
        ingest_info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            product_types_path: self.product_types_path.clone(),
            ingest_path: self.ingest_path.clone(),
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig::load(&temp.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Info);
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"(
                base_url: "https://fm.example.org/fmprod/jaxrs",
                request_timeout_secs: Some(600),
                log_destination: Both,
            )"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.base_url, "https://fm.example.org/fmprod/jaxrs");
        assert_eq!(config.ingest_path, "productWithFile");
        assert_eq!(config.log_destination, LogDestination::Both);

        let settings = config.client_settings();
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(600)));
        assert_eq!(settings.connect_timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "(base_url: 42").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, r#"(log_level: "chatty")"#).unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::LogLevel(level) if level == "chatty"));
    }

    #[test]
    fn explicit_path_wins() {
        let explicit = PathBuf::from("/etc/ingest/custom.ron");
        assert_eq!(AppConfig::resolve_path(Some(explicit.clone())), explicit);
    }
}
