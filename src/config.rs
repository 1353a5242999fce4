use crate::constants;
use crate::error::{Result, StationError};
use crate::pipeline::processing::key::DedupKey;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Settings for one pipeline run.
///
/// Values come from an optional TOML file and are then overridden by the
/// environment (`PELIAS_KEY`, `EEA_TIMEOUT_MS`, `EEA_GEOCODE_DELAY_MS`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: String,
    pub timeout_ms: u64,
    pub inter_request_delay_ms: u64,
    pub metadata_url: String,
    pub geocode_url: String,
    pub existing_stations_url: String,
    pub layers: Vec<String>,
    pub dedup_key: DedupKey,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            timeout_ms: constants::DEFAULT_TIMEOUT_MS,
            inter_request_delay_ms: constants::DEFAULT_INTER_REQUEST_DELAY_MS,
            metadata_url: constants::METADATA_URL.to_string(),
            geocode_url: constants::GEOCODE_URL.to_string(),
            existing_stations_url: constants::EXISTING_STATIONS_URL.to_string(),
            layers: Vec::new(),
            dedup_key: DedupKey::default(),
        }
    }
}

impl Config {
    /// Load configuration from `path` (if the file exists) and the environment.
    ///
    /// A missing file is only an error when the caller asked for it explicitly.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let default_path = Path::new(constants::CONFIG_PATH);
        let (config_path, required) = match path {
            Some(p) => (p, true),
            None => (default_path, false),
        };

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(config_path).map_err(|e| {
                StationError::Config(format!(
                    "Failed to read config file '{}': {}",
                    config_path.display(),
                    e
                ))
            })?;
            Self::from_toml(&content)?
        } else if required {
            return Err(StationError::Config(format!(
                "Config file '{}' not found",
                config_path.display()
            )));
        } else {
            Self::default()
        };

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(key) = std::env::var(constants::API_KEY_ENV) {
            self.api_key = key;
        }
        if let Some(ms) = env_millis(constants::TIMEOUT_ENV)? {
            self.timeout_ms = ms;
        }
        if let Some(ms) = env_millis(constants::DELAY_ENV)? {
            self.inter_request_delay_ms = ms;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(StationError::Config(format!(
                "geocoding api key is required (set {} or api_key)",
                constants::API_KEY_ENV
            )));
        }
        if self.timeout_ms == 0 {
            return Err(StationError::Config("timeout_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn inter_request_delay(&self) -> Duration {
        Duration::from_millis(self.inter_request_delay_ms)
    }
}

fn env_millis(name: &str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| StationError::Config(format!("{name} must be milliseconds, got '{raw}'"))),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_partial_toml() {
        let config = Config::from_toml(r#"api_key = "abc""#).unwrap();

        assert_eq!(config.api_key, "abc");
        assert_eq!(config.timeout_ms, 60_000);
        assert_eq!(config.inter_request_delay_ms, 2_000);
        assert_eq!(config.dedup_key, DedupKey::Latitude);
        assert!(config.layers.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_overrides() {
        let config = Config::from_toml(
            r#"
            api_key = "abc"
            timeout_ms = 5000
            inter_request_delay_ms = 2500
            layers = ["locality", "county"]
            dedup_key = "coordinate"
            "#,
        )
        .unwrap();

        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.inter_request_delay(), Duration::from_millis(2500));
        assert_eq!(config.layers, vec!["locality", "county"]);
        assert_eq!(config.dedup_key, DedupKey::Coordinate);
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        let config = Config::default();
        match config.validate() {
            Err(StationError::Config(msg)) => assert!(msg.contains("api key")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/eea-config.toml")));
        assert!(matches!(result, Err(StationError::Config(_))));
    }
}
