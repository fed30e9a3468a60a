//! Load — config loading from file and environment variables.

use std::path::Path;

use super::error::ConfigError;
use super::model::EngineConfig;

pub const CONFIG_FILE_ENV: &str = "ANALYZER_CONFIG_FILE";
pub const DEFAULT_CONFIG_FILE: &str = "analyzer.toml";

impl EngineConfig {
    /// Load configuration from file, falling back to defaults.
    /// Priority: Environment Variables > Config File > Defaults
    ///
    /// `path` overrides `ANALYZER_CONFIG_FILE`. An explicitly given path that
    /// does not exist is an error; a missing default file is not.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let config_path = std::env::var(CONFIG_FILE_ENV)
                    .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
                if Path::new(&config_path).exists() {
                    tracing::info!("Loading configuration from: {}", config_path);
                    Self::from_file(Path::new(&config_path))?
                } else {
                    tracing::info!("Config file not found at {}, using defaults", config_path);
                    Self::default()
                }
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(pattern) = std::env::var("ANALYZER_TIMESTAMP_PATTERN") {
            self.timestamp_pattern = pattern;
        }
        if let Ok(pattern) = std::env::var("ANALYZER_EXCEPTION_PATTERN") {
            self.exception_pattern = pattern;
        }
    }
}
