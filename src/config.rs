//! Server configuration loaded from a TOML file with environment overrides.

use std::{
    env,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "churnd.toml";
const CONFIG_PATH_ENV: &str = "CHURND_CONFIG";
const PORT_ENV: &str = "CHURND_PORT";
const MODEL_PATH_ENV: &str = "CHURND_MODEL_PATH";

/// Errors that may occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    Parse {
        /// TOML file path.
        path: PathBuf,
        /// TOML parse error.
        source: toml::de::Error,
    },
    /// The port override is not a valid TCP port.
    #[error("Invalid {PORT_ENV} value '{0}'")]
    InvalidPort(String),
}

/// Settings that control the server process.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface the listener binds to.
    pub host: String,
    /// TCP port the listener binds to.
    pub port: u16,
    /// Location of the trained classifier artifact.
    pub model_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            model_path: PathBuf::from("models/churn_gbdt.json"),
        }
    }
}

impl ServerConfig {
    /// Load configuration, returning defaults when no config file exists.
    ///
    /// Resolution order for the file path: explicit argument, then the
    /// `CHURND_CONFIG` environment variable, then [`CONFIG_FILE_NAME`] in
    /// the working directory. A missing file is not an error; a malformed
    /// one is. `CHURND_PORT` and `CHURND_MODEL_PATH` override the file.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = resolve_config_path(explicit);
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_overrides(
            env::var(PORT_ENV).ok().as_deref(),
            env::var(MODEL_PATH_ENV).ok().as_deref(),
        )?;
        Ok(config)
    }

    /// Parse configuration from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Socket address string the listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn apply_overrides(
        &mut self,
        port: Option<&str>,
        model_path: Option<&str>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = port {
            let trimmed = value.trim();
            self.port = trimmed
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(trimmed.to_string()))?;
        }
        if let Some(value) = model_path {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                self.model_path = PathBuf::from(trimmed);
            }
        }
        Ok(())
    }
}

fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(value) = env::var(CONFIG_PATH_ENV) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_deployment() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
        assert_eq!(config.model_path, PathBuf::from("models/churn_gbdt.json"));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 8080").unwrap();
        let config = ServerConfig::load_from(file.path()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"many\"").unwrap();
        let err = ServerConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn overrides_take_precedence_over_file_values() {
        let mut config = ServerConfig::default();
        config
            .apply_overrides(Some("9001"), Some("/srv/models/churn.json"))
            .unwrap();
        assert_eq!(config.port, 9001);
        assert_eq!(config.model_path, PathBuf::from("/srv/models/churn.json"));
    }

    #[test]
    fn invalid_port_override_is_rejected() {
        let mut config = ServerConfig::default();
        let err = config.apply_overrides(Some("not-a-port"), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));
    }

    #[test]
    fn empty_model_path_override_is_ignored() {
        let mut config = ServerConfig::default();
        config.apply_overrides(None, Some("  ")).unwrap();
        assert_eq!(config.model_path, PathBuf::from("models/churn_gbdt.json"));
    }
}
