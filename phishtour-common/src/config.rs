//! Configuration loading and database path resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable overriding the database path
pub const DATABASE_ENV_VAR: &str = "PHISHTOUR_DATABASE";

/// Optional TOML configuration file contents
///
/// All fields are optional; missing fields fall back to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Path to the SQLite database file
    pub database_path: Option<String>,
    /// Base URL of the phish.in API
    pub api_base_url: Option<String>,
}

impl TomlConfig {
    /// Load the config file from the platform config directory, if present.
    ///
    /// A missing or unreadable file is not an error; services start with
    /// defaults and log a warning instead of terminating.
    pub fn load() -> Self {
        let Ok(path) = config_file_path() else {
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config file: {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Ignoring malformed config file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Parse a TOML string (test hook; `load` goes through the filesystem)
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
    }
}

/// Database path resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. PHISHTOUR_DATABASE environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_database_path(cli_arg: Option<&str>, toml_config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATABASE_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &toml_config.database_path {
        return PathBuf::from(path);
    }

    // Priority 4: OS-dependent compiled default
    default_database_path()
}

/// Get default configuration file path for the platform
fn config_file_path() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/phishtour/config.toml first, then /etc/phishtour/config.toml
        if let Some(path) = dirs::config_dir().map(|d| d.join("phishtour").join("config.toml")) {
            if path.exists() {
                return Ok(path);
            }
        }
        let system_config = PathBuf::from("/etc/phishtour/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
        Err(Error::Config("No config file found".to_string()))
    } else {
        let path = dirs::config_dir()
            .map(|d| d.join("phishtour").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

        if path.exists() {
            Ok(path)
        } else {
            Err(Error::Config(format!("Config file not found: {:?}", path)))
        }
    }
}

/// Get OS-dependent default database path
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("phishtour"))
        .unwrap_or_else(|| PathBuf::from("./phishtour_data"))
        .join("phishtour.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_config_parses_all_fields() {
        let config = TomlConfig::from_toml_str(
            r#"
            database_path = "/tmp/tour.db"
            api_base_url = "http://localhost:9292/api/v1"
            "#,
        )
        .unwrap();

        assert_eq!(config.database_path.as_deref(), Some("/tmp/tour.db"));
        assert_eq!(
            config.api_base_url.as_deref(),
            Some("http://localhost:9292/api/v1")
        );
    }

    #[test]
    fn test_toml_config_tolerates_missing_fields() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.database_path.is_none());
        assert!(config.api_base_url.is_none());
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(TomlConfig::from_toml_str("database_path = [").is_err());
    }
}
