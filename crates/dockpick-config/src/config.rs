//! User configuration for dockpick
//!
//! Located at `~/.config/dockpick/config.toml`

use crate::{ConfigError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "dockpick";

/// Colour theme for interactive output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ConfigError::Invalid(format!("Unknown theme: {}", other))),
        }
    }
}

/// dockpick configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Colour theme ("light" or "dark")
    pub theme: Theme,
    /// Number of log lines shown by the log actions
    pub log_lines: u32,
    /// Emit ANSI colours (also disabled when stdout is not a terminal)
    pub color: bool,
    /// Directory holding the favorites and history files.
    /// Defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,
    pub runtime: RuntimeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            log_lines: 50,
            color: true,
            data_dir: None,
            runtime: RuntimeConfig::default(),
        }
    }
}

/// Container runtime connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Docker API socket path or URL
    pub socket: String,
    /// CLI binary used to attach interactive shells
    pub cli: String,
    /// API request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            socket: default_docker_socket(),
            cli: "docker".to_string(),
            timeout_secs: 120,
        }
    }
}

#[cfg(windows)]
fn default_docker_socket() -> String {
    "//./pipe/docker_engine".to_string()
}

#[cfg(not(windows))]
fn default_docker_socket() -> String {
    "/var/run/docker.sock".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        if config.log_lines == 0 {
            return Err(ConfigError::Invalid(
                "log_lines must be greater than zero".to_string(),
            ));
        }

        tracing::debug!(
            "Loaded config from {:?}: theme={}, log_lines={}",
            path,
            config.theme,
            config.log_lines
        );

        Ok(config)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", APP_NAME).ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Directory holding favorites and history, honouring the `data_dir` override
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let dirs = ProjectDirs::from("", "", APP_NAME).ok_or(ConfigError::NoDataDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Path of the favorites file
    pub fn favorites_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("favorites"))
    }

    /// Path of the history file
    pub fn history_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("history"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.log_lines, 50);
        assert!(config.color);
        assert_eq!(config.runtime.cli, "docker");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
theme = "light"
log_lines = 200

[runtime]
socket = "/run/user/1000/docker.sock"
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.log_lines, 200);
        assert_eq!(config.runtime.socket, "/run/user/1000/docker.sock");
        // Unspecified fields keep their defaults
        assert_eq!(config.runtime.cli, "docker");
        assert_eq!(config.runtime.timeout_secs, 120);
    }

    #[test]
    fn test_unknown_theme_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str(r#"theme = "solarized""#);
        assert!(result.is_err());
        assert!("solarized".parse::<Theme>().is_err());
        assert_eq!("LIGHT".parse::<Theme>().unwrap(), Theme::Light);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load_from(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.log_lines, 50);
    }

    #[test]
    fn test_load_rejects_zero_log_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "log_lines = 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "theme = [not toml").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::TomlParseError { .. })
        ));
    }

    #[test]
    fn test_printed_config_loads_back() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        let config = Config {
            theme: Theme::Light,
            log_lines: 75,
            ..Config::default()
        };
        std::fs::write(&path, config.to_toml().unwrap()).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.theme, Theme::Light);
        assert_eq!(loaded.log_lines, 75);
    }

    #[test]
    fn test_data_dir_override() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/dockpick-state")),
            ..Config::default()
        };
        assert_eq!(
            config.favorites_path().unwrap(),
            PathBuf::from("/tmp/dockpick-state/favorites")
        );
        assert_eq!(
            config.history_path().unwrap(),
            PathBuf::from("/tmp/dockpick-state/history")
        );
    }
}
