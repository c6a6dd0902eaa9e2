// TOML config adapter - Configuration loaded from TOML files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::*;
use crate::domain::model::AudioFormat;
use crate::utils::logging::{LogFormat, LogLevel};

/// Name of the configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "stemmux.toml";

/// Host platform, resolved once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
}

impl Platform {
    /// Platform this binary was built for
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::MacOs
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

/// Resolved application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub log_level: String,
    pub log_format: LogFormat,
    /// Codec used by `build` when none is given on the command line
    pub default_format: AudioFormat,
    /// Upper bound for every external tool invocation
    pub tool_timeout_secs: u64,
    pub mp4box_path: Option<PathBuf>,
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
    pub qaac_path: Option<PathBuf>,
    #[serde(skip)]
    pub platform: Platform,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            default_format: AudioFormat::Alac,
            tool_timeout_secs: 600,
            mp4box_path: None,
            ffmpeg_path: None,
            ffprobe_path: None,
            qaac_path: None,
            platform: Platform::current(),
        }
    }
}

impl AppConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        LogLevel::parse(&self.log_level)?;
        if self.tool_timeout_secs == 0 {
            return Err(DomainError::Config(
                "tool_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn log_level(&self) -> Result<LogLevel, DomainError> {
        LogLevel::parse(&self.log_level)
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    stemmux: Option<AppConfig>,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse a configuration document with a `[stemmux]` table
    pub fn parse_str(toml_content: &str) -> Result<AppConfig, DomainError> {
        let parsed: ConfigFile = toml::from_str(toml_content)
            .map_err(|e| DomainError::Config(format!("Failed to parse TOML config: {}", e)))?;
        Ok(parsed.stemmux.unwrap_or_default())
    }

    /// Load configuration from file
    pub fn load_file(path: &Path) -> Result<AppConfig, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse_str(&content)
    }

    /// Config file in the working directory, if present
    pub fn default_config_path() -> Option<PathBuf> {
        let path = PathBuf::from(DEFAULT_CONFIG_FILE);
        path.is_file().then_some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfigAdapter::parse_str(
            r#"
            [stemmux]
            log_level = "debug"
            log_format = "json"
            default_format = "aac"
            tool_timeout_secs = 30
            mp4box_path = "/opt/gpac/MP4Box"
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.default_format, AudioFormat::Aac);
        assert_eq!(config.tool_timeout_secs, 30);
        assert_eq!(config.mp4box_path, Some(PathBuf::from("/opt/gpac/MP4Box")));
        assert_eq!(config.ffmpeg_path, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_table_uses_defaults() {
        let config = TomlConfigAdapter::parse_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = TomlConfigAdapter::parse_str("[stemmux]\ncrf = 18\n");
        assert!(matches!(result, Err(DomainError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = AppConfig {
            log_level: "loud".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            tool_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
