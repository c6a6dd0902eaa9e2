//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use tracing::debug;

use crate::adapters::toml_config::{AppConfig, TomlConfigAdapter};
use crate::cli::Cli;
use crate::domain::errors::DomainError;
use crate::utils::logging::LogFormat;

/// Values given on the command line or through `STEMMUX_*` variables
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub tool_timeout_secs: Option<u64>,
    pub mp4box_path: Option<PathBuf>,
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
    pub qaac_path: Option<PathBuf>,
}

impl From<&Cli> for ConfigOverrides {
    fn from(cli: &Cli) -> Self {
        Self {
            config_file: cli.config.clone(),
            log_level: cli.log_level.clone(),
            log_format: cli.log_format.clone(),
            tool_timeout_secs: cli.tool_timeout,
            mp4box_path: cli.mp4box.clone(),
            ffmpeg_path: cli.ffmpeg.clone(),
            ffprobe_path: cli.ffprobe.clone(),
            qaac_path: cli.qaac.clone(),
        }
    }
}

/// Resolve configuration following precedence: CLI > Env > File > Defaults
///
/// clap already folds environment variables into the CLI values, so this
/// only has to layer them over the file.
pub fn initialize_configuration(overrides: &ConfigOverrides) -> Result<AppConfig, DomainError> {
    let base = match &overrides.config_file {
        Some(path) => TomlConfigAdapter::load_file(path)?,
        None => match TomlConfigAdapter::default_config_path() {
            Some(path) => TomlConfigAdapter::load_file(&path)?,
            None => AppConfig::default(),
        },
    };

    let config = apply_overrides(base, overrides)?;
    config.validate()?;
    Ok(config)
}

/// Layer explicit overrides over a loaded configuration
pub fn apply_overrides(
    mut config: AppConfig,
    overrides: &ConfigOverrides,
) -> Result<AppConfig, DomainError> {
    let mut applied = 0;

    if let Some(level) = &overrides.log_level {
        config.log_level = level.clone();
        applied += 1;
    }
    if let Some(format) = &overrides.log_format {
        config.log_format = LogFormat::parse(format)?;
        applied += 1;
    }
    if let Some(timeout) = overrides.tool_timeout_secs {
        config.tool_timeout_secs = timeout;
        applied += 1;
    }

    let tool_paths = [
        (&overrides.mp4box_path, &mut config.mp4box_path),
        (&overrides.ffmpeg_path, &mut config.ffmpeg_path),
        (&overrides.ffprobe_path, &mut config.ffprobe_path),
        (&overrides.qaac_path, &mut config.qaac_path),
    ];
    for (value, slot) in tool_paths {
        if value.is_some() {
            *slot = value.clone();
            applied += 1;
        }
    }

    if applied > 0 {
        debug!("Applied {} configuration overrides", applied);
    }
    Ok(config)
}
