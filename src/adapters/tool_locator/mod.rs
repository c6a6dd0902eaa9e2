//! Host environment adapter
//!
//! Resolves the external executables once at startup. A tool that cannot be
//! found is only reported when a command actually needs it.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::adapters::toml_config::{AppConfig, Platform};
use crate::domain::errors::DomainError;

pub const MP4BOX: &str = "MP4Box";
pub const FFMPEG: &str = "ffmpeg";
pub const FFPROBE: &str = "ffprobe";

/// qaac variants, in preference order
pub const QAAC_NAMES: &[&str] = &["qaac64", "qaac32", "qaac"];

/// Resolved tool locations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolPaths {
    pub mp4box: Option<PathBuf>,
    pub ffmpeg: Option<PathBuf>,
    pub ffprobe: Option<PathBuf>,
    /// Only looked up on Windows
    pub qaac: Option<PathBuf>,
}

impl ToolPaths {
    /// Locate every tool for the configured platform
    pub fn resolve(config: &AppConfig) -> Self {
        let locator = ToolLocator::from_env(config.platform);
        let paths = Self {
            mp4box: config
                .mp4box_path
                .clone()
                .or_else(|| locator.find_mp4box()),
            ffmpeg: config.ffmpeg_path.clone().or_else(|| locator.find(FFMPEG)),
            ffprobe: config.ffprobe_path.clone().or_else(|| locator.find(FFPROBE)),
            qaac: match config.platform {
                Platform::Windows => config.qaac_path.clone().or_else(|| {
                    QAAC_NAMES.iter().find_map(|name| locator.find(name))
                }),
                _ => config.qaac_path.clone(),
            },
        };
        debug!("Resolved tool paths: {:?}", paths);
        paths
    }

    pub fn mp4box(&self) -> Result<&Path, DomainError> {
        require(&self.mp4box, MP4BOX)
    }

    pub fn ffmpeg(&self) -> Result<&Path, DomainError> {
        require(&self.ffmpeg, FFMPEG)
    }

    pub fn ffprobe(&self) -> Result<&Path, DomainError> {
        require(&self.ffprobe, FFPROBE)
    }
}

fn require<'a>(path: &'a Option<PathBuf>, tool: &str) -> Result<&'a Path, DomainError> {
    path.as_deref()
        .ok_or_else(|| DomainError::ToolNotFound(tool.to_string()))
}

/// Searches the bundled tool directory and `PATH`
#[derive(Debug, Clone)]
pub struct ToolLocator {
    platform: Platform,
    exe_dir: Option<PathBuf>,
    search_path: Option<OsString>,
}

impl ToolLocator {
    pub fn new(platform: Platform, exe_dir: Option<PathBuf>, search_path: Option<OsString>) -> Self {
        Self {
            platform,
            exe_dir,
            search_path,
        }
    }

    /// Locator for the running process
    pub fn from_env(platform: Platform) -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self::new(platform, exe_dir, std::env::var_os("PATH"))
    }

    /// MP4Box ships next to the program on Windows and macOS
    pub fn find_mp4box(&self) -> Option<PathBuf> {
        let bundled = match self.platform {
            Platform::Windows => Some(Path::new("GPAC_win").join("mp4box.exe")),
            Platform::MacOs => Some(Path::new("GPAC_mac").join("MP4Box")),
            Platform::Linux => None,
        };

        if let (Some(relative), Some(dir)) = (bundled, &self.exe_dir) {
            let candidate = dir.join(relative);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        self.find(MP4BOX)
            .or_else(|| self.find(&MP4BOX.to_lowercase()))
    }

    /// Search `PATH` for an executable
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        let paths = self.search_path.as_ref()?;
        let file_name = self.executable_name(name);
        std::env::split_paths(paths)
            .map(|dir| dir.join(&file_name))
            .find(|candidate| candidate.is_file())
    }

    fn executable_name(&self, name: &str) -> String {
        if self.platform == Platform::Windows && !name.ends_with(".exe") {
            format!("{}.exe", name)
        } else {
            name.to_string()
        }
    }
}
