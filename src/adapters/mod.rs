// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod exec_mp4box;
pub mod process;
pub mod tag_mp4ameta;
pub mod toml_config;
pub mod tool_locator;

// Re-export adapters
pub use exec_ffmpeg::FfmpegTranscoder;
pub use exec_mp4box::Mp4BoxAdapter;
pub use process::ToolRunner;
pub use tag_mp4ameta::Mp4ametaTagWriter;
pub use toml_config::{AppConfig, Platform, TomlConfigAdapter};
pub use tool_locator::ToolPaths;
