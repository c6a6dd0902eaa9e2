//! Utility modules

pub mod logging;
pub mod path;

pub use logging::{LogFormat, LogLevel, LoggingConfig, LoggingSystem, StepProgress};
pub use path::{remove_existing_file, resolve_output_path, ScopedFile};
