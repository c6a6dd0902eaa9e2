//! CLI module for stemmux
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// stemmux
///
/// Packages a mixdown and its stems into a single `.stem.m4a` container with
/// embedded stem metadata and descriptive tags, and reads that metadata back.
#[derive(Parser, Debug)]
#[command(name = "stemmux")]
#[command(about = "Create and inspect multi-track stem containers")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "STEMMUX_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log output format (pretty, json)
    #[arg(long, global = true, env = "STEMMUX_LOG_FORMAT")]
    pub log_format: Option<String>,

    /// Configuration file (default: ./stemmux.toml when present)
    #[arg(long, global = true, env = "STEMMUX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Timeout in seconds for each external tool invocation
    #[arg(long, global = true, env = "STEMMUX_TOOL_TIMEOUT")]
    pub tool_timeout: Option<u64>,

    /// Path to the MP4Box executable
    #[arg(long, global = true, env = "STEMMUX_MP4BOX")]
    pub mp4box: Option<PathBuf>,

    /// Path to the ffmpeg executable
    #[arg(long, global = true, env = "STEMMUX_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// Path to the ffprobe executable
    #[arg(long, global = true, env = "STEMMUX_FFPROBE")]
    pub ffprobe: Option<PathBuf>,

    /// Path to the qaac executable (Windows AAC encoding)
    #[arg(long, global = true, env = "STEMMUX_QAAC")]
    pub qaac: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Package a mixdown and its stems into a stem container
    Build(args::BuildArgs),
    /// Print the stem metadata embedded in a container
    Inspect(args::InspectArgs),
}
