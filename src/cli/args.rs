//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Mixdown track (.wav, .wave, .aif, .aiff, .flac, .m4a, .mp4, .m4p)
    #[arg(short = 'x', long = "mix")]
    pub mix: PathBuf,

    /// Stem tracks, in container order
    #[arg(short, long, num_args = 1.., required = true)]
    pub stems: Vec<PathBuf>,

    /// Codec for transcoded tracks (alac, aac; default from config)
    #[arg(short, long)]
    pub format: Option<String>,

    /// JSON file with stem names and colors
    #[arg(short, long)]
    pub metadata: Option<PathBuf>,

    /// JSON file with descriptive tags
    #[arg(short, long)]
    pub tags: Option<PathBuf>,

    /// Output file path (default: <mix>.stem.m4a)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Stem container to read
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output format (text, json, yaml)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Also write the metadata JSON to this file
    #[arg(long)]
    pub metadata_out: Option<PathBuf>,

    /// Also write the text report to this file
    #[arg(long)]
    pub report_out: Option<PathBuf>,
}
