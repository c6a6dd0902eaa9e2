//! stemmux
//!
//! Packages a mixdown and its stems into a Native Instruments style
//! `.stem.m4a` container and reads the embedded stem metadata back.
//!
//! # Usage
//!
//! ```bash
//! stemmux build --mix song.wav --stems drums.wav bass.wav other.wav vox.wav \
//!     --metadata stems.json --tags tags.json
//! stemmux inspect --input song.stem.m4a --format json
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use stemmux::adapters::AppConfig;
use stemmux::app::DefaultAppContainer;
use stemmux::cli::{commands, Cli, Commands};
use stemmux::config_initialization::{initialize_configuration, ConfigOverrides};
use stemmux::domain::errors::DomainError;
use stemmux::utils::{LoggingConfig, LoggingSystem};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<DomainError>()
            .map(DomainError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = initialize_configuration(&ConfigOverrides::from(&cli))?;
    init_logging(&config)?;

    info!("Starting stemmux {}", env!("CARGO_PKG_VERSION"));

    let container = DefaultAppContainer::new(&config);
    match cli.command {
        Commands::Build(args) => commands::build(args, &container, &config).await?,
        Commands::Inspect(args) => commands::inspect(args, &container).await?,
    }

    info!("stemmux completed successfully");
    Ok(())
}

fn init_logging(config: &AppConfig) -> Result<(), DomainError> {
    let logging = LoggingSystem::new(LoggingConfig {
        level: config.log_level()?,
        format: config.log_format,
    });
    logging.initialize()
}
