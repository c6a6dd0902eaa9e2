//! Command implementations

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::AppConfig;
use crate::app::{AppContainer, BuildRequest, InspectFormat, InspectRequest};
use crate::cli::args::{BuildArgs, InspectArgs};
use crate::domain::errors::DomainError;
use crate::domain::model::{AudioFormat, StemMetadata, TagSet};

/// Execute the build command
pub async fn build(args: BuildArgs, container: &dyn AppContainer, config: &AppConfig) -> Result<()> {
    info!("Starting build operation");
    info!("Mixdown: {}", args.mix.display());
    info!("Stems: {}", args.stems.len());

    let format = match args.format.as_deref() {
        Some(format) => AudioFormat::parse(format)?,
        None => config.default_format,
    };

    let metadata = match &args.metadata {
        Some(path) => {
            let bytes = read_input_file(path)?;
            let metadata = StemMetadata::from_json_slice(&bytes)
                .with_context(|| format!("Failed to load stem metadata from {}", path.display()))?;
            Some(metadata)
        }
        None => None,
    };

    let tags = match &args.tags {
        Some(path) => {
            let bytes = read_input_file(path)?;
            TagSet::from_json_slice(&bytes)
                .with_context(|| format!("Failed to load tags from {}", path.display()))?
        }
        None => TagSet::new(),
    };

    let request = BuildRequest {
        mixdown: args.mix,
        stems: args.stems,
        format,
        metadata,
        tags,
        output: args.output,
    };

    let report = container
        .build_interactor()
        .execute(request)
        .await
        .context("Failed to build stem container")?;

    if let Some(notice) = &report.notice {
        info!("{}", notice);
    }
    info!(
        "Build completed: {} stems, {} tags",
        report.stems.len(),
        report.tags_written
    );
    println!("{}", report.output.display());
    Ok(())
}

/// Execute the inspect command
pub async fn inspect(args: InspectArgs, container: &dyn AppContainer) -> Result<()> {
    info!("Starting inspect operation");
    info!("Input: {}", args.input.display());

    let format = InspectFormat::parse(&args.format)?;
    let response = container
        .inspect_interactor()
        .execute(InspectRequest::with_format(args.input.clone(), format))
        .await
        .with_context(|| format!("Failed to inspect {}", args.input.display()))?;

    match format {
        InspectFormat::Json => println!("{}", response.rendered),
        InspectFormat::Yaml | InspectFormat::Text => print!("{}", response.rendered),
    }

    if let Some(path) = &args.metadata_out {
        std::fs::write(path, &response.json)
            .with_context(|| format!("Failed to write metadata to {}", path.display()))?;
        info!("Metadata written to {}", path.display());
    }
    if let Some(path) = &args.report_out {
        std::fs::write(path, &response.report)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    info!("Inspect operation completed successfully");
    Ok(())
}

fn read_input_file(path: &Path) -> Result<Vec<u8>, DomainError> {
    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DomainError::ResourceNotFound {
            path: path.display().to_string(),
        },
        _ => DomainError::Io(e),
    })
}
