// Inspect interactor - Reads embedded stem metadata back out of a container

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::udta::parse_extracted;
use crate::ports::*;

/// Interactor for the inspect use case
pub struct InspectInteractor {
    extract_port: Arc<dyn MetadataExtractPort>,
}

impl InspectInteractor {
    /// Create new inspect interactor with injected ports
    pub fn new(extract_port: Arc<dyn MetadataExtractPort>) -> Self {
        Self { extract_port }
    }

    /// Extract and render the stem metadata of a container
    pub async fn execute(&self, request: InspectRequest) -> Result<InspectResponse, DomainError> {
        info!("Inspecting {}", request.input.display());

        let atom = self.extract_port.extract(&request.input).await?;
        let metadata = parse_extracted(&atom)?;
        info!("Found {} stems", metadata.stems.len());

        let json = metadata.to_json()?;
        let report = format_report(&metadata.stems);
        let rendered = match request.format {
            InspectFormat::Json => json.clone(),
            InspectFormat::Yaml => format_as_yaml(&metadata)?,
            InspectFormat::Text => report.clone(),
        };

        Ok(InspectResponse {
            metadata,
            json,
            report,
            rendered,
        })
    }
}

/// Fixed-width report, one line per stem with a 1-based index
pub fn format_report(stems: &[StemEntry]) -> String {
    stems
        .iter()
        .enumerate()
        .map(|(i, stem)| {
            format!(
                "Track {:>3}      name: {:>15}     color: {:>8}\n",
                i + 1,
                stem.name,
                stem.color
            )
        })
        .collect()
}

fn format_as_yaml(metadata: &StemMetadata) -> Result<String, DomainError> {
    serde_yaml::to_string(metadata)
        .map_err(|e| DomainError::MetadataFormat(format!("YAML serialization failed: {}", e)))
}

/// Rendering of inspected metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InspectFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl InspectFormat {
    pub fn parse(format: &str) -> Result<Self, DomainError> {
        match format.trim().to_lowercase().as_str() {
            "text" => Ok(InspectFormat::Text),
            "json" => Ok(InspectFormat::Json),
            "yaml" | "yml" => Ok(InspectFormat::Yaml),
            other => Err(DomainError::Config(format!(
                "Invalid output format '{}'. Valid formats: text, json, yaml",
                other
            ))),
        }
    }
}

/// Request for the inspect use case
#[derive(Debug, Clone)]
pub struct InspectRequest {
    pub input: PathBuf,
    pub format: InspectFormat,
}

impl InspectRequest {
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            format: InspectFormat::default(),
        }
    }

    pub fn with_format(input: PathBuf, format: InspectFormat) -> Self {
        Self { input, format }
    }
}

/// Response from the inspect use case
#[derive(Debug, Clone)]
pub struct InspectResponse {
    pub metadata: StemMetadata,
    /// Compact JSON document
    pub json: String,
    /// Text report
    pub report: String,
    /// Output in the requested format
    pub rendered: String,
}
