// Build interactor - Orchestrates stem container creation

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::domain::tagmap::map_tags;
use crate::ports::*;
use crate::utils::logging::StepProgress;
use crate::utils::path::{remove_existing_file, resolve_output_path};

/// Interactor for the build use case
pub struct BuildInteractor {
    transcode_port: Arc<dyn TranscodePort>,
    mux_port: Arc<dyn MuxPort>,
    tag_port: Arc<dyn TagWritePort>,
}

impl BuildInteractor {
    /// Create new build interactor with injected ports
    pub fn new(
        transcode_port: Arc<dyn TranscodePort>,
        mux_port: Arc<dyn MuxPort>,
        tag_port: Arc<dyn TagWritePort>,
    ) -> Self {
        Self {
            transcode_port,
            mux_port,
            tag_port,
        }
    }

    /// Build a stem container
    ///
    /// Input formats and tag values are checked before any external tool
    /// runs. Transcoded tracks live in a temporary directory that is removed
    /// on return.
    pub async fn execute(&self, request: BuildRequest) -> Result<BuildReport, DomainError> {
        let output = resolve_output_path(&request.mixdown, request.output.as_deref());
        info!("Building {} from {}", output.display(), request.mixdown.display());

        let mixdown_kind = check_input(&request.mixdown)?;
        let stem_kinds = request
            .stems
            .iter()
            .map(|stem| check_input(stem))
            .collect::<Result<Vec<_>, _>>()?;
        check_output_distinct(&output, &request.mixdown, &request.stems)?;

        let supplied = request.metadata.as_ref().map(|m| m.stems.as_slice());
        let outcome = MetadataMerger::merge_with_defaults(&request.stems, supplied);
        let metadata = StemMetadata {
            stems: outcome.stems.clone(),
            extra: request
                .metadata
                .as_ref()
                .map(|m| m.extra.clone())
                .unwrap_or_default(),
        };
        let metadata_json = metadata.to_json()?;

        let tag_entries = map_tags(&request.tags)?;

        let work_dir = tempfile::Builder::new().prefix("stemmux-").tempdir()?;
        let mut progress = StepProgress::new(request.stems.len() + 3);

        let mixdown = self
            .prepare_track(&request.mixdown, mixdown_kind, request.format, work_dir.path(), 0)
            .await?;
        progress.advance();

        let mut stems = Vec::with_capacity(request.stems.len());
        for (index, (stem, kind)) in request.stems.iter().zip(stem_kinds).enumerate() {
            let track = self
                .prepare_track(stem, kind, request.format, work_dir.path(), index + 1)
                .await?;
            stems.push(track);
            progress.advance();
        }

        remove_existing_file(&output)?;
        if let Err(e) = self
            .mux_port
            .multiplex(&mixdown, &stems, metadata_json.as_bytes(), &output)
            .await
        {
            discard_partial(&output);
            return Err(e);
        }
        progress.advance();

        if let Err(e) = self.tag_port.write_tags(&output, &tag_entries).await {
            discard_partial(&output);
            return Err(e);
        }
        progress.advance();

        info!("Created {}", output.display());
        Ok(BuildReport {
            output,
            stems: outcome.stems,
            tags_written: tag_entries.len(),
            notice: outcome.notice,
        })
    }

    async fn prepare_track(
        &self,
        input: &Path,
        kind: InputKind,
        format: AudioFormat,
        work_dir: &Path,
        slot: usize,
    ) -> Result<PathBuf, DomainError> {
        match kind {
            InputKind::Passthrough => Ok(input.to_path_buf()),
            InputKind::Convert => {
                self.transcode_port
                    .transcode(input, format, work_dir, slot)
                    .await
            }
        }
    }
}

fn check_input(path: &Path) -> Result<InputKind, DomainError> {
    let kind = InputKind::classify(path)?;
    if !path.is_file() {
        return Err(DomainError::ResourceNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(kind)
}

/// The output must not overwrite one of the inputs
fn check_output_distinct(output: &Path, mixdown: &Path, stems: &[PathBuf]) -> Result<(), DomainError> {
    // A missing output cannot alias an input, since every input exists.
    let Ok(target) = output.canonicalize() else {
        return Ok(());
    };
    for input in std::iter::once(mixdown).chain(stems.iter().map(PathBuf::as_path)) {
        if input.canonicalize()? == target {
            return Err(DomainError::Config(format!(
                "output {} would overwrite input track {}",
                output.display(),
                input.display()
            )));
        }
    }
    Ok(())
}

fn discard_partial(output: &Path) {
    if let Err(cleanup) = remove_existing_file(output) {
        warn!("Failed to remove partial container {}: {}", output.display(), cleanup);
    }
}

/// Request for the build use case
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub mixdown: PathBuf,
    pub stems: Vec<PathBuf>,
    pub format: AudioFormat,
    /// Supplied stem metadata; `None` uses defaults only
    pub metadata: Option<StemMetadata>,
    pub tags: TagSet,
    pub output: Option<PathBuf>,
}

impl BuildRequest {
    pub fn new(mixdown: PathBuf, stems: Vec<PathBuf>) -> Self {
        Self {
            mixdown,
            stems,
            format: AudioFormat::default(),
            metadata: None,
            tags: TagSet::new(),
            output: None,
        }
    }
}

/// Summary of a finished build
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub output: PathBuf,
    /// Stem table embedded in the container
    pub stems: StemTable,
    /// Tag entries written, stem marker included
    pub tags_written: usize,
    pub notice: Option<PaddingNotice>,
}
