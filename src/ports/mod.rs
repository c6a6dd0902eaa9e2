// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for converting source audio into container-ready tracks
#[async_trait]
pub trait TranscodePort: Send + Sync {
    /// Transcode `input` to `format`, writing into `work_dir`
    ///
    /// `slot` distinguishes inputs that share a file name. The returned path
    /// always carries the `.m4a` extension.
    async fn transcode(
        &self,
        input: &Path,
        format: AudioFormat,
        work_dir: &Path,
        slot: usize,
    ) -> Result<PathBuf, DomainError>;
}

/// Port for multiplexing tracks and metadata into one container
#[async_trait]
pub trait MuxPort: Send + Sync {
    /// Write `output` holding the mixdown, the stems (in order) and the
    /// metadata JSON. Any existing file at `output` is replaced.
    async fn multiplex(
        &self,
        mixdown: &Path,
        stems: &[PathBuf],
        metadata_json: &[u8],
        output: &Path,
    ) -> Result<(), DomainError>;
}

/// Port for persisting tags onto a produced container
#[async_trait]
pub trait TagWritePort: Send + Sync {
    /// Write `entries` onto `container`
    async fn write_tags(
        &self,
        container: &Path,
        entries: &[ContainerTagEntry],
    ) -> Result<(), DomainError>;
}

/// Port for reading the embedded stem metadata atom
#[async_trait]
pub trait MetadataExtractPort: Send + Sync {
    /// Raw `stem` atom bytes, header included
    async fn extract(&self, container: &Path) -> Result<Vec<u8>, DomainError>;
}
