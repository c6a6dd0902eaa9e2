//! MP4Box adapter
//!
//! Multiplexes the mixdown and stem tracks into one container and dumps the
//! `stem` user-data atom back out for inspection.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::adapters::process::ToolRunner;
use crate::adapters::tool_locator::{ToolPaths, MP4BOX};
use crate::domain::errors::*;
use crate::domain::udta::{udta_argument, STEM_ATOM};
use crate::ports::*;
use crate::tool_args;
use crate::utils::path::{udta_dump_path, ScopedFile};

/// Arguments for building a stem container
///
/// The mixdown is the enabled default track; every stem is added disabled.
pub fn mux_args(
    mixdown: &Path,
    stems: &[PathBuf],
    metadata_json: &[u8],
    output: &Path,
) -> Vec<OsString> {
    let mut args = tool_args!["-add", track_spec(mixdown, "#ID=Z"), output];
    for stem in stems {
        args.extend(tool_args!["-add", track_spec(stem, "#ID=Z:disable")]);
    }
    args.extend(tool_args!["-udta", udta_argument(metadata_json)]);
    args
}

/// Arguments for dumping the stem atom next to the container
pub fn dump_args(container: &Path) -> Vec<OsString> {
    tool_args!["-dump-udta", format!("0:{}", STEM_ATOM), container]
}

fn track_spec(track: &Path, options: &str) -> OsString {
    let mut spec = OsString::from(track);
    spec.push(options);
    spec
}

/// MP4Box backed multiplexer and metadata extractor
pub struct Mp4BoxAdapter {
    tools: Arc<ToolPaths>,
    runner: ToolRunner,
}

impl Mp4BoxAdapter {
    pub fn new(tools: Arc<ToolPaths>, runner: ToolRunner) -> Self {
        Self { tools, runner }
    }
}

#[async_trait]
impl MuxPort for Mp4BoxAdapter {
    async fn multiplex(
        &self,
        mixdown: &Path,
        stems: &[PathBuf],
        metadata_json: &[u8],
        output: &Path,
    ) -> Result<(), DomainError> {
        let mp4box = self.tools.mp4box()?;
        let args = mux_args(mixdown, stems, metadata_json, output);
        self.runner.run(MP4BOX, mp4box, &args).await?;
        debug!("Multiplexed {} stems into {}", stems.len(), output.display());
        Ok(())
    }
}

#[async_trait]
impl MetadataExtractPort for Mp4BoxAdapter {
    async fn extract(&self, container: &Path) -> Result<Vec<u8>, DomainError> {
        if !container.is_file() {
            return Err(DomainError::ResourceNotFound {
                path: container.display().to_string(),
            });
        }

        let mp4box = self.tools.mp4box()?;
        // Guard before running so a partial dump is removed too.
        let dump = ScopedFile::new(udta_dump_path(container));
        self.runner.run(MP4BOX, mp4box, &dump_args(container)).await?;

        std::fs::read(dump.path()).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DomainError::MetadataFormat(format!(
                "no stem metadata found in {}",
                container.display()
            )),
            _ => DomainError::Io(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::udta::decode_udta_argument;

    #[test]
    fn test_mux_args_layout() {
        let stems = vec![PathBuf::from("/w/01_drums.m4a"), PathBuf::from("/w/02_bass.m4a")];
        let args = mux_args(Path::new("/w/00_mix.m4a"), &stems, br#"{"stems":[]}"#, Path::new("song.stem.m4a"));
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();

        assert_eq!(
            &args[..7],
            [
                "-add",
                "/w/00_mix.m4a#ID=Z",
                "song.stem.m4a",
                "-add",
                "/w/01_drums.m4a#ID=Z:disable",
                "-add",
                "/w/02_bass.m4a#ID=Z:disable",
            ]
        );
        assert_eq!(args[7], "-udta");
        assert_eq!(decode_udta_argument(&args[8]).unwrap(), br#"{"stems":[]}"#);
        assert_eq!(args.len(), 9);
    }

    #[test]
    fn test_dump_args() {
        let args = dump_args(Path::new("song.stem.m4a"));
        assert_eq!(args, tool_args!["-dump-udta", "0:stem", "song.stem.m4a"]);
    }

    #[tokio::test]
    async fn test_extract_missing_container() {
        let adapter = Mp4BoxAdapter::new(Arc::new(ToolPaths::default()), ToolRunner::from_secs(5));
        let err = adapter
            .extract(Path::new("/nonexistent/song.stem.m4a"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ResourceNotFound { .. }));
    }
}
