//! FFmpeg transcoding adapter
//!
//! Converts uncompressed or lossless sources into `.m4a` tracks that MP4Box
//! can multiplex. ALAC goes straight through ffmpeg; AAC picks the best
//! encoder the local ffmpeg build offers, or qaac on Windows when installed.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::adapters::process::ToolRunner;
use crate::adapters::tool_locator::{ToolPaths, FFMPEG, FFPROBE};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use crate::tool_args;
use crate::utils::path::transcoded_path;

/// Highest sample rate passed to the AAC encoders
pub const MAX_AAC_SAMPLE_RATE: u32 = 48_000;

const AAC_CODEC_DESCRIPTION: &str = "AAC (Advanced Audio Coding)";

/// AAC encoders in preference order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AacEncoder {
    AudioToolbox,
    FdkAac,
    Native,
}

impl AacEncoder {
    pub fn codec_name(&self) -> &'static str {
        match self {
            AacEncoder::AudioToolbox => "aac_at",
            AacEncoder::FdkAac => "libfdk_aac",
            AacEncoder::Native => "aac",
        }
    }

    /// Encoder-specific quality arguments
    pub fn quality_args(&self) -> &'static [&'static str] {
        match self {
            AacEncoder::AudioToolbox => &["-q:a", "0"],
            AacEncoder::FdkAac => &["-vbr", "5"],
            AacEncoder::Native => &[],
        }
    }
}

/// Encoder names listed for the AAC codec in `ffmpeg -codecs` output
pub fn parse_aac_encoders(codecs_output: &str) -> Option<Vec<String>> {
    let line = codecs_output
        .lines()
        .find(|line| line.contains(AAC_CODEC_DESCRIPTION))?;
    let start = line.find("(encoders: ")? + "(encoders: ".len();
    let rest = &line[start..];
    let end = rest.find(')')?;
    let encoders: Vec<String> = rest[..end]
        .split_whitespace()
        .map(str::to_string)
        .collect();
    (!encoders.is_empty()).then_some(encoders)
}

/// Pick the preferred encoder from the ones ffmpeg reports
pub fn select_aac_encoder(available: Option<&[String]>) -> AacEncoder {
    let has = |name: &str| available.map_or(false, |list| list.iter().any(|e| e == name));
    if has("aac_at") {
        AacEncoder::AudioToolbox
    } else if has("libfdk_aac") {
        AacEncoder::FdkAac
    } else {
        AacEncoder::Native
    }
}

/// First line of ffprobe's `sample_rate` output
pub fn parse_sample_rate(probe_output: &str) -> Option<u32> {
    probe_output.lines().next()?.trim().parse().ok()
}

/// ffmpeg arguments for an ALAC conversion
pub fn alac_args(input: &Path, output: &Path) -> Vec<OsString> {
    tool_args!["-y", "-i", input, "-c:a", "alac", "-c:v", "copy", output]
}

/// ffmpeg arguments for an AAC conversion
pub fn aac_args(
    input: &Path,
    output: &Path,
    encoder: AacEncoder,
    sample_rate: Option<u32>,
) -> Vec<OsString> {
    let mut args = tool_args!["-y", "-i", input, "-c:a", encoder.codec_name()];
    args.extend(encoder.quality_args().iter().map(OsString::from));
    args.extend(tool_args!["-c:v", "copy"]);
    if sample_rate.map_or(false, |rate| rate > MAX_AAC_SAMPLE_RATE) {
        args.extend(tool_args!["-ar", MAX_AAC_SAMPLE_RATE.to_string()]);
    }
    args.push(output.into());
    args
}

/// qaac arguments for an AAC conversion
pub fn qaac_args(input: &Path, output: &Path) -> Vec<OsString> {
    tool_args![input, "--tvbr", "127", "-o", output]
}

/// ffmpeg/qaac backed transcoder
pub struct FfmpegTranscoder {
    tools: Arc<ToolPaths>,
    runner: ToolRunner,
    aac_encoder: OnceCell<AacEncoder>,
}

impl FfmpegTranscoder {
    pub fn new(tools: Arc<ToolPaths>, runner: ToolRunner) -> Self {
        Self {
            tools,
            runner,
            aac_encoder: OnceCell::new(),
        }
    }

    /// Query ffmpeg once for its AAC encoders
    async fn aac_encoder(&self) -> Result<AacEncoder, DomainError> {
        self.aac_encoder
            .get_or_try_init(|| async {
                let ffmpeg = self.tools.ffmpeg()?;
                let output = self
                    .runner
                    .run(FFMPEG, ffmpeg, &tool_args!["-v", "error", "-codecs"])
                    .await?;
                let encoders = parse_aac_encoders(&output.stdout);
                let encoder = select_aac_encoder(encoders.as_deref());
                if encoder == AacEncoder::Native {
                    warn!("For better audio quality, install `aac_at` or `libfdk_aac` codec.");
                }
                Ok::<_, DomainError>(encoder)
            })
            .await
            .copied()
    }

    async fn sample_rate(&self, input: &Path) -> Result<u32, DomainError> {
        let ffprobe = self.tools.ffprobe()?;
        let args = tool_args![
            "-v",
            "error",
            "-select_streams",
            "a",
            "-show_entries",
            "stream=sample_rate",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
            input,
        ];
        let output = self.runner.run(FFPROBE, ffprobe, &args).await?;
        parse_sample_rate(&output.stdout).ok_or_else(|| DomainError::ExternalTool {
            tool: FFPROBE.to_string(),
            status: None,
            stderr: format!("unexpected sample rate output: {:?}", output.stdout.trim()),
        })
    }

    async fn encode_aac(&self, input: &Path, output: &Path) -> Result<(), DomainError> {
        if let Some(qaac) = &self.tools.qaac {
            info!("using QAAC Audio Toolbox codec");
            self.runner.run("qaac", qaac, &qaac_args(input, output)).await?;
            return Ok(());
        }

        let encoder = self.aac_encoder().await?;
        let sample_rate = self.sample_rate(input).await?;
        info!("using {} codec", encoder.codec_name());
        if sample_rate > MAX_AAC_SAMPLE_RATE {
            info!("{}Hz sample rate, downsampling to 48kHz", sample_rate);
        }

        let ffmpeg = self.tools.ffmpeg()?;
        self.runner
            .run(FFMPEG, ffmpeg, &aac_args(input, output, encoder, Some(sample_rate)))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl TranscodePort for FfmpegTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        format: AudioFormat,
        work_dir: &Path,
        slot: usize,
    ) -> Result<PathBuf, DomainError> {
        let output = transcoded_path(input, work_dir, slot);
        info!("converting {} to {}...", input.display(), format);

        match format {
            AudioFormat::Alac => {
                let ffmpeg = self.tools.ffmpeg()?;
                self.runner.run(FFMPEG, ffmpeg, &alac_args(input, &output)).await?;
            }
            AudioFormat::Aac => self.encode_aac(input, &output).await?,
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODECS_OUTPUT: &str = "\
 DEA.L. aac                  AAC (Advanced Audio Coding) (decoders: aac aac_fixed aac_at ) (encoders: aac aac_at )
 D.A.L. aac_latm             AAC LATM (Advanced Audio Coding LATM syntax)
 DEAIL. alac                 ALAC (Apple Lossless Audio Codec) (encoders: alac alac_at )
";

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_parse_aac_encoders() {
        assert_eq!(
            parse_aac_encoders(CODECS_OUTPUT),
            Some(vec!["aac".to_string(), "aac_at".to_string()])
        );
        assert_eq!(parse_aac_encoders(" DEA.L. aac   AAC (Advanced Audio Coding)\n"), None);
        assert_eq!(parse_aac_encoders(""), None);
    }

    #[test]
    fn test_encoder_preference() {
        let list = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<Vec<_>>();

        assert_eq!(
            select_aac_encoder(Some(list(&["aac", "libfdk_aac", "aac_at"]).as_slice())),
            AacEncoder::AudioToolbox
        );
        assert_eq!(
            select_aac_encoder(Some(list(&["aac", "libfdk_aac"]).as_slice())),
            AacEncoder::FdkAac
        );
        assert_eq!(select_aac_encoder(Some(list(&["aac"]).as_slice())), AacEncoder::Native);
        assert_eq!(select_aac_encoder(None), AacEncoder::Native);
    }

    #[test]
    fn test_parse_sample_rate() {
        assert_eq!(parse_sample_rate("96000\n"), Some(96000));
        assert_eq!(parse_sample_rate("44100\n48000\n"), Some(44100));
        assert_eq!(parse_sample_rate("N/A\n"), None);
    }

    #[test]
    fn test_alac_args() {
        let args = alac_args(Path::new("drums.wav"), Path::new("/tmp/w/01_drums.m4a"));
        assert_eq!(
            strings(&args),
            ["-y", "-i", "drums.wav", "-c:a", "alac", "-c:v", "copy", "/tmp/w/01_drums.m4a"]
        );
    }

    #[test]
    fn test_aac_args_downsample_high_rates() {
        let args = aac_args(
            Path::new("mix.flac"),
            Path::new("out.m4a"),
            AacEncoder::FdkAac,
            Some(96000),
        );
        assert_eq!(
            strings(&args),
            [
                "-y", "-i", "mix.flac", "-c:a", "libfdk_aac", "-vbr", "5", "-c:v", "copy", "-ar",
                "48000", "out.m4a"
            ]
        );

        let args = aac_args(
            Path::new("mix.flac"),
            Path::new("out.m4a"),
            AacEncoder::AudioToolbox,
            Some(48000),
        );
        assert_eq!(
            strings(&args),
            ["-y", "-i", "mix.flac", "-c:a", "aac_at", "-q:a", "0", "-c:v", "copy", "out.m4a"]
        );
    }

    #[test]
    fn test_qaac_args() {
        let args = qaac_args(Path::new("vox.aiff"), Path::new("vox.m4a"));
        assert_eq!(strings(&args), ["vox.aiff", "--tvbr", "127", "-o", "vox.m4a"]);
    }

    #[tokio::test]
    async fn test_missing_ffmpeg_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let transcoder = FfmpegTranscoder::new(Arc::new(ToolPaths::default()), ToolRunner::from_secs(5));
        let err = transcoder
            .transcode(Path::new("bass.wav"), AudioFormat::Alac, dir.path(), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ToolNotFound(name) if name == "ffmpeg"));
    }
}
