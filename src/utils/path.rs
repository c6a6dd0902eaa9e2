//! Path utilities for stem containers

use std::path::{Path, PathBuf};

use crate::domain::errors::DomainError;

/// Extension of every container and transcoded track
pub const CONTAINER_EXTENSION: &str = "m4a";

/// Output path for a build
///
/// Without an explicit output the container lands next to the mixdown as
/// `<root>.stem.m4a`; an explicit path keeps its root and gets `.m4a`.
pub fn resolve_output_path(mixdown: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) => path.with_extension(CONTAINER_EXTENSION),
        None => {
            let mut root = mixdown.with_extension("").into_os_string();
            root.push(".stem.");
            root.push(CONTAINER_EXTENSION);
            PathBuf::from(root)
        }
    }
}

/// Path of the transcoded copy of `input` inside `work_dir`
pub fn transcoded_path(input: &Path, work_dir: &Path, slot: usize) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "track".to_string());
    work_dir.join(format!("{:02}_{}.{}", slot, stem, CONTAINER_EXTENSION))
}

/// Side file MP4Box writes when dumping the `stem` user-data atom
pub fn udta_dump_path(container: &Path) -> PathBuf {
    let mut root = container.with_extension("").into_os_string();
    root.push("_stem.udta");
    PathBuf::from(root)
}

/// Remove `path` if it exists; anything other than a file is an error
pub fn remove_existing_file(path: &Path) -> Result<(), DomainError> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_file() || meta.file_type().is_symlink() => {
            std::fs::remove_file(path)?;
            Ok(())
        }
        Ok(_) => Err(DomainError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("Cannot remove {}: not a file", path.display()),
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Deletes a file when dropped
///
/// Used for side files created by external tools so that they disappear on
/// every exit path.
#[derive(Debug)]
pub struct ScopedFile {
    path: PathBuf,
}

impl ScopedFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScopedFile {
    fn drop(&mut self) {
        if self.path.is_file() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                tracing::warn!("Failed to remove {}: {}", self.path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        let out = resolve_output_path(Path::new("/music/track.wav"), None);
        assert_eq!(out, PathBuf::from("/music/track.stem.m4a"));

        let out = resolve_output_path(Path::new("mix.m4a"), None);
        assert_eq!(out, PathBuf::from("mix.stem.m4a"));
    }

    #[test]
    fn test_explicit_output_path() {
        let out = resolve_output_path(Path::new("mix.wav"), Some(Path::new("out/final.mp4")));
        assert_eq!(out, PathBuf::from("out/final.m4a"));

        let out = resolve_output_path(Path::new("mix.wav"), Some(Path::new("out/final")));
        assert_eq!(out, PathBuf::from("out/final.m4a"));
    }

    #[test]
    fn test_transcoded_path_is_unique_per_slot() {
        let dir = Path::new("/tmp/work");
        let a = transcoded_path(Path::new("a/drums.wav"), dir, 1);
        let b = transcoded_path(Path::new("b/drums.wav"), dir, 2);
        assert_ne!(a, b);
        assert_eq!(a, PathBuf::from("/tmp/work/01_drums.m4a"));
    }

    #[test]
    fn test_udta_dump_path() {
        assert_eq!(
            udta_dump_path(Path::new("/x/song.stem.m4a")),
            PathBuf::from("/x/song.stem_stem.udta")
        );
    }

    #[test]
    fn test_remove_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("old.m4a");
        std::fs::write(&file, b"x").unwrap();

        remove_existing_file(&file).unwrap();
        assert!(!file.exists());
        remove_existing_file(&file).unwrap();
        assert!(remove_existing_file(dir.path()).is_err());
    }

    #[test]
    fn test_scoped_file_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("side.udta");
        std::fs::write(&file, b"x").unwrap();
        {
            let guard = ScopedFile::new(file.clone());
            assert_eq!(guard.path(), file.as_path());
        }
        assert!(!file.exists());
    }
}
