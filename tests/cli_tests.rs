use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn stemmux(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stemmux").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("STEMMUX_CONFIG")
        .env_remove("STEMMUX_LOG_LEVEL")
        .env_remove("STEMMUX_LOG_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    stemmux(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn test_build_requires_stems() {
    let dir = TempDir::new().unwrap();
    stemmux(&dir)
        .args(["build", "--mix", "mix.wav"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--stems"));
}

#[test]
fn test_build_rejects_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("mix.wav"), b"").unwrap();
    std::fs::write(dir.path().join("drums.ogg"), b"").unwrap();

    stemmux(&dir)
        .args(["build", "--mix", "mix.wav", "--stems", "drums.ogg"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported input format \".ogg\""));
}

#[test]
fn test_build_missing_tags_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("mix.wav"), b"").unwrap();
    std::fs::write(dir.path().join("drums.wav"), b"").unwrap();

    stemmux(&dir)
        .args(["build", "--mix", "mix.wav", "--stems", "drums.wav", "--tags", "tags.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Resource not found: tags.json"));
}

#[test]
fn test_build_rejects_bad_tag_value() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("mix.wav"), b"").unwrap();
    std::fs::write(dir.path().join("drums.wav"), b"").unwrap();
    std::fs::write(dir.path().join("tags.json"), br#"{"bpm": "fast"}"#).unwrap();

    stemmux(&dir)
        .args(["build", "--mix", "mix.wav", "--stems", "drums.wav", "--tags", "tags.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("bpm"));
    assert!(!dir.path().join("mix.stem.m4a").exists());
}

#[test]
fn test_build_rejects_non_utf8_tags_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("mix.wav"), b"").unwrap();
    std::fs::write(dir.path().join("drums.wav"), b"").unwrap();
    std::fs::write(dir.path().join("tags.json"), b"{\"title\": \"\xff\"}").unwrap();

    stemmux(&dir)
        .args(["build", "--mix", "mix.wav", "--stems", "drums.wav", "--tags", "tags.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid tag source"));
    assert!(!dir.path().join("mix.stem.m4a").exists());
}

#[test]
fn test_build_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    stemmux(&dir)
        .args(["build", "--mix", "mix.wav", "--stems", "a.wav", "--format", "mp3"])
        .assert()
        .code(3);
}

#[test]
fn test_inspect_missing_container() {
    let dir = TempDir::new().unwrap();
    stemmux(&dir)
        .args(["inspect", "--input", "missing.stem.m4a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.stem.m4a"));
}

#[test]
fn test_invalid_config_file_exits_with_config_code() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("stemmux.toml"), "[stemmux]\ntool_timeout_secs = 0\n").unwrap();

    stemmux(&dir)
        .args(["inspect", "--input", "song.stem.m4a"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("tool_timeout_secs"));
}
