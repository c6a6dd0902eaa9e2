// Unit tests for domain models

use super::*;
use serde_json::json;
use std::path::Path;

#[test]
fn test_stem_entry_valid() {
    let entry = StemEntry::new("Drums", "#009E73").unwrap();
    assert_eq!(entry.name, "Drums");
    assert_eq!(entry.color, "#009E73");
}

#[test]
fn test_stem_entry_invalid() {
    assert!(StemEntry::new("", "#009E73").is_err());
    assert!(StemEntry::new("Bass", "009E73").is_err());
    assert!(StemEntry::new("Bass", "#09E73").is_err());
    assert!(StemEntry::new("Bass", "#GG9E73").is_err());
}

#[test]
fn test_placeholder_entry() {
    let entry = StemEntry::placeholder(5);
    assert_eq!(entry.name, "Stem_5");
    assert_eq!(entry.color, PLACEHOLDER_COLOR);
    assert!(entry.validate().is_ok());
}

#[test]
fn test_metadata_parse_keeps_extra_keys() {
    let json = r##"{"stems":[{"name":"Kick","color":"#FF0000"}],"version":1}"##;
    let metadata = StemMetadata::from_json_str(json).unwrap();

    assert_eq!(metadata.stems.len(), 1);
    assert_eq!(metadata.extra.get("version"), Some(&json!(1)));

    let reparsed = StemMetadata::from_json_str(&metadata.to_json().unwrap()).unwrap();
    assert_eq!(reparsed, metadata);
}

#[test]
fn test_metadata_parse_rejects_bad_shapes() {
    let cases = [
        "not json",
        "[]",
        r#"{"tracks": []}"#,
        r#"{"stems": [{"name": "Kick"}]}"#,
        r##"{"stems": [{"name": "", "color": "#000000"}]}"##,
        r#"{"stems": [{"name": "Kick", "color": "red"}]}"#,
    ];
    for case in cases {
        assert!(
            matches!(StemMetadata::from_json_str(case), Err(DomainError::MetadataFormat(_))),
            "expected MetadataFormat error for {}",
            case
        );
    }
}

#[test]
fn test_audio_format_parse() {
    assert_eq!(AudioFormat::parse("alac").unwrap(), AudioFormat::Alac);
    assert_eq!(AudioFormat::parse("AAC").unwrap(), AudioFormat::Aac);
    assert!(AudioFormat::parse("mp3").is_err());
    assert_eq!(AudioFormat::default(), AudioFormat::Alac);
}

#[test]
fn test_input_kind_classification() {
    assert_eq!(InputKind::classify(Path::new("mix.m4a")).unwrap(), InputKind::Passthrough);
    assert_eq!(InputKind::classify(Path::new("mix.MP4")).unwrap(), InputKind::Passthrough);
    assert_eq!(InputKind::classify(Path::new("drums.wav")).unwrap(), InputKind::Convert);
    assert_eq!(InputKind::classify(Path::new("bass.aiff")).unwrap(), InputKind::Convert);
    assert_eq!(InputKind::classify(Path::new("vox.flac")).unwrap(), InputKind::Convert);

    let err = InputKind::classify(Path::new("song.mp3")).unwrap_err();
    match err {
        DomainError::UnsupportedInputFormat { extension, .. } => assert_eq!(extension, ".mp3"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(InputKind::classify(Path::new("no_extension")).is_err());
}

#[test]
fn test_tag_value_from_json() {
    assert_eq!(TagValue::from_json(&json!("x")), Some(TagValue::Text("x".into())));
    assert_eq!(TagValue::from_json(&json!(128)), Some(TagValue::Integer(128)));
    assert_eq!(TagValue::from_json(&json!(128.0)), Some(TagValue::Integer(128)));
    assert_eq!(TagValue::from_json(&json!(128.5)), Some(TagValue::Text("128.5".into())));
    assert_eq!(TagValue::from_json(&json!([3, 10])), Some(TagValue::Pair(3, 10)));
    assert_eq!(TagValue::from_json(&json!([[3, 10]])), Some(TagValue::Pair(3, 10)));
    assert_eq!(TagValue::from_json(&json!([3])), None);
    assert_eq!(TagValue::from_json(&json!({"a": 1})), None);
    assert_eq!(TagValue::from_json(&json!(null)), None);
    assert_eq!(TagValue::from_json(&json!(true)), None);
}

#[test]
fn test_tag_set_from_json() {
    let tags = TagSet::from_json_str(r#"{"title": "Song", "bpm": 120, "extra": {"x": 1}}"#).unwrap();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags.get("title"), Some(&TagValue::Text("Song".into())));
    assert_eq!(tags.get("bpm"), Some(&TagValue::Integer(120)));
    assert!(!tags.contains("extra"));

    assert!(matches!(
        TagSet::from_json_str("[1, 2]"),
        Err(DomainError::InvalidTagSource(_))
    ));
}

#[test]
fn test_tag_set_rejects_invalid_utf8() {
    assert!(matches!(
        TagSet::from_json_slice(b"{\"title\": \"\xff\"}"),
        Err(DomainError::InvalidTagSource(_))
    ));
    let tags = TagSet::from_json_slice("{\"artist\": \"Sigur Rós\"}".as_bytes()).unwrap();
    assert_eq!(tags.get("artist"), Some(&TagValue::Text("Sigur Rós".into())));
}

#[test]
fn test_tag_key_display() {
    assert_eq!(TagKey::Atom(*b"\xa9nam").to_string(), "\u{a9}nam");
    assert_eq!(TagKey::Atom(*b"TAUT").to_string(), "TAUT");
    assert_eq!(
        TagKey::FreeForm("LABEL").to_string(),
        "----:com.apple.iTunes:LABEL"
    );
}

#[test]
fn test_image_format_from_path() {
    assert_eq!(ImageFormat::from_path("cover.png"), ImageFormat::Png);
    assert_eq!(ImageFormat::from_path("cover.PNG"), ImageFormat::Png);
    assert_eq!(ImageFormat::from_path("cover.jpg"), ImageFormat::Jpeg);
    assert_eq!(ImageFormat::from_path("cover"), ImageFormat::Jpeg);
}
