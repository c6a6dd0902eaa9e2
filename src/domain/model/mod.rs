// Domain models - Core types and data structures

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::errors::DomainError;

/// Color used for synthesized placeholder stems
pub const PLACEHOLDER_COLOR: &str = "#000000";

/// Display identity of one audio stem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StemEntry {
    pub name: String,
    pub color: String,
}

impl StemEntry {
    /// Create a new stem entry with validation
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Result<Self, DomainError> {
        let entry = Self {
            name: name.into(),
            color: color.into(),
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Placeholder entry for a stem at `position` that has no metadata
    pub fn placeholder(position: usize) -> Self {
        Self {
            name: format!("Stem_{}", position),
            color: PLACEHOLDER_COLOR.to_string(),
        }
    }

    /// Check the name/color invariants
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::MetadataFormat(
                "stem name cannot be empty".to_string(),
            ));
        }
        if !is_hex_color(&self.color) {
            return Err(DomainError::MetadataFormat(format!(
                "stem '{}' has invalid color '{}', expected #RRGGBB",
                self.name, self.color
            )));
        }
        Ok(())
    }
}

/// Returns true for `#RRGGBB` strings
pub fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Ordered stem descriptors, index-aligned with the stem tracks
pub type StemTable = Vec<StemEntry>;

/// Stem metadata document, as embedded in the container
///
/// Top-level keys other than `stems` are carried through untouched so that
/// vendor sections of a supplied document survive into the container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StemMetadata {
    pub stems: StemTable,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl StemMetadata {
    /// Create a document holding only a stem table
    pub fn new(stems: StemTable) -> Self {
        Self {
            stems,
            extra: serde_json::Map::new(),
        }
    }

    /// Parse and validate a metadata document
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, DomainError> {
        let metadata: StemMetadata = serde_json::from_slice(bytes)
            .map_err(|e| DomainError::MetadataFormat(e.to_string()))?;
        for entry in &metadata.stems {
            entry.validate()?;
        }
        Ok(metadata)
    }

    /// Parse and validate a metadata document from a string
    pub fn from_json_str(json: &str) -> Result<Self, DomainError> {
        Self::from_json_slice(json.as_bytes())
    }

    /// Compact JSON serialization
    pub fn to_json(&self) -> Result<String, DomainError> {
        serde_json::to_string(self).map_err(|e| DomainError::MetadataFormat(e.to_string()))
    }
}

/// Target codec for transcoded tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// Apple Lossless
    #[default]
    Alac,
    /// Advanced Audio Coding
    Aac,
}

impl AudioFormat {
    /// Parse format from string
    pub fn parse(format: &str) -> Result<Self, DomainError> {
        match format.trim().to_lowercase().as_str() {
            "alac" => Ok(AudioFormat::Alac),
            "aac" => Ok(AudioFormat::Aac),
            other => Err(DomainError::Config(format!(
                "Invalid audio format: {}. Valid formats: alac, aac",
                other
            ))),
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioFormat::Alac => write!(f, "alac"),
            AudioFormat::Aac => write!(f, "aac"),
        }
    }
}

/// Extensions the container accepts without conversion
pub const PASSTHROUGH_EXTENSIONS: &[&str] = &["m4a", "mp4", "m4p"];

/// Extensions that are transcoded before muxing
pub const CONVERTIBLE_EXTENSIONS: &[&str] = &["wav", "wave", "aif", "aiff", "flac"];

/// How an input track gets into the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Already an MP4 audio track
    Passthrough,
    /// Needs transcoding
    Convert,
}

impl InputKind {
    /// Classify an input track by its extension
    pub fn classify(path: &Path) -> Result<Self, DomainError> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if PASSTHROUGH_EXTENSIONS.contains(&extension.as_str()) {
            Ok(InputKind::Passthrough)
        } else if CONVERTIBLE_EXTENSIONS.contains(&extension.as_str()) {
            Ok(InputKind::Convert)
        } else {
            Err(DomainError::UnsupportedInputFormat {
                path: path.display().to_string(),
                extension: format!(".{}", extension),
                valid: CONVERTIBLE_EXTENSIONS
                    .iter()
                    .chain(PASSTHROUGH_EXTENSIONS)
                    .map(|ext| format!(".{}", ext))
                    .collect::<Vec<_>>()
                    .join(", "),
            })
        }
    }
}

/// Value of one descriptive tag field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    Text(String),
    Integer(i64),
    Pair(i64, i64),
    Bytes(Vec<u8>),
}

impl TagValue {
    /// Convert a JSON value, returning `None` for shapes no tag accepts
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        match value {
            Value::String(s) => Some(TagValue::Text(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(TagValue::Integer(i))
                } else {
                    match n.as_f64() {
                        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                            Some(TagValue::Integer(f as i64))
                        }
                        _ => Some(TagValue::Text(n.to_string())),
                    }
                }
            }
            Value::Array(items) => match items.as_slice() {
                [a, b] => Some(TagValue::Pair(a.as_i64()?, b.as_i64()?)),
                [Value::Array(inner)] => match inner.as_slice() {
                    [a, b] => Some(TagValue::Pair(a.as_i64()?, b.as_i64()?)),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        }
    }

    /// Short rendering used in error messages
    pub fn describe(&self) -> String {
        match self {
            TagValue::Text(s) => format!("\"{}\"", s),
            TagValue::Integer(i) => i.to_string(),
            TagValue::Pair(a, b) => format!("({}, {})", a, b),
            TagValue::Bytes(b) => format!("<{} bytes>", b.len()),
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Text(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::Text(value)
    }
}

impl From<i32> for TagValue {
    fn from(value: i32) -> Self {
        TagValue::Integer(value as i64)
    }
}

impl From<i64> for TagValue {
    fn from(value: i64) -> Self {
        TagValue::Integer(value)
    }
}

/// Open mapping of descriptive field names to values
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagSet {
    fields: BTreeMap<String, TagValue>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: &str, value: impl Into<TagValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: impl Into<TagValue>) {
        self.fields.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&TagValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Load a tag set from a JSON object
    ///
    /// Values whose JSON shape cannot be a tag (objects, booleans, null,
    /// arrays that are not an integer pair) are dropped.
    pub fn from_json_str(json: &str) -> Result<Self, DomainError> {
        Self::from_json_slice(json.as_bytes())
    }

    /// Load a tag set from raw JSON bytes; invalid UTF-8 is rejected
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, DomainError> {
        let value: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| DomainError::InvalidTagSource(e.to_string()))?;
        let object = value.as_object().ok_or_else(|| {
            DomainError::InvalidTagSource("expected a JSON object of tag fields".to_string())
        })?;

        let mut tags = TagSet::new();
        for (field, raw) in object {
            match TagValue::from_json(raw) {
                Some(value) => tags.insert(field, value),
                None => debug!("Ignoring tag field '{}' with unsupported value {}", field, raw),
            }
        }
        Ok(tags)
    }
}

/// Mean of every free-form tag written by this tool
pub const FREEFORM_MEAN: &str = "com.apple.iTunes";

/// Container-level tag identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKey {
    /// Well-known four-byte atom
    Atom([u8; 4]),
    /// `----:com.apple.iTunes:<name>` free-form atom
    FreeForm(&'static str),
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagKey::Atom(code) => {
                // 0xA9 is the copyright sign prefix of iTunes atoms
                for &b in code {
                    if b == 0xA9 {
                        write!(f, "\u{a9}")?;
                    } else {
                        write!(f, "{}", b as char)?;
                    }
                }
                Ok(())
            }
            TagKey::FreeForm(name) => write!(f, "----:{}:{}", FREEFORM_MEAN, name),
        }
    }
}

/// Data type marker of a free-form payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreeFormKind {
    Utf8,
    Isrc,
    Upc,
}

/// Cover art image encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// `.png` (any case) is PNG, everything else JPEG
    pub fn from_path(path: &str) -> Self {
        let is_png = Path::new(path)
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("png"))
            .unwrap_or(false);
        if is_png {
            ImageFormat::Png
        } else {
            ImageFormat::Jpeg
        }
    }
}

/// Typed payload of a container tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagPayload {
    Text(String),
    FreeForm { data: Vec<u8>, kind: FreeFormKind },
    TrackNumber(u16, u16),
    Tempo(u16),
    Cover { format: ImageFormat, data: Vec<u8> },
}

/// One tag to be written onto the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerTagEntry {
    pub key: TagKey,
    pub value: TagPayload,
}

impl ContainerTagEntry {
    pub fn new(key: TagKey, value: TagPayload) -> Self {
        Self { key, value }
    }
}

#[cfg(test)]
mod tests;
