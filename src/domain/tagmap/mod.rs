//! Descriptive tag mapping
//!
//! Maps an open set of descriptive field names onto the fixed iTunes-style
//! MP4 tag vocabulary. The mapping is a flat, ordered rule table: rules run
//! top to bottom and when several rules target the same key the later one
//! overwrites the earlier value (keeping the earlier position). Fields no
//! rule mentions are ignored.

use crate::domain::errors::DomainError;
use crate::domain::model::*;

/// How a rule turns its input field(s) into a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Plain string atom
    Text,
    /// Free-form atom holding UTF-8 bytes
    FreeForm,
    /// Free-form atom flagged as ISRC
    Isrc,
    /// Free-form atom flagged as UPC, value stringified first
    Upc,
    /// `track` pair passed through when `track_count` is present
    TrackPair,
    /// `(int(track_no), int(track_count))`
    TrackNumberPair,
    /// Integer tempo
    Tempo,
    /// Image bytes read from the path in the field
    Cover,
}

/// One row of the field table
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Input fields; every one must be present for the rule to fire
    pub fields: &'static [&'static str],
    pub key: TagKey,
    pub transform: Transform,
}

const fn rule(fields: &'static [&'static str], key: TagKey, transform: Transform) -> FieldRule {
    FieldRule {
        fields,
        key,
        transform,
    }
}

const NAME: TagKey = TagKey::Atom(*b"\xa9nam");
const ARTIST: TagKey = TagKey::Atom(*b"\xa9ART");
const ALBUM: TagKey = TagKey::Atom(*b"\xa9alb");
const ALBUM_ARTIST: TagKey = TagKey::Atom(*b"aART");
const GENRE: TagKey = TagKey::Atom(*b"\xa9gen");
const TRACK_NUMBER: TagKey = TagKey::Atom(*b"trkn");
const RELEASE_DATE: TagKey = TagKey::Atom(*b"\xa9day");
const COVER: TagKey = TagKey::Atom(*b"covr");
const LONG_DESCRIPTION: TagKey = TagKey::Atom(*b"ldes");
const COMMENT: TagKey = TagKey::Atom(*b"\xa9cmt");
const TEMPO: TagKey = TagKey::Atom(*b"tmpo");
const GROUPING: TagKey = TagKey::Atom(*b"\xa9grp");
const COMPOSER: TagKey = TagKey::Atom(*b"\xa9wrt");
const LYRICS: TagKey = TagKey::Atom(*b"\xa9lyr");
const COPYRIGHT: TagKey = TagKey::Atom(*b"cprt");

/// Atom marking the file as a stem container
pub const STEM_MARKER_KEY: TagKey = TagKey::Atom(*b"TAUT");
/// Value of the stem marker atom
pub const STEM_MARKER_VALUE: &str = "STEM";

/// The field table, in application order
pub const FIELD_RULES: &[FieldRule] = &[
    rule(&["title"], NAME, Transform::Text),
    rule(&["artist"], ARTIST, Transform::Text),
    rule(&["release"], ALBUM, Transform::Text),
    rule(&["album_artist"], ALBUM_ARTIST, Transform::Text),
    rule(&["remixer"], TagKey::FreeForm("REMIXER"), Transform::FreeForm),
    rule(&["mix"], TagKey::FreeForm("MIXER"), Transform::FreeForm),
    rule(&["producer"], TagKey::FreeForm("PRODUCER"), Transform::FreeForm),
    rule(&["organization"], TagKey::FreeForm("LABEL"), Transform::FreeForm),
    rule(&["publisher"], TagKey::FreeForm("LABEL"), Transform::FreeForm),
    rule(&["label"], TagKey::FreeForm("LABEL"), Transform::FreeForm),
    rule(&["genre"], GENRE, Transform::Text),
    rule(&["style"], GENRE, Transform::Text),
    rule(&["track", "track_count"], TRACK_NUMBER, Transform::TrackPair),
    rule(&["track_no", "track_count"], TRACK_NUMBER, Transform::TrackNumberPair),
    rule(&["catalog_no"], TagKey::FreeForm("CATALOGNUMBER"), Transform::FreeForm),
    rule(&["year"], RELEASE_DATE, Transform::Text),
    rule(&["date"], RELEASE_DATE, Transform::Text),
    rule(&["isrc"], TagKey::FreeForm("ISRC"), Transform::Isrc),
    rule(&["upc"], TagKey::FreeForm("BARCODE"), Transform::Upc),
    rule(&["cover"], COVER, Transform::Cover),
    rule(&["description"], LONG_DESCRIPTION, Transform::Text),
    rule(&["comment"], COMMENT, Transform::Text),
    rule(&["bpm"], TEMPO, Transform::Tempo),
    rule(&["initialkey"], TagKey::FreeForm("initialkey"), Transform::FreeForm),
    rule(&["key"], TagKey::FreeForm("KEY"), Transform::FreeForm),
    rule(&["album"], ALBUM, Transform::Text),
    rule(&["mood"], TagKey::FreeForm("MOOD"), Transform::FreeForm),
    rule(&["grouping"], GROUPING, Transform::Text),
    rule(&["composer"], COMPOSER, Transform::Text),
    rule(&["barcode"], TagKey::FreeForm("BARCODE"), Transform::Upc),
    rule(&["lyrics"], LYRICS, Transform::Text),
    rule(&["copyright"], COPYRIGHT, Transform::Text),
    rule(
        &["url_discogs_artist_site"],
        TagKey::FreeForm("URL_DISCOGS_ARTIST_SITE"),
        Transform::FreeForm,
    ),
    rule(&["www"], TagKey::FreeForm("URL_DISCOGS_RELEASE_SITE"), Transform::FreeForm),
    rule(
        &["url_discogs_release_site"],
        TagKey::FreeForm("URL_DISCOGS_RELEASE_SITE"),
        Transform::FreeForm,
    ),
    rule(&["youtube_id"], TagKey::FreeForm("YouTube Id"), Transform::FreeForm),
    rule(&["beatport_id"], TagKey::FreeForm("Beatport Id"), Transform::FreeForm),
    rule(&["qobuz_id"], TagKey::FreeForm("Qobuz Id"), Transform::FreeForm),
    rule(&["discogs_release_id"], TagKey::FreeForm("Discogs Id"), Transform::FreeForm),
    rule(&["media"], TagKey::FreeForm("MEDIA"), Transform::FreeForm),
    rule(&["country"], TagKey::FreeForm("COUNTRY"), Transform::FreeForm),
];

/// The tag written on every container regardless of input
pub fn stem_marker() -> ContainerTagEntry {
    ContainerTagEntry::new(STEM_MARKER_KEY, TagPayload::Text(STEM_MARKER_VALUE.to_string()))
}

/// All field names some rule reads
pub fn supported_fields() -> impl Iterator<Item = &'static str> {
    let mut seen: Vec<&'static str> = Vec::new();
    for rule in FIELD_RULES {
        for field in rule.fields {
            if !seen.contains(field) {
                seen.push(*field);
            }
        }
    }
    seen.into_iter()
}

/// Map descriptive fields to the container tags to write
///
/// Missing and unknown fields never fail. Errors are limited to numeric
/// fields that do not hold an integer in range and cover paths that cannot
/// be read.
pub fn map_tags(fields: &TagSet) -> Result<Vec<ContainerTagEntry>, DomainError> {
    let mut entries: Vec<ContainerTagEntry> = Vec::new();

    for rule in FIELD_RULES {
        if let Some(value) = rule.apply(fields)? {
            upsert(&mut entries, ContainerTagEntry::new(rule.key, value));
        }
    }
    upsert(&mut entries, stem_marker());

    Ok(entries)
}

fn upsert(entries: &mut Vec<ContainerTagEntry>, entry: ContainerTagEntry) {
    match entries.iter().position(|existing| existing.key == entry.key) {
        Some(index) => entries[index].value = entry.value,
        None => entries.push(entry),
    }
}

impl FieldRule {
    /// Payload for this rule, or `None` when the rule does not fire
    pub fn apply(&self, fields: &TagSet) -> Result<Option<TagPayload>, DomainError> {
        let mut values = Vec::with_capacity(self.fields.len());
        for field in self.fields {
            match fields.get(field) {
                Some(value) => values.push(value),
                // half-present pairs are skipped
                None => return Ok(None),
            }
        }
        let field = self.fields[0];

        let payload = match self.transform {
            Transform::Text => as_text(values[0]).map(TagPayload::Text),
            Transform::FreeForm => free_form(values[0], FreeFormKind::Utf8),
            Transform::Isrc => free_form(values[0], FreeFormKind::Isrc),
            Transform::Upc => as_text(values[0]).map(|s| TagPayload::FreeForm {
                data: s.into_bytes(),
                kind: FreeFormKind::Upc,
            }),
            Transform::TrackPair => match values[0] {
                TagValue::Pair(number, total) => Some(TagPayload::TrackNumber(
                    to_u16(field, *number)?,
                    to_u16(field, *total)?,
                )),
                scalar => Some(TagPayload::TrackNumber(
                    coerce_u16(field, scalar)?,
                    coerce_u16(self.fields[1], values[1])?,
                )),
            },
            Transform::TrackNumberPair => Some(TagPayload::TrackNumber(
                coerce_u16(field, values[0])?,
                coerce_u16(self.fields[1], values[1])?,
            )),
            Transform::Tempo => Some(TagPayload::Tempo(coerce_u16(field, values[0])?)),
            Transform::Cover => match values[0] {
                TagValue::Text(path) => Some(read_cover(path)?),
                _ => None,
            },
        };
        Ok(payload)
    }
}

fn as_text(value: &TagValue) -> Option<String> {
    match value {
        TagValue::Text(s) => Some(s.clone()),
        TagValue::Integer(i) => Some(i.to_string()),
        TagValue::Pair(..) | TagValue::Bytes(_) => None,
    }
}

fn free_form(value: &TagValue, kind: FreeFormKind) -> Option<TagPayload> {
    let data = match value {
        TagValue::Bytes(bytes) => bytes.clone(),
        other => as_text(other)?.into_bytes(),
    };
    Some(TagPayload::FreeForm { data, kind })
}

fn coerce_u16(field: &str, value: &TagValue) -> Result<u16, DomainError> {
    let parsed = match value {
        TagValue::Integer(i) => Some(*i),
        TagValue::Text(s) => s.trim().parse::<i64>().ok(),
        TagValue::Pair(..) | TagValue::Bytes(_) => None,
    };
    match parsed {
        Some(i) => to_u16(field, i),
        None => Err(DomainError::TagValue {
            field: field.to_string(),
            value: value.describe(),
            expected: "an integer",
        }),
    }
}

fn to_u16(field: &str, value: i64) -> Result<u16, DomainError> {
    u16::try_from(value).map_err(|_| DomainError::TagValue {
        field: field.to_string(),
        value: value.to_string(),
        expected: "an integer between 0 and 65535",
    })
}

fn read_cover(path: &str) -> Result<TagPayload, DomainError> {
    let data = std::fs::read(path).map_err(|_| DomainError::ResourceNotFound {
        path: path.to_string(),
    })?;
    Ok(TagPayload::Cover {
        format: ImageFormat::from_path(path),
        data,
    })
}
