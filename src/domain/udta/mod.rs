//! Stem metadata blob as stored in the container's user-data atom
//!
//! The muxer receives the metadata as `0:type=stem:src=base64,<payload>`.
//! When the atom is dumped back out, the JSON is preceded by the 8-byte atom
//! header (size + type), which is skipped before parsing.

use base64::Engine;

use crate::domain::errors::DomainError;
use crate::domain::model::StemMetadata;

/// Prefix identifying the user-data payload as stem metadata
pub const UDTA_PREFIX: &str = "0:type=stem:src=base64,";

/// Length of the structural header in front of a dumped atom
pub const ATOM_HEADER_LEN: usize = 8;

/// User-data atom type holding the metadata
pub const STEM_ATOM: &str = "stem";

/// Build the muxer argument embedding `metadata_json`
pub fn udta_argument(metadata_json: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(metadata_json);
    format!("{}{}", UDTA_PREFIX, encoded)
}

/// Recover the JSON bytes from a muxer argument
pub fn decode_udta_argument(argument: &str) -> Result<Vec<u8>, DomainError> {
    let payload = argument.strip_prefix(UDTA_PREFIX).ok_or_else(|| {
        DomainError::MetadataFormat(format!("user-data payload lacks '{}' prefix", UDTA_PREFIX))
    })?;
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| DomainError::MetadataFormat(format!("invalid base64 payload: {}", e)))
}

/// Wrap JSON bytes the way a dumped `stem` atom looks on disk
pub fn frame_atom(metadata_json: &[u8]) -> Vec<u8> {
    let size = (metadata_json.len() + ATOM_HEADER_LEN) as u32;
    let mut atom = Vec::with_capacity(size as usize);
    atom.extend_from_slice(&size.to_be_bytes());
    atom.extend_from_slice(STEM_ATOM.as_bytes());
    atom.extend_from_slice(metadata_json);
    atom
}

/// Parse a dumped `stem` atom into stem metadata
pub fn parse_extracted(atom: &[u8]) -> Result<StemMetadata, DomainError> {
    if atom.len() < ATOM_HEADER_LEN {
        return Err(DomainError::MetadataFormat(format!(
            "extracted metadata is {} bytes, shorter than the {}-byte atom header",
            atom.len(),
            ATOM_HEADER_LEN
        )));
    }
    StemMetadata::from_json_slice(&atom[ATOM_HEADER_LEN..])
}
