//! iTunes-style tag writer backed by `mp4ameta`

use std::path::Path;

use async_trait::async_trait;
use mp4ameta::{Data, Fourcc, FreeformIdent, Img, ImgFmt, Tag};
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

const TAG_LIBRARY: &str = "mp4ameta";

/// Writes mapped tag entries into an existing container
pub struct Mp4ametaTagWriter;

impl Mp4ametaTagWriter {
    pub fn new() -> Self {
        Self
    }

    /// Apply entries in order onto an in-memory tag
    pub fn apply(tag: &mut Tag, entries: &[ContainerTagEntry]) {
        for entry in entries {
            match (&entry.key, &entry.value) {
                (TagKey::Atom(code), TagPayload::Text(text)) => {
                    tag.set_data(Fourcc(*code), Data::Utf8(text.clone()));
                }
                (_, TagPayload::TrackNumber(number, total)) => tag.set_track(*number, *total),
                (_, TagPayload::Tempo(bpm)) => tag.set_bpm(*bpm),
                (_, TagPayload::Cover { format, data }) => {
                    let fmt = match format {
                        ImageFormat::Png => ImgFmt::Png,
                        ImageFormat::Jpeg => ImgFmt::Jpeg,
                    };
                    tag.set_artwork(Img::new(fmt, data.clone()));
                }
                // mp4ameta has no ISRC or UPC data type, so those values
                // keep their text but not their type code.
                (TagKey::FreeForm(name), TagPayload::FreeForm { data, .. }) => {
                    tag.set_data(FreeformIdent::new(FREEFORM_MEAN, name), free_form_data(data));
                }
                (TagKey::FreeForm(name), TagPayload::Text(text)) => {
                    tag.set_data(FreeformIdent::new(FREEFORM_MEAN, name), Data::Utf8(text.clone()));
                }
                (TagKey::Atom(code), TagPayload::FreeForm { data, .. }) => {
                    tag.set_data(Fourcc(*code), free_form_data(data));
                }
            }
        }
    }
}

/// UTF-8 text when the bytes are valid, otherwise the raw bytes untouched
fn free_form_data(data: &[u8]) -> Data {
    match String::from_utf8(data.to_vec()) {
        Ok(text) => Data::Utf8(text),
        Err(e) => Data::Reserved(e.into_bytes()),
    }
}

impl Default for Mp4ametaTagWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TagWritePort for Mp4ametaTagWriter {
    async fn write_tags(
        &self,
        container: &Path,
        entries: &[ContainerTagEntry],
    ) -> Result<(), DomainError> {
        let tag_error = |action: &str, e: mp4ameta::Error| DomainError::ExternalTool {
            tool: TAG_LIBRARY.to_string(),
            status: None,
            stderr: format!("failed to {} tags of {}: {}", action, container.display(), e),
        };

        let mut tag = Tag::read_from_path(container).map_err(|e| tag_error("read", e))?;
        Self::apply(&mut tag, entries);
        tag.write_to_path(container).map_err(|e| tag_error("write", e))?;

        debug!("Wrote {} tags to {}", entries.len(), container.display());
        Ok(())
    }
}
