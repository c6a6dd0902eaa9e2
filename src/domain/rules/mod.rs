// Domain rules - Stem metadata merging policy

use tracing::info;

use crate::domain::model::*;

/// Built-in stem descriptors used when supplied metadata runs short
pub fn default_stems() -> StemTable {
    [
        ("Drums", "#009E73"),
        ("Bass", "#D55E00"),
        ("Other", "#CC79A7"),
        ("Vox", "#56B4E9"),
    ]
    .into_iter()
    .map(|(name, color)| StemEntry {
        name: name.to_string(),
        color: color.to_string(),
    })
    .collect()
}

/// Result of merging supplied metadata onto a set of stem tracks
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// One entry per stem track, in track order
    pub stems: StemTable,
    /// Set when supplied metadata did not cover every track
    pub notice: Option<PaddingNotice>,
}

/// Informational record of how a short stem table was padded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddingNotice {
    pub supplied: usize,
    pub stems: usize,
    pub from_defaults: usize,
    pub synthesized: usize,
}

impl std::fmt::Display for PaddingNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "missing stem metadata for stems {} - {} ({} from defaults, {} placeholders)",
            self.supplied, self.stems, self.from_defaults, self.synthesized
        )
    }
}

/// Merges supplied stem metadata with defaults and placeholders
pub struct MetadataMerger;

impl MetadataMerger {
    /// Produce exactly one entry per stem track
    ///
    /// Supplied entries win positionally. A short table is extended first
    /// from `defaults`, then with `Stem_<n>` / `#000000` placeholders where
    /// `n` is the table position. Surplus supplied entries are unused.
    pub fn merge<T>(stem_tracks: &[T], supplied: Option<&[StemEntry]>, defaults: &[StemEntry]) -> MergeOutcome {
        let num_stems = stem_tracks.len();
        let supplied = supplied.unwrap_or(&[]);
        let num_supplied = supplied.len();

        if num_supplied >= num_stems {
            return MergeOutcome {
                stems: supplied[..num_stems].to_vec(),
                notice: None,
            };
        }

        let mut stems: StemTable = Vec::with_capacity(num_stems);
        stems.extend_from_slice(supplied);

        let defaults_end = num_stems.min(defaults.len());
        if num_supplied < defaults_end {
            stems.extend_from_slice(&defaults[num_supplied..defaults_end]);
        }
        let from_defaults = stems.len() - num_supplied;

        while stems.len() < num_stems {
            stems.push(StemEntry::placeholder(stems.len()));
        }

        let notice = PaddingNotice {
            supplied: num_supplied,
            stems: num_stems,
            from_defaults,
            synthesized: num_stems - num_supplied - from_defaults,
        };
        info!("{}", notice);

        MergeOutcome {
            stems,
            notice: Some(notice),
        }
    }

    /// Merge against the built-in defaults
    pub fn merge_with_defaults<T>(stem_tracks: &[T], supplied: Option<&[StemEntry]>) -> MergeOutcome {
        Self::merge(stem_tracks, supplied, &default_stems())
    }
}

#[cfg(test)]
mod tests;
