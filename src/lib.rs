//! stemmux library
//!
//! Builds multi-track stem containers (`.stem.m4a`) from a mixdown and its
//! stems, embedding per-stem names and colors plus iTunes-style tags, and
//! reads the embedded stem metadata back.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{AudioFormat, StemEntry, StemMetadata, StemTable, TagSet};
pub use domain::rules::{default_stems, MetadataMerger};
pub use domain::tagmap::map_tags;
