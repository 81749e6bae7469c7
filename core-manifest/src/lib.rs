//! # Manifest & Metadata
//!
//! Read-only input side of the pipeline: the publication manifest, the
//! enrichment library, and the pure builder that turns both into
//! platform-ready video metadata.
//!
//! ## Overview
//!
//! The manifest is a JSON document listing every produced item; only items
//! that have an original video file and are marked complete are uploadable.
//! Uploadable items are ordered by publish date, ascending, exactly once at
//! load time — the pipeline never re-orders them.
//!
//! The library document carries per-item enrichment (speaker, scripture
//! references, summary, tags) keyed by item id.

pub mod error;
pub mod metadata;
pub mod model;

pub use error::{ManifestError, Result};
pub use metadata::{build_video_metadata, thumbnail_filename, MetadataOptions};
pub use model::{
    distinct_series, library_by_id, load_manifests, video_items, FileRef, LibraryEntry,
    ManifestItem, RawManifest, Series, SeriesRef,
};
