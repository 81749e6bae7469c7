//! Manifest and library document models

use crate::error::{ManifestError, Result};
use chrono::NaiveDate;
use platform_traits::AssetSource;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

/// Manifest document filename in the asset source root
pub const MANIFEST_FILENAME: &str = "manifest.json";
/// Library document filename in the asset source root
pub const LIBRARY_FILENAME: &str = "library.json";

/// One file entry inside an item's `files` map
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileRef {
    pub filename: String,
}

/// Reference from an item to the series it belongs to
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeriesRef {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    /// 1-indexed position within the series, when curated
    #[serde(default)]
    pub position: Option<u32>,
    /// Cover image for the series, when one was produced
    #[serde(default)]
    pub image: Option<FileRef>,
}

/// Raw per-item record as it appears in the manifest document
#[derive(Debug, Clone, Deserialize)]
pub struct RawItem {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub files: BTreeMap<String, FileRef>,
    #[serde(default)]
    pub series: Option<SeriesRef>,
}

/// The manifest document root
#[derive(Debug, Clone, Deserialize)]
pub struct RawManifest {
    pub items: BTreeMap<String, RawItem>,
}

/// One uploadable job item: immutable input to the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestItem {
    pub id: String,
    pub title: String,
    /// Publish date; also the processing-order key
    pub date: String,
    /// Source folder holding this item's files
    pub folder: String,
    pub video_filename: String,
    pub image_wide: Option<String>,
    pub image_banner: Option<String>,
    pub thumbnail_01: Option<String>,
    pub series: Option<SeriesRef>,
}

/// Per-item enrichment record from the library document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryEntry {
    pub id: String,
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub scriptures: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One distinct series drawn from the manifest, for playlist reconciliation
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Folder of the first item carrying this series (cover images live there)
    pub folder: String,
    /// Cover image filename, when the manifest supplies one
    pub image: Option<String>,
}

fn publish_date_key(date: &str) -> NaiveDate {
    date.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .unwrap_or(NaiveDate::MIN)
}

fn to_uploadable(id: &str, raw: &RawItem) -> Option<ManifestItem> {
    if raw.status.as_deref() != Some("complete") {
        return None;
    }
    let video = raw.files.get("video_original")?;
    Some(ManifestItem {
        id: id.to_string(),
        title: raw.title.clone(),
        date: raw.date.clone(),
        folder: raw.folder.clone().unwrap_or_default(),
        video_filename: video.filename.clone(),
        image_wide: raw.files.get("image_wide").map(|f| f.filename.clone()),
        image_banner: raw.files.get("image_banner").map(|f| f.filename.clone()),
        thumbnail_01: raw.files.get("thumbnail_01").map(|f| f.filename.clone()),
        series: raw.series.clone(),
    })
}

/// Filter the manifest down to uploadable items, ordered by publish date
/// ascending (oldest first). The order assigned here is final.
pub fn video_items(manifest: &RawManifest) -> Vec<ManifestItem> {
    let mut items: Vec<ManifestItem> = manifest
        .items
        .iter()
        .filter_map(|(id, raw)| to_uploadable(id, raw))
        .collect();
    items.sort_by(|a, b| {
        publish_date_key(&a.date)
            .cmp(&publish_date_key(&b.date))
            .then_with(|| a.id.cmp(&b.id))
    });
    items
}

/// Build the enrichment lookup keyed by item id
pub fn library_by_id(entries: Vec<LibraryEntry>) -> HashMap<String, LibraryEntry> {
    entries.into_iter().map(|e| (e.id.clone(), e)).collect()
}

/// Distinct series in item order (first occurrence wins)
pub fn distinct_series(items: &[ManifestItem]) -> Vec<Series> {
    let mut seen: Vec<Series> = Vec::new();
    for item in items {
        let Some(series) = &item.series else { continue };
        if seen.iter().any(|s| s.id == series.id) {
            continue;
        }
        let title = series.title.clone().unwrap_or_else(|| series.id.clone());
        let description = series
            .subtitle
            .clone()
            .unwrap_or_else(|| format!("Videos from the \"{}\" series", title));
        seen.push(Series {
            id: series.id.clone(),
            title,
            description,
            folder: item.folder.clone(),
            image: series.image.as_ref().map(|f| f.filename.clone()),
        });
    }
    seen
}

/// Fetch and decode both documents from the asset source.
///
/// Returns the ordered uploadable items and the enrichment lookup.
pub async fn load_manifests(
    assets: &dyn AssetSource,
) -> Result<(Vec<ManifestItem>, HashMap<String, LibraryEntry>)> {
    info!("Loading manifests from asset source");

    let manifest_doc = assets.fetch_json(MANIFEST_FILENAME).await?;
    let library_doc = assets.fetch_json(LIBRARY_FILENAME).await?;

    let manifest: RawManifest = serde_json::from_value(manifest_doc)
        .map_err(|e| ManifestError::Parse(format!("manifest: {}", e)))?;
    let entries: Vec<LibraryEntry> = serde_json::from_value(library_doc)
        .map_err(|e| ManifestError::Parse(format!("library: {}", e)))?;

    let items = video_items(&manifest);
    let library = library_by_id(entries);

    info!(
        total_items = manifest.items.len(),
        video_items = items.len(),
        library_entries = library.len(),
        "Manifests loaded"
    );

    Ok((items, library))
}
