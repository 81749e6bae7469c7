//! Platform metadata builder
//!
//! Pure functions from a manifest item (plus enrichment) to the metadata the
//! platform expects. No state, no I/O, no retries.

use crate::model::{LibraryEntry, ManifestItem};
use platform_traits::VideoMetadata;
use regex::Regex;
use std::sync::OnceLock;

/// Channel-wide metadata knobs, injected by the binary
#[derive(Debug, Clone)]
pub struct MetadataOptions {
    /// Trailing description text appended to every video
    pub footer: Option<String>,
    /// Tags applied to every video before per-item tags
    pub base_tags: Vec<String>,
    /// Platform category identifier
    pub category_id: String,
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self {
            footer: None,
            base_tags: Vec::new(),
            // Nonprofits & Activism
            category_id: "29".to_string(),
        }
    }
}

fn html_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").expect("static pattern"))
}

/// Description: series line, speaker, scripture references, plain-text
/// summary, then the channel footer.
fn build_description(
    item: &ManifestItem,
    entry: Option<&LibraryEntry>,
    options: &MetadataOptions,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(series_title) = item.series.as_ref().and_then(|s| s.title.as_deref()) {
        parts.push(format!("Part of the \"{}\" series", series_title));
    }

    if let Some(speaker) = entry.and_then(|e| e.speaker.as_deref()) {
        parts.push(format!("Speaker: {}", speaker));
    }

    if let Some(entry) = entry {
        if !entry.scriptures.is_empty() {
            parts.push(format!("Scripture: {}", entry.scriptures.join(", ")));
        }
        if let Some(summary) = &entry.summary {
            let plain = html_tag_pattern().replace_all(summary, "");
            let plain = plain.trim();
            if !plain.is_empty() {
                parts.push(format!("\n{}", plain));
            }
        }
    }

    if let Some(footer) = &options.footer {
        parts.push(footer.clone());
    }

    parts.join("\n")
}

/// Tags: base tags, speaker, per-item tag values (`key:value` keeps the
/// value), then scripture references. Duplicates are dropped.
fn build_tags(entry: Option<&LibraryEntry>, options: &MetadataOptions) -> Vec<String> {
    let mut tags: Vec<String> = options.base_tags.clone();

    let mut push_unique = |tags: &mut Vec<String>, value: String| {
        if !value.is_empty() && !tags.contains(&value) {
            tags.push(value);
        }
    };

    if let Some(entry) = entry {
        if let Some(speaker) = &entry.speaker {
            push_unique(&mut tags, speaker.clone());
        }
        for tag in &entry.tags {
            let value = match tag.split_once(':') {
                Some((_, value)) => value.to_string(),
                None => tag.clone(),
            };
            push_unique(&mut tags, value);
        }
        for scripture in &entry.scriptures {
            push_unique(&mut tags, scripture.clone());
        }
    }

    tags
}

/// Build platform-ready metadata for one item.
///
/// Videos are always inserted private and not made-for-kids; publishing is a
/// separate manual act on the platform.
pub fn build_video_metadata(
    item: &ManifestItem,
    entry: Option<&LibraryEntry>,
    options: &MetadataOptions,
) -> VideoMetadata {
    VideoMetadata {
        title: item.title.clone(),
        description: build_description(item, entry, options),
        tags: build_tags(entry, options),
        category_id: options.category_id.clone(),
        privacy_status: "private".to_string(),
        made_for_kids: false,
        recording_date: Some(item.date.clone()),
    }
}

/// Thumbnail source for an item: wide image, then banner, then the first
/// generated thumbnail. `None` means the item simply has no thumbnail.
pub fn thumbnail_filename(item: &ManifestItem) -> Option<&str> {
    item.image_wide
        .as_deref()
        .or(item.image_banner.as_deref())
        .or(item.thumbnail_01.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SeriesRef;

    fn item() -> ManifestItem {
        ManifestItem {
            id: "item-1".to_string(),
            title: "The Title".to_string(),
            date: "2026-03-01".to_string(),
            folder: "2026-03-01".to_string(),
            video_filename: "v.mp4".to_string(),
            image_wide: None,
            image_banner: None,
            thumbnail_01: None,
            series: Some(SeriesRef {
                id: "s1".to_string(),
                title: Some("Great Questions".to_string()),
                subtitle: None,
                position: Some(3),
                image: None,
            }),
        }
    }

    fn entry() -> LibraryEntry {
        LibraryEntry {
            id: "item-1".to_string(),
            speaker: Some("Jordan Lee".to_string()),
            scriptures: vec!["John 3:16".to_string()],
            summary: Some("<p>A <b>summary</b> here.</p>".to_string()),
            tags: vec!["speaker:Jordan Lee".to_string(), "hope".to_string()],
        }
    }

    #[test]
    fn test_description_contains_all_parts() {
        let options = MetadataOptions {
            footer: Some("---\nExample Org".to_string()),
            ..Default::default()
        };
        let description = build_description(&item(), Some(&entry()), &options);

        assert!(description.contains("Part of the \"Great Questions\" series"));
        assert!(description.contains("Speaker: Jordan Lee"));
        assert!(description.contains("Scripture: John 3:16"));
        assert!(description.contains("A summary here."));
        assert!(!description.contains("<p>"), "HTML must be stripped");
        assert!(description.ends_with("Example Org"));
    }

    #[test]
    fn test_description_without_enrichment() {
        let description = build_description(&item(), None, &MetadataOptions::default());
        assert!(description.contains("Great Questions"));
        assert!(!description.contains("Speaker:"));
    }

    #[test]
    fn test_tags_extract_values_and_dedup() {
        let options = MetadataOptions {
            base_tags: vec!["talks".to_string()],
            ..Default::default()
        };
        let tags = build_tags(Some(&entry()), &options);

        // "speaker:Jordan Lee" collapses into the already-present speaker tag
        assert_eq!(
            tags,
            vec!["talks", "Jordan Lee", "hope", "John 3:16"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_metadata_is_private_and_dated() {
        let metadata = build_video_metadata(&item(), Some(&entry()), &MetadataOptions::default());
        assert_eq!(metadata.title, "The Title");
        assert_eq!(metadata.privacy_status, "private");
        assert!(!metadata.made_for_kids);
        assert_eq!(metadata.category_id, "29");
        assert_eq!(metadata.recording_date.as_deref(), Some("2026-03-01"));
    }

    #[test]
    fn test_thumbnail_priority() {
        let mut i = item();
        assert_eq!(thumbnail_filename(&i), None);

        i.thumbnail_01 = Some("t01.jpg".to_string());
        assert_eq!(thumbnail_filename(&i), Some("t01.jpg"));

        i.image_banner = Some("banner.jpg".to_string());
        assert_eq!(thumbnail_filename(&i), Some("banner.jpg"));

        i.image_wide = Some("wide.jpg".to_string());
        assert_eq!(thumbnail_filename(&i), Some("wide.jpg"));
    }
}
