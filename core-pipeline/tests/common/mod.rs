//! Shared test doubles for the pipeline test suites

// each test binary uses a different subset of these helpers
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use core_manifest::{FileRef, ManifestItem, SeriesRef};
use core_state::{JsonFileStore, StateManager};
use futures::StreamExt;
use platform_traits::{
    AssetBuffer, AssetSource, AssetStream, ByteStream, PlatformError, PlaylistPage,
    ProgressCallback, RemotePlaylist, Result, VideoMetadata, VideoPlatform,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Scriptable in-memory platform: records every call, pops scripted
/// results, and falls back to generated successes.
#[derive(Default)]
pub struct MockPlatform {
    calls: Mutex<Vec<String>>,
    pub upload_results: Mutex<VecDeque<Result<String>>>,
    pub thumbnail_results: Mutex<VecDeque<Result<()>>>,
    pub add_item_results: Mutex<VecDeque<Result<()>>>,
    pub cover_results: Mutex<VecDeque<Result<()>>>,
    pub playlist_pages: Mutex<VecDeque<PlaylistPage>>,
}

impl MockPlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) -> usize {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        calls.len()
    }

    pub fn push_page(&self, playlists: Vec<(&str, &str)>, next_page_token: Option<&str>) {
        self.playlist_pages.lock().unwrap().push_back(PlaylistPage {
            playlists: playlists
                .into_iter()
                .map(|(id, title)| RemotePlaylist {
                    id: id.to_string(),
                    title: title.to_string(),
                })
                .collect(),
            next_page_token: next_page_token.map(str::to_string),
        });
    }
}

#[async_trait]
impl VideoPlatform for MockPlatform {
    async fn upload_video(
        &self,
        metadata: &VideoMetadata,
        mut content: ByteStream,
        size: u64,
        progress: Option<ProgressCallback>,
    ) -> Result<String> {
        // drain the stream like a real transfer would
        let mut sent: u64 = 0;
        while let Some(chunk) = content.next().await {
            let chunk = chunk.map_err(|e| PlatformError::Transport(e.to_string()))?;
            sent += chunk.len() as u64;
            if let Some(callback) = &progress {
                callback(sent, size);
            }
        }

        let n = self.record(format!("upload_video:{}", metadata.title));
        match self.upload_results.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(format!("vid-{}", n)),
        }
    }

    async fn set_thumbnail(&self, video_id: &str, _image: Bytes, _content_type: &str) -> Result<()> {
        self.record(format!("set_thumbnail:{}", video_id));
        self.thumbnail_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn list_playlists(&self, page_token: Option<&str>) -> Result<PlaylistPage> {
        self.record(format!("list_playlists:{}", page_token.unwrap_or("")));
        Ok(self
            .playlist_pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PlaylistPage {
                playlists: Vec::new(),
                next_page_token: None,
            }))
    }

    async fn create_playlist(&self, title: &str, _description: &str) -> Result<String> {
        let n = self.record(format!("create_playlist:{}", title));
        Ok(format!("pl-{}", n))
    }

    async fn add_playlist_item(
        &self,
        playlist_id: &str,
        video_id: &str,
        position: Option<u32>,
    ) -> Result<()> {
        self.record(format!(
            "add_playlist_item:{}:{}:{:?}",
            playlist_id, video_id, position
        ));
        self.add_item_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn set_playlist_cover(
        &self,
        playlist_id: &str,
        _image: Bytes,
        _content_type: &str,
    ) -> Result<()> {
        self.record(format!("set_playlist_cover:{}", playlist_id));
        self.cover_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

/// In-memory asset source keyed by (folder, filename)
#[derive(Default)]
pub struct MockAssets {
    files: Mutex<HashMap<(String, String), Bytes>>,
}

impl MockAssets {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn put(&self, folder: &str, filename: &str, content: impl Into<Bytes>) {
        self.files
            .lock()
            .unwrap()
            .insert((folder.to_string(), filename.to_string()), content.into());
    }

    fn get(&self, folder: &str, filename: &str) -> Result<Bytes> {
        self.files
            .lock()
            .unwrap()
            .get(&(folder.to_string(), filename.to_string()))
            .cloned()
            .ok_or_else(|| {
                PlatformError::NotFound(format!("file \"{}\" in folder \"{}\"", filename, folder))
            })
    }
}

#[async_trait]
impl AssetSource for MockAssets {
    async fn fetch_stream(&self, folder: &str, filename: &str) -> Result<AssetStream> {
        let bytes = self.get(folder, filename)?;
        let size = bytes.len() as u64;
        let chunks = vec![Ok::<Bytes, std::io::Error>(bytes)];
        Ok(AssetStream {
            stream: Box::pin(futures::stream::iter(chunks)),
            size,
            content_type: Some("video/mp4".to_string()),
        })
    }

    async fn fetch_buffer(&self, folder: &str, filename: &str) -> Result<AssetBuffer> {
        let bytes = self.get(folder, filename)?;
        Ok(AssetBuffer {
            bytes,
            content_type: Some("image/jpeg".to_string()),
        })
    }

    async fn fetch_json(&self, filename: &str) -> Result<serde_json::Value> {
        let bytes = self.get("", filename)?;
        serde_json::from_slice(&bytes).map_err(|e| PlatformError::InvalidResponse(e.to_string()))
    }
}

pub fn fatal_http() -> PlatformError {
    PlatformError::Http {
        status: 400,
        message: "bad request".to_string(),
    }
}

pub fn test_item(id: &str, date: &str, series_id: Option<&str>) -> ManifestItem {
    ManifestItem {
        id: id.to_string(),
        title: format!("Video {}", id),
        date: date.to_string(),
        folder: format!("folder-{}", id),
        video_filename: format!("{}.mp4", id),
        image_wide: None,
        image_banner: None,
        thumbnail_01: None,
        series: series_id.map(|s| SeriesRef {
            id: s.to_string(),
            title: Some(format!("Series {}", s)),
            subtitle: None,
            position: Some(1),
            image: None,
        }),
    }
}

pub fn with_thumbnail(mut item: ManifestItem, filename: &str) -> ManifestItem {
    item.image_wide = Some(filename.to_string());
    item
}

pub fn with_series_image(mut item: ManifestItem, filename: &str) -> ManifestItem {
    if let Some(series) = &mut item.series {
        series.image = Some(FileRef {
            filename: filename.to_string(),
        });
    }
    item
}

pub fn state_store(dir: &tempfile::TempDir) -> Arc<JsonFileStore> {
    Arc::new(JsonFileStore::new(dir.path().join("upload-state.json")))
}

pub async fn state_manager(store: Arc<JsonFileStore>) -> StateManager {
    StateManager::load(store).await.expect("load state")
}

/// A tiny PNG for cover tests, wider than tall
pub fn wide_png() -> Vec<u8> {
    use image::{DynamicImage, RgbImage};
    let img = RgbImage::from_pixel(64, 36, image::Rgb([200, 40, 90]));
    let mut out = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}
