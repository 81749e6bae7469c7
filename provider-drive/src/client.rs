//! Drive API v3 connector implementing the `AssetSource` seam

use crate::types::{DriveFile, FilesListResponse};
use async_trait::async_trait;
use core_auth::AuthManager;
use futures::TryStreamExt;
use platform_traits::{AssetBuffer, AssetSource, AssetStream, PlatformError, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Drive API base URL
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Shared-drive configuration
#[derive(Debug, Clone)]
pub struct DriveConfig {
    /// Identifier of the shared drive holding the media library
    pub shared_drive_id: String,
}

/// Read-only Drive connector.
///
/// Resolves folders and files by name within the configured shared drive
/// and downloads content via `alt=media`, either streamed or buffered.
pub struct DriveClient {
    http: reqwest::Client,
    auth: Arc<AuthManager>,
    config: DriveConfig,
}

impl DriveClient {
    pub fn new(http: reqwest::Client, auth: Arc<AuthManager>, config: DriveConfig) -> Self {
        Self { http, auth, config }
    }

    async fn bearer(&self) -> Result<String> {
        self.auth
            .access_token()
            .await
            .map_err(|e| PlatformError::Auth(e.to_string()))
    }

    /// Run a `files.list` query scoped to the shared drive and return the
    /// first match, if any.
    async fn find_first(&self, query: &str, fields: &str) -> Result<Option<DriveFile>> {
        let url = format!(
            "{}/files?q={}&driveId={}&corpora=drive&includeItemsFromAllDrives=true&supportsAllDrives=true&fields={}",
            DRIVE_API_BASE,
            urlencoding::encode(query),
            urlencoding::encode(&self.config.shared_drive_id),
            urlencoding::encode(fields),
        );

        let token = self.bearer().await?;
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::from_status_body(status.as_u16(), &body));
        }

        let list: FilesListResponse = response
            .json()
            .await
            .map_err(|e| PlatformError::InvalidResponse(e.to_string()))?;
        Ok(list.files.into_iter().next())
    }

    async fn find_folder(&self, folder_name: &str) -> Result<DriveFile> {
        let query = format!(
            "name = '{}' and mimeType = 'application/vnd.google-apps.folder' and trashed = false",
            folder_name.replace('\'', "\\'")
        );
        self.find_first(&query, "files(id, name)")
            .await?
            .ok_or_else(|| PlatformError::NotFound(format!("folder \"{}\"", folder_name)))
    }

    async fn find_file_in(&self, folder_name: &str, filename: &str) -> Result<DriveFile> {
        let folder = self.find_folder(folder_name).await?;
        let query = format!(
            "name = '{}' and '{}' in parents and trashed = false",
            filename.replace('\'', "\\'"),
            folder.id
        );
        self.find_first(&query, "files(id, name, size, mimeType)")
            .await?
            .ok_or_else(|| {
                PlatformError::NotFound(format!("file \"{}\" in folder \"{}\"", filename, folder_name))
            })
    }

    async fn find_file_anywhere(&self, filename: &str) -> Result<DriveFile> {
        let query = format!(
            "name = '{}' and trashed = false",
            filename.replace('\'', "\\'")
        );
        self.find_first(&query, "files(id, name, size, mimeType)")
            .await?
            .ok_or_else(|| PlatformError::NotFound(format!("file \"{}\"", filename)))
    }

    async fn download(&self, file_id: &str) -> Result<reqwest::Response> {
        let url = format!(
            "{}/files/{}?alt=media&supportsAllDrives=true",
            DRIVE_API_BASE, file_id
        );
        let token = self.bearer().await?;
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::from_status_body(status.as_u16(), &body));
        }
        Ok(response)
    }
}

#[async_trait]
impl AssetSource for DriveClient {
    #[instrument(skip(self))]
    async fn fetch_stream(&self, folder: &str, filename: &str) -> Result<AssetStream> {
        let file = self.find_file_in(folder, filename).await?;
        let size = file
            .size_bytes()
            .ok_or_else(|| PlatformError::InvalidResponse(format!("no size for \"{}\"", filename)))?;

        debug!(file_id = %file.id, size, "Streaming file from source");
        let response = self.download(&file.id).await?;

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::other(e.to_string()));
        Ok(AssetStream {
            stream: Box::pin(stream),
            size,
            content_type: file.mime_type,
        })
    }

    #[instrument(skip(self))]
    async fn fetch_buffer(&self, folder: &str, filename: &str) -> Result<AssetBuffer> {
        let file = self.find_file_in(folder, filename).await?;
        let response = self.download(&file.id).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PlatformError::Transport(e.to_string()))?;
        Ok(AssetBuffer {
            bytes,
            content_type: file.mime_type,
        })
    }

    #[instrument(skip(self))]
    async fn fetch_json(&self, filename: &str) -> Result<serde_json::Value> {
        info!(filename, "Loading JSON document from source");
        let file = self.find_file_anywhere(filename).await?;
        let response = self.download(&file.id).await?;
        response
            .json()
            .await
            .map_err(|e| PlatformError::InvalidResponse(e.to_string()))
    }
}
