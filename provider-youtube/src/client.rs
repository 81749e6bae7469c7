//! YouTube Data API v3 connector implementing the `VideoPlatform` seam

use crate::types::{
    PlaylistInsertRequest, PlaylistInsertResponse, PlaylistItemInsertRequest, PlaylistItemSnippet,
    PlaylistListResponse, PlaylistSnippetIn, PlaylistStatus, ResourceId, VideoInsertResponse,
    VideoResource,
};
use async_trait::async_trait;
use bytes::Bytes;
use core_auth::AuthManager;
use futures::StreamExt;
use platform_traits::{
    ByteStream, PlatformError, PlaylistPage, ProgressCallback, RemotePlaylist, Result,
    VideoMetadata, VideoPlatform,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const UPLOAD_BASE: &str = "https://www.googleapis.com/upload/youtube/v3";

/// Playlists per list page (API maximum)
const LIST_PAGE_SIZE: u32 = 50;

/// Authenticated YouTube Data API client.
///
/// The HTTP client and auth manager are injected; nothing here is
/// process-global. Each call acquires a fresh bearer token from the auth
/// manager, which refreshes transparently near expiry.
pub struct YouTubeClient {
    http: reqwest::Client,
    auth: Arc<AuthManager>,
}

impl YouTubeClient {
    pub fn new(http: reqwest::Client, auth: Arc<AuthManager>) -> Self {
        Self { http, auth }
    }

    async fn bearer(&self) -> Result<String> {
        self.auth
            .access_token()
            .await
            .map_err(|e| PlatformError::Auth(e.to_string()))
    }

    /// Classify a non-success response; success passes through untouched
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(PlatformError::from_status_body(status.as_u16(), &body))
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| PlatformError::InvalidResponse(e.to_string()))
    }

    fn transport(e: reqwest::Error) -> PlatformError {
        PlatformError::Transport(e.to_string())
    }

    /// Initiate a resumable upload session, returning the session URL
    async fn initiate_upload(
        &self,
        token: &str,
        resource: &VideoResource,
        size: u64,
        content_type: &str,
    ) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/videos", UPLOAD_BASE))
            .query(&[
                ("uploadType", "resumable"),
                ("part", "snippet,status,recordingDetails"),
                ("notifySubscribers", "false"),
            ])
            .bearer_auth(token)
            .header("X-Upload-Content-Length", size.to_string())
            .header("X-Upload-Content-Type", content_type)
            .json(resource)
            .send()
            .await
            .map_err(Self::transport)?;
        let response = Self::check(response).await?;

        response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                PlatformError::InvalidResponse("resumable session without location".to_string())
            })
    }
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    #[instrument(skip(self, metadata, content, progress), fields(title = %metadata.title, size))]
    async fn upload_video(
        &self,
        metadata: &VideoMetadata,
        content: ByteStream,
        size: u64,
        progress: Option<ProgressCallback>,
    ) -> Result<String> {
        let token = self.bearer().await?;
        let resource = VideoResource::from(metadata);
        let upload_url = self
            .initiate_upload(&token, &resource, size, "video/*")
            .await?;

        debug!(size, "Resumable upload session opened");

        // Count bytes as they leave so the caller can observe progress
        let mut sent: u64 = 0;
        let counted = content.map(move |chunk| {
            if let Ok(bytes) = &chunk {
                sent += bytes.len() as u64;
                if let Some(callback) = &progress {
                    callback(sent, size);
                }
            }
            chunk
        });

        let response = self
            .http
            .put(&upload_url)
            .bearer_auth(&token)
            .header(reqwest::header::CONTENT_LENGTH, size)
            .body(reqwest::Body::wrap_stream(counted))
            .send()
            .await
            .map_err(Self::transport)?;
        let response = Self::check(response).await?;

        let video: VideoInsertResponse = Self::parse(response).await?;
        info!(video_id = %video.id, "Video uploaded");
        Ok(video.id)
    }

    #[instrument(skip(self, image))]
    async fn set_thumbnail(&self, video_id: &str, image: Bytes, content_type: &str) -> Result<()> {
        let token = self.bearer().await?;
        let response = self
            .http
            .post(format!("{}/thumbnails/set", UPLOAD_BASE))
            .query(&[("videoId", video_id), ("uploadType", "media")])
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(image)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::check(response).await?;
        debug!(video_id, "Thumbnail set");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_playlists(&self, page_token: Option<&str>) -> Result<PlaylistPage> {
        let token = self.bearer().await?;
        let page_size = LIST_PAGE_SIZE.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("mine", "true"),
            ("maxResults", page_size.as_str()),
        ];
        if let Some(page_token) = page_token {
            query.push(("pageToken", page_token));
        }

        let response = self
            .http
            .get(format!("{}/playlists", API_BASE))
            .query(&query)
            .bearer_auth(token)
            .send()
            .await
            .map_err(Self::transport)?;
        let response = Self::check(response).await?;

        let page: PlaylistListResponse = Self::parse(response).await?;
        Ok(PlaylistPage {
            playlists: page
                .items
                .into_iter()
                .map(|p| RemotePlaylist {
                    id: p.id,
                    title: p.snippet.title,
                })
                .collect(),
            next_page_token: page.next_page_token,
        })
    }

    #[instrument(skip(self, description))]
    async fn create_playlist(&self, title: &str, description: &str) -> Result<String> {
        let token = self.bearer().await?;
        let request = PlaylistInsertRequest {
            snippet: PlaylistSnippetIn {
                title: title.to_string(),
                description: description.to_string(),
            },
            status: PlaylistStatus {
                privacy_status: "private".to_string(),
            },
        };

        let response = self
            .http
            .post(format!("{}/playlists", API_BASE))
            .query(&[("part", "snippet,status")])
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(Self::transport)?;
        let response = Self::check(response).await?;

        let created: PlaylistInsertResponse = Self::parse(response).await?;
        info!(playlist_id = %created.id, title, "Playlist created");
        Ok(created.id)
    }

    #[instrument(skip(self))]
    async fn add_playlist_item(
        &self,
        playlist_id: &str,
        video_id: &str,
        position: Option<u32>,
    ) -> Result<()> {
        let token = self.bearer().await?;
        let request = PlaylistItemInsertRequest {
            snippet: PlaylistItemSnippet {
                playlist_id: playlist_id.to_string(),
                resource_id: ResourceId {
                    kind: "youtube#video".to_string(),
                    video_id: video_id.to_string(),
                },
                position,
            },
        };

        let response = self
            .http
            .post(format!("{}/playlistItems", API_BASE))
            .query(&[("part", "snippet")])
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::check(response).await?;
        debug!(playlist_id, video_id, "Video added to playlist");
        Ok(())
    }

    #[instrument(skip(self, image))]
    async fn set_playlist_cover(
        &self,
        playlist_id: &str,
        image: Bytes,
        content_type: &str,
    ) -> Result<()> {
        let token = self.bearer().await?;
        let response = self
            .http
            .post(format!("{}/playlistImages", UPLOAD_BASE))
            .query(&[("playlistId", playlist_id), ("uploadType", "media")])
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(image)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::check(response).await?;
        debug!(playlist_id, "Playlist cover set");
        Ok(())
    }
}
