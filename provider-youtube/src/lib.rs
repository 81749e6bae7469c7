//! # YouTube Platform Client
//!
//! YouTube Data API v3 client behind the [`VideoPlatform`] seam.
//!
//! ## Overview
//!
//! Covers exactly the calls the pipeline charges quota for:
//!
//! - `videos.insert` — resumable upload, streamed with progress
//! - `thumbnails.set` — custom video thumbnail
//! - `playlists.list` / `playlists.insert` — playlist reconciliation
//! - `playlistItems.insert` — collection membership
//! - `playlistImages.insert` — playlist cover image
//!
//! Every non-success response is classified into the shared
//! [`PlatformError`] taxonomy at this boundary; callers never inspect
//! response shapes.
//!
//! [`VideoPlatform`]: platform_traits::VideoPlatform
//! [`PlatformError`]: platform_traits::PlatformError

pub mod client;
pub mod types;

pub use client::YouTubeClient;
