//! # Platform Boundary Traits
//!
//! Abstractions over the remote collaborators of the publishing pipeline.
//!
//! ## Overview
//!
//! This crate defines the seams between the pipeline core and the outside
//! world:
//!
//! - **`VideoPlatform`** (`platform`): the remote video-hosting platform —
//!   primary asset upload, thumbnails, and playlist management
//! - **`AssetSource`** (`assets`): the remote file storage holding source
//!   media and manifest documents
//! - **`PlatformError`** (`error`): the single typed error taxonomy produced
//!   at the provider boundary; retryability is classified here, once, and
//!   consumed by the retry executor
//!
//! Provider crates implement these traits; core crates consume them as
//! `Arc<dyn ...>` injected at construction time.

pub mod assets;
pub mod error;
pub mod platform;

pub use assets::{AssetBuffer, AssetSource, AssetStream};
pub use error::{PlatformError, Result};
pub use platform::{
    ByteStream, PlaylistPage, ProgressCallback, RemotePlaylist, VideoMetadata, VideoPlatform,
};
