//! Asset source abstraction
//!
//! Trait for the remote file storage holding source media and manifest
//! documents. Implemented by `provider-drive`. Asset retrieval failures are
//! plain errors; the retry executor wraps platform calls only, not these.

use crate::error::Result;
use crate::platform::ByteStream;
use async_trait::async_trait;
use bytes::Bytes;

/// A streamed asset with its declared size
pub struct AssetStream {
    /// Byte stream of the asset content
    pub stream: ByteStream,
    /// Total size in bytes, declared by the source
    pub size: u64,
    /// Content type reported by the source, when known
    pub content_type: Option<String>,
}

/// A fully buffered asset
#[derive(Debug, Clone)]
pub struct AssetBuffer {
    /// Asset content
    pub bytes: Bytes,
    /// Content type reported by the source, when known
    pub content_type: Option<String>,
}

/// Read-only access to source media and manifest documents
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Open an asset in `folder` as a byte stream with a declared size
    async fn fetch_stream(&self, folder: &str, filename: &str) -> Result<AssetStream>;

    /// Load an asset in `folder` fully into memory
    async fn fetch_buffer(&self, folder: &str, filename: &str) -> Result<AssetBuffer>;

    /// Load a top-level JSON document by name
    async fn fetch_json(&self, filename: &str) -> Result<serde_json::Value>;
}
