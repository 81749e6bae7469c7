//! Drive API response types

use serde::Deserialize;

/// One file resource, with the fields the source requests
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    /// The API returns sizes as decimal strings
    #[serde(default)]
    pub size: Option<String>,
}

impl DriveFile {
    pub fn size_bytes(&self) -> Option<u64> {
        self.size.as_deref().and_then(|s| s.parse().ok())
    }
}

/// Response of a `files.list` call
#[derive(Debug, Clone, Deserialize)]
pub struct FilesListResponse {
    #[serde(default)]
    pub files: Vec<DriveFile>,
}
