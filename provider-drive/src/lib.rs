//! # Drive Asset Source
//!
//! Read-only Google Drive v3 client behind the [`AssetSource`] seam.
//!
//! Source media lives in a shared drive, organized one folder per item;
//! manifest documents sit at the drive root. Lookups are by name, scoped to
//! the configured drive, exactly as the production library is organized.
//!
//! [`AssetSource`]: platform_traits::AssetSource

pub mod client;
pub mod types;

pub use client::{DriveClient, DriveConfig};
