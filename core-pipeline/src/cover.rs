//! Playlist cover preparation
//!
//! The platform renders playlist covers square; source artwork is wide.
//! Crop to the centered square and re-encode as JPEG.

use crate::error::{PipelineError, Result};
use bytes::Bytes;
use image::DynamicImage;
use std::io::Cursor;

/// JPEG content type of prepared covers
pub const COVER_CONTENT_TYPE: &str = "image/jpeg";

/// Crop `data` to its centered square and encode as JPEG
pub fn crop_to_square(data: &[u8]) -> Result<Bytes> {
    let img = image::load_from_memory(data).map_err(|e| PipelineError::Image(e.to_string()))?;

    let (width, height) = (img.width(), img.height());
    let side = width.min(height);
    let x = (width - side) / 2;
    let y = (height - side) / 2;
    let square = img.crop_imm(x, y, side, side);

    let mut out = Cursor::new(Vec::new());
    // JPEG carries no alpha channel
    DynamicImage::ImageRgb8(square.into_rgb8())
        .write_to(&mut out, image::ImageFormat::Jpeg)
        .map_err(|e| PipelineError::Image(e.to_string()))?;
    Ok(Bytes::from(out.into_inner()))
}
