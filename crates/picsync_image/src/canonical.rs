//! Canonical payload construction.

use crate::DataUrl;
use image::{DynamicImage, ImageFormat};
use picsync_core::Rotation;
use picsync_error::{ImageError, ImageErrorKind, PicsyncResult};
use std::io::Cursor;

/// Build the canonical `data:` URL for raw image bytes.
///
/// Upright images keep their original bytes and format. Rotated images are
/// decoded, turned, and re-encoded as PNG.
///
/// # Errors
///
/// Returns `Codec` if the format cannot be detected or the image cannot be
/// decoded or re-encoded.
#[tracing::instrument(skip(bytes), fields(size = bytes.len(), rotation = %rotation))]
pub fn canonical_payload(bytes: &[u8], rotation: Rotation) -> PicsyncResult<String> {
    if rotation.is_identity() {
        let format = image::guess_format(bytes)
            .map_err(|e| ImageError::new(ImageErrorKind::Codec(e.to_string())))?;
        return Ok(DataUrl::new(format.to_mime_type(), bytes.to_vec()).encode());
    }

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ImageError::new(ImageErrorKind::Codec(e.to_string())))?;
    let rotated = rotate(decoded, rotation);

    let mut encoded = Vec::new();
    rotated
        .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
        .map_err(|e| ImageError::new(ImageErrorKind::Codec(e.to_string())))?;

    tracing::debug!(
        width = rotated.width(),
        height = rotated.height(),
        encoded = encoded.len(),
        "Re-encoded rotated image"
    );
    Ok(DataUrl::new(ImageFormat::Png.to_mime_type(), encoded).encode())
}

/// Apply `rotation` to an existing `data:` URL payload.
///
/// Upright returns the payload untouched, so payloads that are not data URLs
/// (hosted image links) pass through.
pub fn rotate_payload(payload: &str, rotation: Rotation) -> PicsyncResult<String> {
    if rotation.is_identity() {
        return Ok(payload.to_string());
    }
    let url = DataUrl::parse(payload)?;
    canonical_payload(url.data(), rotation)
}

fn rotate(image: DynamicImage, rotation: Rotation) -> DynamicImage {
    match rotation {
        Rotation::Upright => image,
        Rotation::Quarter => image.rotate90(),
        Rotation::Half => image.rotate180(),
        Rotation::ThreeQuarter => image.rotate270(),
    }
}
