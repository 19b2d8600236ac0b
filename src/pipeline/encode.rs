//! JPEG encoding of rendered page bitmaps.
//!
//! JPEG is the one format every PDF viewer decodes natively (`DCTDecode`),
//! so the encoded bytes can be embedded in the output unchanged. Quality is
//! the caller's 1–100 knob; 80 keeps scanned text legible at roughly a
//! quarter of the lossless size.

use crate::error::DocumentError;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, RgbImage};

/// Compress one rendered page to JPEG at the given quality.
pub fn encode_jpeg(image: &RgbImage, quality: u8, page: usize) -> Result<Vec<u8>, DocumentError> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
    encoder
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| DocumentError::Encode {
            page,
            detail: e.to_string(),
        })?;
    Ok(bytes)
}
