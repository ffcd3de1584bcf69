//! Image encoding: `DynamicImage` → PNG bytes for the MRZ reader.
//!
//! MRZ readers accept encoded image bytes, the same shape as an uploaded
//! photo. PNG is lossless, so the small monospaced MRZ glyphs survive the
//! round trip without compression artefacts.

use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a rasterised page as PNG bytes.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    debug!("Encoded {}x{} image → {} bytes PNG", img.width(), img.height(), buf.len());
    Ok(buf)
}
