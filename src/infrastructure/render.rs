// ============================================================
// PNG RENDER SURFACE
// ============================================================
// Shared pixel-buffer-to-PNG plumbing for the chart renderers. Charts
// draw into an in-memory RGB buffer; nothing touches the filesystem.

use image::{ImageFormat, RgbImage};

use crate::domain::error::{AppError, Result};

/// Bytes per pixel of the plotters bitmap backend (RGB)
const BYTES_PER_PIXEL: usize = 3;

/// Allocate a white RGB buffer sized for the given dimensions
pub fn pixel_buffer(width: u32, height: u32) -> Vec<u8> {
    vec![0xFF; width as usize * height as usize * BYTES_PER_PIXEL]
}

/// Encode a raw RGB buffer as PNG bytes
pub fn encode_png(width: u32, height: u32, raw: Vec<u8>) -> Result<Vec<u8>> {
    let img = RgbImage::from_raw(width, height, raw).ok_or_else(|| {
        AppError::SerializationError("Pixel buffer does not match chart dimensions".to_string())
    })?;

    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| AppError::SerializationError(format!("Failed to encode PNG: {}", e)))?;

    Ok(png)
}

/// Map any drawing backend failure into the crate error type
pub fn render_error<E: std::fmt::Display>(err: E) -> AppError {
    AppError::SerializationError(format!("Failed to render chart: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_png_signature() {
        let png = encode_png(2, 2, pixel_buffer(2, 2)).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n']);
    }

    #[test]
    fn test_encode_rejects_wrong_buffer_size() {
        let result = encode_png(4, 4, vec![0u8; 3]);
        assert!(matches!(result, Err(AppError::SerializationError(_))));
    }
}
