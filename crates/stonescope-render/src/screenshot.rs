//! Screenshot functionality for capturing rendered frames.

use image::{ImageBuffer, Rgba};
use std::path::Path;

/// Saves tightly packed RGBA pixel data to an image file.
///
/// The format follows the filename extension; `.png`, `.jpg` and `.jpeg`
/// are supported, with JPEG dropping the alpha channel.
///
/// # Errors
///
/// Fails when the data does not match the declared dimensions, the
/// extension is unrecognized, or the file cannot be written.
pub fn save_image(
    filename: &str,
    data: &[u8],
    width: u32,
    height: u32,
) -> Result<(), ScreenshotError> {
    let path = Path::new(filename);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    // wgpu readback is top-left origin already, no vertical flip.
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_raw(width, height, data.to_vec())
        .ok_or(ScreenshotError::InvalidImageData)?;

    match extension.as_str() {
        "png" => {
            img.save_with_format(path, image::ImageFormat::Png)?;
        }
        "jpg" | "jpeg" => {
            let rgb_img = image::DynamicImage::ImageRgba8(img).to_rgb8();
            rgb_img.save_with_format(path, image::ImageFormat::Jpeg)?;
        }
        _ => {
            return Err(ScreenshotError::UnsupportedFormat(extension));
        }
    }

    Ok(())
}

/// Encodes raw RGBA pixel data as a PNG in memory.
pub fn save_to_buffer(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ScreenshotError> {
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_raw(width, height, data.to_vec())
        .ok_or(ScreenshotError::InvalidImageData)?;

    let mut buffer = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)?;

    Ok(buffer.into_inner())
}

/// Errors from writing a captured frame to disk or memory.
#[derive(Debug, thiserror::Error)]
pub enum ScreenshotError {
    /// I/O error while writing the file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The image crate failed to encode the frame.
    #[error("image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    /// The filename extension names no supported format.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Pixel data does not match the declared dimensions.
    #[error("pixel data does not match the declared dimensions")]
    InvalidImageData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_to_buffer_produces_png() {
        let data = vec![255u8; 4 * 4 * 4];
        let png = save_to_buffer(&data, 4, 4).unwrap();
        // PNG magic bytes.
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_mismatched_dimensions_rejected() {
        let data = vec![0u8; 16];
        assert!(matches!(
            save_to_buffer(&data, 100, 100),
            Err(ScreenshotError::InvalidImageData)
        ));
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let data = vec![0u8; 4];
        let err = save_image("/tmp/frame.bmp", &data, 1, 1).unwrap_err();
        assert!(matches!(err, ScreenshotError::UnsupportedFormat(ext) if ext == "bmp"));
    }
}
