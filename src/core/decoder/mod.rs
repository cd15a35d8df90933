//! # Decoder Module
//!
//! Turns a file path into the raster an engine needs: 8-bit grayscale for
//! hashing and keypoint detection, 8-bit RGB for histograms.
//!
//! JPEG files go through zune-jpeg (1.5-2x faster than the image crate),
//! with the image crate as fallback for everything else (PNG, BMP, WEBP,
//! GIF, TIFF, ...).
//!
//! Nothing is cached: every engine call re-decodes. This is a batch tool,
//! not a hot loop.

use crate::error::DecodeError;
use image::{DynamicImage, GrayImage, ImageBuffer, Rgb, RgbImage};
use std::fs;
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// Decode an image into an 8-bit grayscale raster.
pub fn decode_gray(path: &Path) -> Result<GrayImage, DecodeError> {
    Ok(decode(path)?.to_luma8())
}

/// Decode an image into an 8-bit RGB raster.
pub fn decode_rgb(path: &Path) -> Result<RgbImage, DecodeError> {
    Ok(decode(path)?.to_rgb8())
}

/// Decode an image file using the fastest available decoder.
pub fn decode(path: &Path) -> Result<DynamicImage, DecodeError> {
    if !path.exists() {
        return Err(DecodeError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let image = if is_jpeg(path) {
        decode_jpeg(path).or_else(|_| decode_fallback(path))?
    } else {
        decode_fallback(path)?
    };

    if image.width() == 0 || image.height() == 0 {
        return Err(DecodeError::EmptyImage {
            path: path.to_path_buf(),
        });
    }

    Ok(image)
}

fn is_jpeg(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref(),
        Some("jpg" | "jpeg")
    )
}

/// Fast JPEG decoding using zune-jpeg, forced to RGB output.
fn decode_jpeg(path: &Path) -> Result<DynamicImage, DecodeError> {
    let file_bytes = fs::read(path).map_err(|e| DecodeError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
    let mut decoder = JpegDecoder::new_with_options(&file_bytes, options);

    let pixels = decoder.decode().map_err(|e| DecodeError::Malformed {
        path: path.to_path_buf(),
        reason: format!("zune-jpeg decode failed: {:?}", e),
    })?;

    let info = decoder.info().ok_or_else(|| DecodeError::Malformed {
        path: path.to_path_buf(),
        reason: "missing JPEG header info".to_string(),
    })?;

    let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_raw(info.width as u32, info.height as u32, pixels).ok_or_else(|| {
            DecodeError::Malformed {
                path: path.to_path_buf(),
                reason: "JPEG pixel buffer size mismatch".to_string(),
            }
        })?;

    Ok(DynamicImage::ImageRgb8(buffer))
}

/// Fallback for all non-JPEG formats.
fn decode_fallback(path: &Path) -> Result<DynamicImage, DecodeError> {
    image::open(path).map_err(|e| DecodeError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_png(dir: &TempDir, name: &str, r: u8, g: u8, b: u8) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let img: RgbImage = ImageBuffer::from_fn(16, 16, |_, _| Rgb([r, g, b]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn missing_file_is_reported() {
        let result = decode(Path::new("/definitely/not/here.png"));
        assert!(matches!(result, Err(DecodeError::FileNotFound { .. })));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"this is not an image").unwrap();
        drop(file);

        let result = decode(&path);
        assert!(matches!(result, Err(DecodeError::Malformed { .. })));
    }

    #[test]
    fn png_decodes_to_rgb() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "red.png", 255, 0, 0);

        let rgb = decode_rgb(&path).unwrap();
        assert_eq!(rgb.dimensions(), (16, 16));
        assert_eq!(rgb.get_pixel(0, 0).0, [255, 0, 0]);
    }

    #[test]
    fn png_decodes_to_grayscale() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "gray.png", 128, 128, 128);

        let gray = decode_gray(&path).unwrap();
        assert_eq!(gray.dimensions(), (16, 16));
        assert_eq!(gray.get_pixel(0, 0).0[0], 128);
    }

    #[test]
    fn jpeg_extension_detection() {
        assert!(is_jpeg(Path::new("photo.jpg")));
        assert!(is_jpeg(Path::new("photo.JPEG")));
        assert!(!is_jpeg(Path::new("photo.png")));
    }
}
