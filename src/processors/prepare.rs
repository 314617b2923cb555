//! Source image preparation for inference transport.
//!
//! Normalizes an arbitrary uploaded photo into a bounded-size, bounded-quality
//! JPEG suitable for a vision model endpoint: a uniform downscale when either
//! side exceeds the configured cap, a re-encode only when actually needed, and
//! base64 encoding for the request body. Images that are already in-budget
//! JPEGs pass through byte-identical.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::borrow::Cow;
use tracing::debug;

use crate::core::config::PipelineConfig;
use crate::core::errors::VectorizeError;

/// An encoded image ready for transmission to an inference endpoint.
///
/// Scoped to one pipeline invocation; never persisted.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    /// Base64-encoded JPEG payload.
    pub base64: String,
    /// Effective pixel width after any downscaling.
    pub width: u32,
    /// Effective pixel height after any downscaling.
    pub height: u32,
}

/// Prepares raw image bytes for inference.
///
/// If either dimension exceeds the configured cap, both are scaled by a
/// single factor `cap / max(width, height)` (rounded, aspect preserved,
/// never upscaled) and the result is re-encoded as JPEG at the configured
/// quality. A source that is within budget is re-encoded only when it is not
/// already a JPEG; otherwise its bytes are passed through unchanged.
///
/// # Errors
///
/// [`VectorizeError::ImageDecode`] when the bytes cannot be decoded at all,
/// [`VectorizeError::ImageEncode`] when the JPEG re-encode fails.
pub fn prepare(raw: &[u8], config: &PipelineConfig) -> Result<PreparedImage, VectorizeError> {
    let source = image::load_from_memory(raw).map_err(VectorizeError::ImageDecode)?;
    let (src_width, src_height) = (source.width(), source.height());

    let cap = config.max_image_dimension;
    let needs_resize = src_width > cap || src_height > cap;
    let (width, height) = if needs_resize {
        let factor = f64::from(cap) / f64::from(src_width.max(src_height));
        (
            (f64::from(src_width) * factor).round() as u32,
            (f64::from(src_height) * factor).round() as u32,
        )
    } else {
        (src_width, src_height)
    };

    let already_jpeg = image::guess_format(raw).is_ok_and(|format| format == ImageFormat::Jpeg);
    let payload: Cow<'_, [u8]> = if needs_resize {
        let resized = source.resize_exact(width, height, FilterType::Lanczos3);
        Cow::Owned(encode_jpeg(&resized, config.jpeg_quality)?)
    } else if !already_jpeg {
        Cow::Owned(encode_jpeg(&source, config.jpeg_quality)?)
    } else {
        Cow::Borrowed(raw)
    };

    debug!(
        src_width,
        src_height,
        width,
        height,
        payload_kb = payload.len() / 1024,
        "prepared image for inference"
    );

    Ok(PreparedImage {
        base64: BASE64.encode(&payload),
        width,
        height,
    })
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, VectorizeError> {
    let rgb = img.to_rgb8();
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(VectorizeError::ImageEncode)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([120, 130, 140]),
        ));
        encode_jpeg(&img, 85).unwrap()
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([120, 130, 140]),
        ));
        let mut buffer = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_in_budget_jpeg_passes_through_unchanged() {
        let original = jpeg_bytes(100, 80);
        let prepared = prepare(&original, &PipelineConfig::default()).unwrap();
        assert_eq!(prepared.width, 100);
        assert_eq!(prepared.height, 80);
        assert_eq!(BASE64.decode(&prepared.base64).unwrap(), original);
    }

    #[test]
    fn test_oversized_image_is_capped_with_aspect_preserved() {
        let original = jpeg_bytes(2000, 1000);
        let prepared = prepare(&original, &PipelineConfig::default()).unwrap();
        assert_eq!(prepared.width.max(prepared.height), 1536);
        assert_eq!(prepared.width, 1536);
        assert_eq!(prepared.height, 768);

        let decoded = BASE64.decode(&prepared.base64).unwrap();
        let reloaded = image::load_from_memory(&decoded).unwrap();
        assert_eq!(reloaded.width(), 1536);
        assert_eq!(reloaded.height(), 768);
    }

    #[test]
    fn test_oversized_portrait_caps_height() {
        let original = jpeg_bytes(500, 2048);
        let prepared = prepare(&original, &PipelineConfig::default()).unwrap();
        assert_eq!(prepared.height, 1536);
        assert_eq!(prepared.width, 375);
    }

    #[test]
    fn test_in_budget_png_is_reencoded_as_jpeg() {
        let original = png_bytes(64, 64);
        let prepared = prepare(&original, &PipelineConfig::default()).unwrap();
        assert_eq!((prepared.width, prepared.height), (64, 64));

        let decoded = BASE64.decode(&prepared.base64).unwrap();
        assert_ne!(decoded, original);
        assert_eq!(image::guess_format(&decoded).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_undecodable_bytes_fail_with_decode_error() {
        let err = prepare(b"definitely not an image", &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, VectorizeError::ImageDecode(_)));
    }

    #[test]
    fn test_never_upscales() {
        let original = jpeg_bytes(10, 10);
        let prepared = prepare(&original, &PipelineConfig::default()).unwrap();
        assert_eq!((prepared.width, prepared.height), (10, 10));
    }
}
