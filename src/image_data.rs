//! Conversion between picked image files and self-contained data URLs.

use base64::{Engine as _, engine::general_purpose};
use image::ImageFormat;
use std::path::Path;

use crate::error::ImageError;

/// Image bytes recovered from a stored data URL.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DecodedImage {
    pub fn to_rgba(&self) -> Result<image::RgbaImage, ImageError> {
        image::load_from_memory(&self.bytes)
            .map(|img| img.to_rgba8())
            .map_err(|e| ImageError::Decode(e.to_string()))
    }
}

pub fn encode_file(path: &Path, max_bytes: usize) -> Result<String, ImageError> {
    let size = std::fs::metadata(path)?.len() as usize;
    if size > max_bytes {
        return Err(ImageError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let bytes = std::fs::read(path)?;
    encode_bytes(&bytes, max_bytes)
}

/// Validates that `bytes` hold a decodable image and wraps them as a data URL.
pub fn encode_bytes(bytes: &[u8], max_bytes: usize) -> Result<String, ImageError> {
    if bytes.len() > max_bytes {
        return Err(ImageError::TooLarge {
            size: bytes.len(),
            limit: max_bytes,
        });
    }

    let format = image::guess_format(bytes).map_err(|_| ImageError::UnsupportedFormat)?;
    image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::Decode(e.to_string()))?;

    Ok(format!(
        "data:{};base64,{}",
        mime_for(format),
        general_purpose::STANDARD.encode(bytes)
    ))
}

pub fn decode_data_url(url: &str) -> Result<DecodedImage, ImageError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or(ImageError::MalformedDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(ImageError::MalformedDataUrl)?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or(ImageError::MalformedDataUrl)?;

    let bytes = general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|_| ImageError::MalformedDataUrl)?;

    Ok(DecodedImage {
        mime: mime.to_string(),
        bytes,
    })
}

fn mime_for(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const LIMIT: usize = 1024 * 1024;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn png_becomes_png_data_url() {
        let url = encode_bytes(&tiny_png(), LIMIT).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        let decoded = decode_data_url(&url).unwrap();
        assert_eq!(decoded.mime, "image/png");
        assert_eq!(decoded.to_rgba().unwrap().dimensions(), (2, 2));
    }

    #[test]
    fn text_file_is_rejected() {
        let err = encode_bytes(b"just some notes", LIMIT).unwrap_err();
        assert!(matches!(err, ImageError::UnsupportedFormat));
    }

    #[test]
    fn truncated_png_fails_to_decode() {
        let png = tiny_png();
        let err = encode_bytes(&png[..png.len() / 2], LIMIT).unwrap_err();
        assert!(matches!(err, ImageError::Decode(_)));
    }

    #[test]
    fn oversized_file_is_rejected_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        std::fs::write(&path, tiny_png()).unwrap();

        let err = encode_file(&path, 8).unwrap_err();
        assert!(matches!(err, ImageError::TooLarge { limit: 8, .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = encode_file(Path::new("/definitely/not/here.png"), LIMIT).unwrap_err();
        assert!(matches!(err, ImageError::Io(_)));
    }

    #[test]
    fn plain_url_is_not_a_data_url() {
        assert!(matches!(
            decode_data_url("https://example.com/cat.png"),
            Err(ImageError::MalformedDataUrl)
        ));
    }
}
