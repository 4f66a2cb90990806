//! Raster image values held by the buffer.
//!
//! `GeneratedImage` is immutable once built. PNG is the only export format;
//! decoding accepts whatever the `image` crate was built to read.
use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

#[derive(Debug, Clone)]
pub struct GeneratedImage {
    image: DynamicImage,
}

impl GeneratedImage {
    pub fn new(image: DynamicImage) -> Self {
        GeneratedImage { image }
    }

    /// Decode raw bytes (PNG, JPEG, WebP) into an image.
    pub fn from_bytes(bytes: &[u8]) -> image::ImageResult<Self> {
        image::load_from_memory(bytes).map(GeneratedImage::new)
    }

    /// A single-colour RGB square, used for placeholder buffers.
    pub fn solid(size: u32, rgb: [u8; 3]) -> Self {
        let img = RgbImage::from_pixel(size, size, Rgb(rgb));
        GeneratedImage::new(DynamicImage::ImageRgb8(img))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn to_png(&self) -> image::ImageResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
        Ok(buf)
    }

    pub fn to_base64_png(&self) -> image::ImageResult<String> {
        self.to_png().map(|png| BASE64.encode(png))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_encoding_preserves_pixels() {
        let mut img = RgbImage::new(8, 4);
        for (x, y, px) in img.enumerate_pixels_mut() {
            *px = Rgb([x as u8 * 30, y as u8 * 60, 7]);
        }
        let original = GeneratedImage::new(DynamicImage::ImageRgb8(img));
        let png = original.to_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = GeneratedImage::from_bytes(&png).unwrap();
        assert_eq!(decoded.width(), 8);
        assert_eq!(decoded.height(), 4);
        assert_eq!(decoded.as_image().to_rgb8(), original.as_image().to_rgb8());
    }

    #[test]
    fn base64_payload_decodes_back_to_png() {
        let img = GeneratedImage::solid(2, [255, 0, 0]);
        let encoded = img.to_base64_png().unwrap();
        let raw = BASE64.decode(encoded).unwrap();
        assert_eq!(raw, img.to_png().unwrap());
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(GeneratedImage::from_bytes(b"definitely not an image").is_err());
    }
}
