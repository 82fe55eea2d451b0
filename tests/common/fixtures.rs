use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Light concrete-like background color used across the fixtures.
pub const BACKGROUND: Rgb<u8> = Rgb([210, 210, 210]);

/// Creates a uniformly colored image with no structure to detect.
pub fn uniform_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, BACKGROUND)
}

/// Creates a light image with a single dark horizontal stroke at
/// (x, y) of the given size — one unambiguous crack candidate.
pub fn stroke_image(width: u32, height: u32, x: u32, y: u32, len: u32, thickness: u32) -> RgbImage {
    let mut img = uniform_image(width, height);
    for sy in y..y + thickness {
        for sx in x..x + len {
            img.put_pixel(sx, sy, Rgb([15, 15, 15]));
        }
    }
    img
}

/// Creates a light image with a large dark square — coverage big enough to
/// push severity past the High threshold.
pub fn blotch_image(width: u32, height: u32, x: u32, y: u32, side: u32) -> RgbImage {
    let mut img = uniform_image(width, height);
    for sy in y..y + side {
        for sx in x..x + side {
            img.put_pixel(sx, sy, Rgb([15, 15, 15]));
        }
    }
    img
}

/// Encode a buffer as PNG bytes, the way an uploader would hand them over.
pub fn png_bytes(img: &RgbImage) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img.clone())
        .write_to(&mut cursor, ImageFormat::Png)
        .expect("Failed to encode test image");
    cursor.into_inner()
}

/// A minimal GIF header — enough for signature-based format inference.
pub fn gif_bytes() -> Vec<u8> {
    b"GIF89a\x01\x00\x01\x00\x80\x00\x00\x00\x00\x00\xff\xff\xff".to_vec()
}
