use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose;
use image::{DynamicImage, ImageFormat, RgbImage};
use tracing::debug;

use crate::error::AnalysisError;

/// An annotated image serialized for transport: the raw encoded bytes and
/// their base64 form.
#[derive(Debug)]
pub struct EncodedImage {
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
    pub base64: String,
}

/// Serialize the annotated buffer into the named raster format, in memory,
/// then base64-encode for transport.
pub fn encode_image(img: &RgbImage, format_name: &str) -> Result<EncodedImage, AnalysisError> {
    let format = parse_output_format(format_name)?;

    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img.clone())
        .write_to(&mut cursor, format)
        .map_err(|e| AnalysisError::Encoding(format!("{} encoder failed: {}", format_name, e)))?;

    let bytes = cursor.into_inner();
    let base64 = general_purpose::STANDARD.encode(&bytes);
    debug!(format = format_name, size = bytes.len(), "annotated image encoded");

    Ok(EncodedImage {
        format,
        bytes,
        base64,
    })
}

fn parse_output_format(name: &str) -> Result<ImageFormat, AnalysisError> {
    ImageFormat::from_extension(name.to_lowercase().as_str())
        .ok_or_else(|| AnalysisError::Encoding(format!("unsupported output format `{}`", name)))
}
