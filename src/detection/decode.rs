use image::{ImageFormat, RgbImage};
use tracing::debug;

use crate::config::Config;
use crate::error::AnalysisError;

/// Decode encoded image bytes into an RGB buffer.
///
/// The format is inferred from the byte signature, then checked against the
/// configured allow-list before any pixel data is touched. Formats are matched
/// on their canonical extensions, case-insensitively.
pub fn decode_image(bytes: &[u8], config: &Config) -> Result<RgbImage, AnalysisError> {
    let format = image::guess_format(bytes)
        .map_err(|e| AnalysisError::Decode(format!("unrecognized image signature: {}", e)))?;

    if !format_allowed(format, config) {
        return Err(AnalysisError::UnsupportedFormat {
            format: format_name(format),
            supported: config.supported_formats_display(),
        });
    }

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| AnalysisError::Decode(format!("invalid {} data: {}", format_name(format), e)))?;

    debug!(
        format = %format_name(format),
        width = img.width(),
        height = img.height(),
        "image decoded"
    );

    Ok(img.to_rgb8())
}

fn format_allowed(format: ImageFormat, config: &Config) -> bool {
    format
        .extensions_str()
        .iter()
        .any(|ext| config.is_supported_format(ext))
}

fn format_name(format: ImageFormat) -> String {
    format
        .extensions_str()
        .first()
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("{:?}", format).to_lowercase())
}
