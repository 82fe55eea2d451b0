use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{dilate, erode};
use tracing::debug;

use crate::config::Config;
use crate::error::AnalysisError;

/// Intermediate buffers produced while building the crack mask.
///
/// `mask` is the only buffer consumed downstream; the rest are kept so the
/// debug sink can dump every stage. `threshold` is present only when the
/// adaptive threshold branch is toggled on, and nothing downstream reads it.
#[derive(Debug)]
pub struct MaskArtifacts {
    pub grayscale: GrayImage,
    pub blurred: GrayImage,
    pub threshold: Option<GrayImage>,
    pub edges: GrayImage,
    pub mask: GrayImage,
}

/// Run the fixed preprocessing chain: grayscale, Gaussian blur, optional
/// adaptive threshold branch, Canny edges, then morphological closing to
/// bridge broken edge segments into contiguous crack masks.
pub fn build_crack_mask(original: &RgbImage, config: &Config) -> Result<MaskArtifacts, AnalysisError> {
    validate(config)?;

    let grayscale = image::imageops::grayscale(original);

    let sigma = config.blur_sigma();
    let blurred = gaussian_blur_f32(&grayscale, sigma);
    debug!(sigma, "grayscale and blur applied");

    let threshold = if config.adaptive_threshold {
        let map = adaptive_threshold_inv(
            &blurred,
            config.threshold_block_size,
            config.threshold_offset,
        );
        debug!(
            block_size = config.threshold_block_size,
            offset = config.threshold_offset,
            "adaptive threshold branch computed"
        );
        Some(map)
    } else {
        None
    };

    let edges = canny(
        &blurred,
        config.canny_low_threshold,
        config.canny_high_threshold,
    );

    let mask = close_mask(
        edges.clone(),
        config.morphology_kernel_size,
        config.dilation_iterations,
        config.erosion_iterations,
    );
    debug!(
        kernel = config.morphology_kernel_size,
        dilations = config.dilation_iterations,
        erosions = config.erosion_iterations,
        "edge mask closed"
    );

    Ok(MaskArtifacts {
        grayscale,
        blurred,
        threshold,
        edges,
        mask,
    })
}

fn validate(config: &Config) -> Result<(), AnalysisError> {
    if config.blur_kernel_size == 0 || config.blur_kernel_size % 2 == 0 {
        return Err(AnalysisError::Processing(format!(
            "blur kernel size must be a positive odd number, got {}",
            config.blur_kernel_size
        )));
    }
    if config.morphology_kernel_size == 0 || config.morphology_kernel_size % 2 == 0 {
        return Err(AnalysisError::Processing(format!(
            "morphology kernel size must be a positive odd number, got {}",
            config.morphology_kernel_size
        )));
    }
    if config.canny_low_threshold > config.canny_high_threshold {
        return Err(AnalysisError::Processing(format!(
            "canny low threshold {} exceeds high threshold {}",
            config.canny_low_threshold, config.canny_high_threshold
        )));
    }
    if config.adaptive_threshold && config.threshold_block_size == 0 {
        return Err(AnalysisError::Processing(
            "adaptive threshold block size must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Dilate then erode with a square structuring element. One iteration moves
/// the boundary by `kernel_size / 2` pixels under the LInf norm.
fn close_mask(edges: GrayImage, kernel_size: u32, dilations: u32, erosions: u32) -> GrayImage {
    let radius = (kernel_size / 2).min(u8::MAX as u32) as u8;
    if radius == 0 {
        return edges;
    }
    let mut mask = edges;
    for _ in 0..dilations {
        mask = dilate(&mask, Norm::LInf, radius);
    }
    for _ in 0..erosions {
        mask = erode(&mask, Norm::LInf, radius);
    }
    mask
}

/// Binary-inverse adaptive threshold: a pixel becomes foreground (255) when it
/// is darker than the local mean minus `offset`. The local mean is computed
/// over a `block_size` window via an integral image.
fn adaptive_threshold_inv(gray: &GrayImage, block_size: u32, offset: i32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let integral = integral_image(gray);
    let radius = (block_size / 2).max(1);

    let mut output = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let mean = region_mean(&integral, width, height, x, y, radius);
            let threshold = (mean as i32 - offset).clamp(0, 255);
            let value = if (gray.get_pixel(x, y)[0] as i32) < threshold {
                255u8
            } else {
                0u8
            };
            output.put_pixel(x, y, Luma([value]));
        }
    }
    output
}

/// Summed-area table with a one-row/one-column zero border, row-major,
/// (width + 1) * (height + 1) entries.
fn integral_image(gray: &GrayImage) -> Vec<u64> {
    let (width, height) = gray.dimensions();
    let stride = width as usize + 1;
    let mut integral = vec![0u64; stride * (height as usize + 1)];

    for y in 0..height as usize {
        let mut row_sum = 0u64;
        for x in 0..width as usize {
            row_sum += gray.get_pixel(x as u32, y as u32)[0] as u64;
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row_sum;
        }
    }
    integral
}

fn region_mean(integral: &[u64], width: u32, height: u32, x: u32, y: u32, radius: u32) -> u64 {
    let stride = width as usize + 1;
    let x0 = x.saturating_sub(radius) as usize;
    let y0 = y.saturating_sub(radius) as usize;
    let x1 = (x + radius + 1).min(width) as usize;
    let y1 = (y + radius + 1).min(height) as usize;

    let sum = integral[y1 * stride + x1] + integral[y0 * stride + x0]
        - integral[y0 * stride + x1]
        - integral[y1 * stride + x0];
    let count = ((x1 - x0) * (y1 - y0)) as u64;
    sum / count.max(1)
}
