use serde::{Deserialize, Serialize};

/// Pipeline parameters, supplied once per invocation and never mutated by the
/// pipeline. Safe to share read-only across concurrent runs.
///
/// All fields have defaults, so a partial JSON document (or `{}`) binds fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Offset subtracted from the local mean in the adaptive threshold branch.
    pub threshold_offset: i32,
    /// Window size of the adaptive threshold branch, in pixels.
    pub threshold_block_size: u32,
    /// Gaussian blur kernel size. Must be odd. Only used to derive sigma when
    /// `gaussian_sigma` is not positive.
    pub blur_kernel_size: u32,
    pub canny_low_threshold: f32,
    pub canny_high_threshold: f32,
    /// Square structuring element size for dilation/erosion. Must be odd.
    pub morphology_kernel_size: u32,
    /// Contours with a polygon area below this are discarded.
    pub min_crack_area: f64,
    pub dilation_iterations: u32,
    pub erosion_iterations: u32,
    /// Lowercase extension allow-list checked against the decoded signature.
    pub supported_formats: Vec<String>,
    /// Encoding format of the annotated output image.
    pub output_format: String,
    /// Worker count of the analysis pool.
    pub processing_threads: usize,
    pub gaussian_sigma: f32,
    /// Compute the adaptive threshold branch. Its output is only surfaced
    /// through the debug sink; extraction always consumes the edge mask.
    pub adaptive_threshold: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold_offset: 127,
            threshold_block_size: 100,
            blur_kernel_size: 5,
            canny_low_threshold: 50.0,
            canny_high_threshold: 150.0,
            morphology_kernel_size: 3,
            min_crack_area: 100.0,
            dilation_iterations: 2,
            erosion_iterations: 1,
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "bmp".to_string(),
            ],
            output_format: "png".to_string(),
            processing_threads: 4,
            gaussian_sigma: 2.0,
            adaptive_threshold: false,
        }
    }
}

impl Config {
    /// Case-insensitive allow-list check on a format extension.
    pub fn is_supported_format(&self, format: &str) -> bool {
        let format = format.to_lowercase();
        self.supported_formats.iter().any(|f| f.to_lowercase() == format)
    }

    /// The allow-list as a display string for caller-facing errors.
    pub fn supported_formats_display(&self) -> String {
        self.supported_formats.join(", ")
    }

    /// Effective blur sigma: `gaussian_sigma` when positive, otherwise derived
    /// from the kernel size with the conventional 0.3*((k-1)*0.5 - 1) + 0.8
    /// rule.
    pub fn blur_sigma(&self) -> f32 {
        if self.gaussian_sigma > 0.0 {
            self.gaussian_sigma
        } else {
            0.3 * ((self.blur_kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
        }
    }
}
