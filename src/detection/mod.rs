pub mod annotate;
pub mod contours;
pub mod decode;
pub mod encode;
pub mod metrics;
pub mod preprocessing;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use image::{GrayImage, RgbImage};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AnalysisError;
use crate::models::AnalysisResult;

/// Sequences the full pipeline on a single image: decode, preprocess, extract
/// regions, compute metrics, annotate, encode.
///
/// One analyzer runs one invocation at a time; concurrent invocations get
/// independent analyzers sharing the same `Arc<Config>`. Every intermediate
/// buffer is owned by its stage and dropped when the stage scope ends, on
/// success and error paths alike.
pub struct CrackAnalyzer {
    config: Arc<Config>,
    debug: Option<DebugSink>,
}

impl CrackAnalyzer {
    pub fn new(config: Config) -> Self {
        Self::from_shared(Arc::new(config))
    }

    /// Build an analyzer over an already-shared config, e.g. from a pool
    /// worker.
    pub fn from_shared(config: Arc<Config>) -> Self {
        Self {
            config,
            debug: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Dump every intermediate stage image into `dir`.
    /// The directory must be empty or non-existent.
    pub fn with_debug(mut self, dir: PathBuf) -> anyhow::Result<Self> {
        self.debug = Some(DebugSink::create(dir)?);
        Ok(self)
    }

    /// Analyze one encoded image. The first failing stage aborts the rest;
    /// no partial result is ever returned.
    pub fn analyze(&self, bytes: &[u8]) -> Result<AnalysisResult, AnalysisError> {
        let started = Instant::now();

        if bytes.is_empty() {
            return Err(AnalysisError::Input);
        }

        let original = decode::decode_image(bytes, &self.config)?;
        let (width, height) = original.dimensions();
        info!(width, height, bytes = bytes.len(), "analyzing image");
        if let Some(sink) = &self.debug {
            sink.save_rgb("00_input", &original);
        }

        let regions = {
            let artifacts = preprocessing::build_crack_mask(&original, &self.config)?;
            if let Some(sink) = &self.debug {
                sink.save_gray("01_grayscale", &artifacts.grayscale);
                sink.save_gray("02_blurred", &artifacts.blurred);
                if let Some(threshold) = &artifacts.threshold {
                    sink.save_gray("03_threshold", threshold);
                }
                sink.save_gray("04_edges", &artifacts.edges);
                sink.save_gray("05_mask", &artifacts.mask);
            }
            contours::extract_regions(&artifacts.mask, self.config.min_crack_area)
        };

        let metrics = metrics::compute(&regions, width, height)?;
        debug!(
            regions = regions.len(),
            total_area = metrics.total_area,
            percentage = metrics.crack_percentage,
            "metrics computed"
        );

        let annotated = annotate::draw_regions(&original, &regions);
        if let Some(sink) = &self.debug {
            sink.save_rgb("06_annotated", &annotated);
        }

        let encoded = encode::encode_image(&annotated, &self.config.output_format)?;

        let processing_time_ms = started.elapsed().as_millis() as u64;
        info!(
            cracks = regions.len(),
            severity = %metrics.severity,
            elapsed_ms = processing_time_ms,
            "analysis complete"
        );

        Ok(AnalysisResult {
            cracks_detected: !regions.is_empty(),
            crack_count: regions.len(),
            total_crack_area: metrics.total_area,
            crack_percentage: metrics.crack_percentage,
            severity: metrics.severity,
            crack_regions: regions,
            processed_image_base64: encoded.base64,
            processing_time_ms,
        })
    }
}

impl Default for CrackAnalyzer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Writes numbered per-stage PNGs into a directory for inspection.
struct DebugSink {
    dir: PathBuf,
}

impl DebugSink {
    /// The directory must be empty or non-existent, so dumps from different
    /// runs cannot mix.
    fn create(dir: PathBuf) -> anyhow::Result<Self> {
        if dir.exists() {
            let entries = std::fs::read_dir(&dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    // Dump failures are logged, never fatal to the analysis itself.
    fn save_gray(&self, name: &str, img: &GrayImage) {
        let path = self.dir.join(format!("{}.png", name));
        if let Err(e) = img.save(&path) {
            warn!(path = %path.display(), "failed to save debug image: {}", e);
        }
    }

    fn save_rgb(&self, name: &str, img: &RgbImage) {
        let path = self.dir.join(format!("{}.png", name));
        if let Err(e) = img.save(&path) {
            warn!(path = %path.display(), "failed to save debug image: {}", e);
        }
    }
}
