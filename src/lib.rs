pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod pool;

pub use config::Config;
pub use detection::CrackAnalyzer;
pub use error::AnalysisError;
pub use models::{AnalysisResult, CrackRegion, Severity};
pub use pool::{AnalysisJob, AnalysisOutcome, AnalysisPool};

/// Analyze a single encoded image with the given configuration.
///
/// Convenience wrapper over [`CrackAnalyzer`] for one-shot callers.
pub fn analyze(image_bytes: &[u8], config: &Config) -> Result<AnalysisResult, AnalysisError> {
    CrackAnalyzer::new(config.clone()).analyze(image_bytes)
}
