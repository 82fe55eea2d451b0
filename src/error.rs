use thiserror::Error;

/// Terminal failure of a single analysis run.
///
/// Input and decode failures are caller-fault and carry enough detail to
/// self-correct; processing and encoding failures are internal and stay
/// generic. No variant is retried anywhere in the crate.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("empty input payload, expected encoded image bytes")]
    Input,

    #[error("could not decode image: {0}")]
    Decode(String),

    #[error("unsupported image format `{format}`, supported formats: {supported}")]
    UnsupportedFormat { format: String, supported: String },

    #[error("image processing failed: {0}")]
    Processing(String),

    #[error("failed to encode result image: {0}")]
    Encoding(String),
}

impl AnalysisError {
    /// True for errors the caller can fix by changing the request.
    pub fn is_caller_fault(&self) -> bool {
        matches!(
            self,
            AnalysisError::Input | AnalysisError::Decode(_) | AnalysisError::UnsupportedFormat { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
