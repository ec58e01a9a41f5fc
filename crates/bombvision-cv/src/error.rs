//! Recognition failure taxonomy

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecognitionError {
    /// A geometric or colour search found no qualifying region or state, or
    /// more than one.
    #[error("ambiguous detection: {0}")]
    AmbiguousDetection(String),

    /// Extraction finished but produced a value the widget cannot physically
    /// show.
    #[error("result out of domain: {0}")]
    OutOfDomain(String),

    /// No reader scored the frame above the configured minimum.
    #[error("no recognizable widget (best presence score {best_score:.3})")]
    NoWidget { best_score: f32 },

    /// The caller handed in something the pipeline cannot work with.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl RecognitionError {
    pub fn ambiguous(reason: impl Into<String>) -> Self {
        Self::AmbiguousDetection(reason.into())
    }

    pub fn out_of_domain(reason: impl Into<String>) -> Self {
        Self::OutOfDomain(reason.into())
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, RecognitionError>;
