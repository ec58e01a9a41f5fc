//! Bomb widget recognition library
//!
//! Reads battery holders, indicators, port plates and serial-number plates
//! from still images. The toolkit layers (colour model, geometry, template
//! recognizer) are widget-agnostic; the readers in [`readers`] combine them
//! with per-widget calibration, and [`detection`] dispatches a frame to the
//! reader that claims it.

pub mod color;
pub mod detection;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod readers;
pub mod template;
pub mod utils;

// Re-export commonly used types
pub use bombvision_core::{IndicatorLabel, LightsState, PortSet, PortType, ReadData, WidgetKind};
pub use color::{ColorBucket, Hsv, PixelCounts};
pub use detection::{ReaderRegistry, Recognition, RecognitionConfig};
pub use error::{RecognitionError, Result};
pub use frame::Frame;
pub use geometry::{Point, Quad, Rect};
pub use template::{GlyphSet, Match, TemplateRecognizer};
pub use utils::DebugOverlay;

/// Core traits for the recognition pipeline
pub mod traits {
    use super::*;

    /// One recognizable widget type.
    ///
    /// `presence_score` must stay cheap: it only looks at the histogram and
    /// is used to rank readers against each other. `extract` does the full
    /// analysis and is only called on the winner.
    pub trait WidgetReader: Send + Sync {
        fn kind(&self) -> WidgetKind;

        fn presence_score(&self, frame: &Frame, counts: &PixelCounts) -> f32;

        fn extract(&self, frame: &Frame, debug: Option<&mut DebugOverlay>) -> Result<ReadData>;
    }
}
