//! Reader registry: ranks readers by presence score and runs the winner

use super::config::{GlyphConfig, RecognitionConfig};
use crate::color::PixelCounts;
use crate::error::{RecognitionError, Result};
use crate::frame::Frame;
use crate::readers::{BatteryHolderReader, IndicatorReader, PortPlateReader, SerialNumberReader};
use crate::template::{indicator_alphabet, GlyphFont, GlyphLoader, TemplateRecognizer, SERIAL_ALPHABET};
use crate::traits::WidgetReader;
use crate::utils::DebugOverlay;
use bombvision_core::{ReadData, WidgetKind};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// Outcome of recognizing one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    pub kind: WidgetKind,
    /// Presence score of the winning reader.
    pub score: f32,
    pub data: ReadData,
}

/// Fixed list of widget readers plus the dispatch threshold.
pub struct ReaderRegistry {
    readers: Vec<Box<dyn WidgetReader>>,
    min_confidence: f32,
}

static SHARED: OnceLock<std::result::Result<ReaderRegistry, String>> = OnceLock::new();

impl ReaderRegistry {
    /// Registry with every widget reader, glyph tables built from `config`.
    pub fn standard(config: &RecognitionConfig) -> anyhow::Result<Self> {
        let (serial, indicator) = build_recognizers(&config.glyph)?;

        let readers: Vec<Box<dyn WidgetReader>> = vec![
            Box::new(BatteryHolderReader::new()),
            Box::new(IndicatorReader::new(Arc::new(indicator))),
            Box::new(PortPlateReader::new()),
            Box::new(SerialNumberReader::new(Arc::new(serial))),
        ];
        Ok(Self::with_readers(readers, config.min_confidence))
    }

    pub fn with_readers(readers: Vec<Box<dyn WidgetReader>>, min_confidence: f32) -> Self {
        Self {
            readers,
            min_confidence,
        }
    }

    /// Process-wide registry with the default configuration, built on first use.
    pub fn shared() -> Result<&'static ReaderRegistry> {
        SHARED
            .get_or_init(|| {
                Self::standard(&RecognitionConfig::default()).map_err(|e| format!("{:#}", e))
            })
            .as_ref()
            .map_err(|reason| RecognitionError::invalid_input(reason.clone()))
    }

    pub fn kinds(&self) -> Vec<WidgetKind> {
        self.readers.iter().map(|reader| reader.kind()).collect()
    }

    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }

    /// Presence score of every reader, in registration order.
    pub fn scores(&self, frame: &Frame) -> Vec<(WidgetKind, f32)> {
        let counts = PixelCounts::compute(frame);
        self.readers
            .iter()
            .map(|reader| (reader.kind(), reader.presence_score(frame, &counts)))
            .collect()
    }

    /// Read the frame with the reader that claims it most strongly.
    ///
    /// Ties go to the reader registered first. Only the winner extracts.
    pub fn recognize(&self, frame: &Frame, debug: Option<&mut DebugOverlay>) -> Result<Recognition> {
        let counts = PixelCounts::compute(frame);

        let mut best: Option<(&dyn WidgetReader, f32)> = None;
        for reader in &self.readers {
            let score = reader.presence_score(frame, &counts);
            debug!(kind = %reader.kind(), score, "presence score");
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((reader.as_ref(), score));
            }
        }

        let (reader, score) = match best {
            Some((reader, score)) if score >= self.min_confidence => (reader, score),
            other => {
                let best_score = other.map_or(0.0, |(_, score)| score);
                info!(best_score, min_confidence = self.min_confidence, "no widget recognized");
                return Err(RecognitionError::NoWidget { best_score });
            }
        };

        let kind = reader.kind();
        debug!(%kind, score, "dispatching frame");
        let data = reader.extract(frame, debug)?;
        Ok(Recognition { kind, score, data })
    }

    /// Recognize independent frames, in parallel with the `parallel` feature.
    #[cfg(feature = "parallel")]
    pub fn recognize_batch(&self, frames: &[Frame]) -> Vec<Result<Recognition>> {
        use rayon::prelude::*;
        frames.par_iter().map(|frame| self.recognize(frame, None)).collect()
    }

    /// Recognize independent frames, in parallel with the `parallel` feature.
    #[cfg(not(feature = "parallel"))]
    pub fn recognize_batch(&self, frames: &[Frame]) -> Vec<Result<Recognition>> {
        frames.iter().map(|frame| self.recognize(frame, None)).collect()
    }
}

/// Serial and indicator glyph tables, captured from disk when configured.
fn build_recognizers(glyph: &GlyphConfig) -> anyhow::Result<(TemplateRecognizer, TemplateRecognizer)> {
    let indicator_labels = indicator_alphabet();

    if let Some(dir) = &glyph.reference_dir {
        let serial = GlyphLoader::new()
            .add_glyph_dir(dir.join("serial"))
            .load_set(&SERIAL_ALPHABET, glyph.serial_size)?;
        let indicator = GlyphLoader::new()
            .add_glyph_dir(dir.join("indicator"))
            .load_set(&indicator_labels, glyph.indicator_size)?;
        return Ok((TemplateRecognizer::new(serial), TemplateRecognizer::new(indicator)));
    }

    let font = GlyphFont::embedded(glyph.font_scale)?;
    let serial = TemplateRecognizer::render(&font, &SERIAL_ALPHABET, glyph.serial_size)?;
    let indicator = TemplateRecognizer::render(&font, &indicator_labels, glyph.indicator_size)?;
    Ok((serial, indicator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorBucket;
    use bombvision_core::LightsState;
    use image::{Rgba, RgbaImage};

    /// Reader with a fixed score that always succeeds.
    struct FixedReader {
        kind: WidgetKind,
        score: f32,
    }

    impl WidgetReader for FixedReader {
        fn kind(&self) -> WidgetKind {
            self.kind
        }

        fn presence_score(&self, _frame: &Frame, _counts: &PixelCounts) -> f32 {
            self.score
        }

        fn extract(&self, _frame: &Frame, _debug: Option<&mut DebugOverlay>) -> Result<ReadData> {
            Ok(ReadData::BatteryHolder { batteries: 1 })
        }
    }

    fn fixed(kind: WidgetKind, score: f32) -> Box<dyn WidgetReader> {
        Box::new(FixedReader { kind, score })
    }

    fn blank_frame() -> Frame {
        Frame::new(RgbaImage::from_pixel(40, 30, Rgba([40, 60, 90, 255])), LightsState::On)
    }

    #[test]
    fn test_highest_score_wins() -> Result<()> {
        let registry = ReaderRegistry::with_readers(
            vec![
                fixed(WidgetKind::Indicator, 0.3),
                fixed(WidgetKind::PortPlate, 0.7),
                fixed(WidgetKind::SerialNumber, 0.5),
            ],
            0.1,
        );
        let recognition = registry.recognize(&blank_frame(), None)?;
        assert_eq!(recognition.kind, WidgetKind::PortPlate);
        assert_eq!(recognition.score, 0.7);
        Ok(())
    }

    #[test]
    fn test_ties_go_to_first_registered() -> Result<()> {
        let registry = ReaderRegistry::with_readers(
            vec![fixed(WidgetKind::SerialNumber, 0.4), fixed(WidgetKind::Indicator, 0.4)],
            0.1,
        );
        assert_eq!(registry.recognize(&blank_frame(), None)?.kind, WidgetKind::SerialNumber);
        Ok(())
    }

    #[test]
    fn test_low_scores_are_no_widget() {
        let registry = ReaderRegistry::with_readers(vec![fixed(WidgetKind::Indicator, 0.05)], 0.1);
        match registry.recognize(&blank_frame(), None) {
            Err(RecognitionError::NoWidget { best_score }) => assert_eq!(best_score, 0.05),
            other => panic!("expected NoWidget, got {:?}", other),
        }

        let empty = ReaderRegistry::with_readers(Vec::new(), 0.1);
        assert!(matches!(
            empty.recognize(&blank_frame(), None),
            Err(RecognitionError::NoWidget { .. })
        ));
    }

    #[test]
    fn test_standard_registry_rejects_blank_frame() -> anyhow::Result<()> {
        let registry = ReaderRegistry::standard(&RecognitionConfig::default())?;
        assert_eq!(registry.kinds(), WidgetKind::ALL.to_vec());

        let frame = blank_frame();
        assert_eq!(PixelCounts::compute(&frame).count(ColorBucket::DarkGrey), 0);
        assert!(registry.scores(&frame).iter().all(|&(_, score)| score < 0.1));
        assert!(matches!(
            registry.recognize(&frame, None),
            Err(RecognitionError::NoWidget { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_shared_is_built_once() -> Result<()> {
        let first = ReaderRegistry::shared()?;
        let second = ReaderRegistry::shared()?;
        assert!(std::ptr::eq(first, second));
        Ok(())
    }

    #[test]
    fn test_batch_keeps_frame_order() {
        let registry = ReaderRegistry::with_readers(vec![fixed(WidgetKind::BatteryHolder, 0.9)], 0.1);
        let results = registry.recognize_batch(&[blank_frame(), blank_frame()]);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|result| result.is_ok()));
    }
}
