//! Battery holder: counts battery cells by their red end caps

use crate::color::{ColorBucket, Hsv, PixelCounts};
use crate::error::{RecognitionError, Result};
use crate::frame::Frame;
use crate::traits::WidgetReader;
use crate::utils::DebugOverlay;
use bombvision_core::{LightsState, ReadData, WidgetKind};
use image::Rgba;
use tracing::debug;

// Battery end caps
pub const BATTERY_RED_HUE: (f32, f32) = (345.0, 15.0);
pub const BATTERY_RED_MIN_SATURATION: f32 = 0.55;
pub const BATTERY_RED_MIN_VALUE_LIT: f32 = 0.35;
pub const BATTERY_RED_MIN_VALUE_UNLIT: f32 = 0.2;

/// Vertical sample lines as fractions of the frame width. Three lines
/// tolerate a holder that is not centred in the crop.
pub const SAMPLE_COLUMNS: [f32; 3] = [0.4, 0.5, 0.6];

/// Red runs shorter than this are noise, not an end cap.
pub const BATTERY_MIN_RUN: u32 = 2;

const SAMPLE_COLOR: Rgba<u8> = Rgba([0, 255, 255, 255]);

pub fn is_battery_red(hsv: Hsv, lights: LightsState) -> bool {
    hsv.hue_in(BATTERY_RED_HUE.0, BATTERY_RED_HUE.1)
        && hsv.s >= BATTERY_RED_MIN_SATURATION
        && hsv.v >= lights.select(BATTERY_RED_MIN_VALUE_LIT, BATTERY_RED_MIN_VALUE_UNLIT)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatteryHolderReader;

impl BatteryHolderReader {
    pub fn new() -> Self {
        Self
    }

    /// Number of red runs of at least `BATTERY_MIN_RUN` pixels down column `x`.
    fn count_runs(frame: &Frame, x: u32, debug: &mut Option<&mut DebugOverlay>) -> u32 {
        let lights = frame.lights();
        let mut runs = 0;
        let mut run_len = 0;

        for y in 0..frame.height() {
            if is_battery_red(frame.hsv_at(x, y), lights) {
                run_len += 1;
                if let Some(overlay) = debug.as_deref_mut() {
                    overlay.highlight(x, y, SAMPLE_COLOR);
                }
            } else {
                if run_len >= BATTERY_MIN_RUN {
                    runs += 1;
                }
                run_len = 0;
            }
        }
        if run_len >= BATTERY_MIN_RUN {
            runs += 1;
        }
        runs
    }
}

impl WidgetReader for BatteryHolderReader {
    fn kind(&self) -> WidgetKind {
        WidgetKind::BatteryHolder
    }

    /// Holders are the only widget with a large yellow area.
    fn presence_score(&self, _frame: &Frame, counts: &PixelCounts) -> f32 {
        counts.fraction(ColorBucket::Yellow)
    }

    fn extract(&self, frame: &Frame, mut debug: Option<&mut DebugOverlay>) -> Result<ReadData> {
        let width = frame.width();
        if width == 0 || frame.height() == 0 {
            return Err(RecognitionError::invalid_input("empty frame"));
        }

        let mut per_line = [0u32; SAMPLE_COLUMNS.len()];
        for (slot, fraction) in per_line.iter_mut().zip(SAMPLE_COLUMNS) {
            let x = ((width as f32 * fraction) as u32).min(width - 1);
            *slot = Self::count_runs(frame, x, &mut debug);
        }

        let batteries = per_line.iter().copied().max().unwrap_or(0);
        debug!(?per_line, batteries, "battery runs per sample line");
        if let Some(overlay) = debug.as_deref_mut() {
            overlay.note(format!("battery runs per line: {:?}", per_line));
        }

        match batteries {
            1 | 2 => Ok(ReadData::BatteryHolder {
                batteries: batteries as u8,
            }),
            n => Err(RecognitionError::out_of_domain(format!(
                "counted {} batteries (runs per line {:?})",
                n, per_line
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    const HOLDER: Rgba<u8> = Rgba([230, 200, 20, 255]);
    const CAP: Rgba<u8> = Rgba([210, 25, 30, 255]);

    /// 100×120 holder with red bands over the given (y range, x limit).
    fn holder(bands: &[(std::ops::Range<u32>, u32)]) -> Frame {
        let mut image = RgbaImage::from_pixel(100, 120, HOLDER);
        for (rows, x_end) in bands {
            for y in rows.clone() {
                for x in 0..*x_end {
                    image.put_pixel(x, y, CAP);
                }
            }
        }
        Frame::new(image, LightsState::On)
    }

    fn read(frame: &Frame) -> Result<ReadData> {
        BatteryHolderReader::new().extract(frame, None)
    }

    #[test]
    fn test_two_batteries() -> Result<()> {
        // The second band misses the right-hand sample line
        let frame = holder(&[(20..32, 100), (70..82, 55)]);
        assert_eq!(read(&frame)?, ReadData::BatteryHolder { batteries: 2 });
        Ok(())
    }

    #[test]
    fn test_one_battery() -> Result<()> {
        let frame = holder(&[(40..60, 100)]);
        assert_eq!(read(&frame)?, ReadData::BatteryHolder { batteries: 1 });
        Ok(())
    }

    #[test]
    fn test_single_pixel_noise_is_not_a_battery() -> Result<()> {
        let mut frame = holder(&[(40..60, 100)]);
        let mut image = frame.clone().into_image();
        image.put_pixel(50, 5, CAP);
        image.put_pixel(50, 100, CAP);
        frame = Frame::new(image, LightsState::On);
        assert_eq!(read(&frame)?, ReadData::BatteryHolder { batteries: 1 });
        Ok(())
    }

    #[test]
    fn test_zero_runs_fails() {
        let frame = holder(&[]);
        assert!(matches!(read(&frame), Err(RecognitionError::OutOfDomain(_))));
    }

    #[test]
    fn test_three_runs_fails() {
        let frame = holder(&[(10..20, 100), (50..60, 100), (90..100, 100)]);
        assert!(matches!(read(&frame), Err(RecognitionError::OutOfDomain(_))));
    }

    #[test]
    fn test_unlit_caps_still_count() -> Result<()> {
        let mut image = RgbaImage::from_pixel(100, 120, Rgba([120, 105, 10, 255]));
        for y in 30..45 {
            for x in 0..100 {
                image.put_pixel(x, y, Rgba([80, 10, 12, 255]));
            }
        }
        let dim = Frame::new(image.clone(), LightsState::Off);
        assert_eq!(read(&dim)?, ReadData::BatteryHolder { batteries: 1 });

        let lit = Frame::new(image, LightsState::On);
        assert!(read(&lit).is_err());
        Ok(())
    }

    #[test]
    fn test_presence_prefers_yellow() {
        let frame = holder(&[(20..32, 100)]);
        let counts = PixelCounts::compute(&frame);
        assert!(BatteryHolderReader::new().presence_score(&frame, &counts) > 0.8);
    }
}
