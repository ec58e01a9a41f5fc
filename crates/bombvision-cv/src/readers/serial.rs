//! Serial number: six dark characters under a red heading
//!
//! The heading tells the orientation: it sits above the text on an upright
//! plate and below it on a plate mounted upside down. Characters are
//! separated by blank columns and classified one at a time.

use crate::color::{ColorBucket, Hsv, PixelCounts};
use crate::error::{RecognitionError, Result};
use crate::frame::Frame;
use crate::geometry::{find_edges, Rect};
use crate::template::{ink_mask, TemplateRecognizer};
use crate::traits::WidgetReader;
use crate::utils::debug::REGION_COLOR;
use crate::utils::{DebugOverlay, ImageUtils};
use bombvision_core::{LightsState, ReadData, WidgetKind};
use image::{imageops, GrayImage};
use std::sync::Arc;
use tracing::{debug, warn};

pub const SERIAL_LENGTH: usize = 6;

// Printed characters
pub const INK_MAX_VALUE_LIT: f32 = 0.5;
pub const INK_MAX_VALUE_UNLIT: f32 = 0.35;

// Heading band
pub const HEADING_HUE: (f32, f32) = (345.0, 15.0);
pub const HEADING_MIN_SATURATION: f32 = 0.45;
pub const HEADING_MIN_VALUE_LIT: f32 = 0.35;
pub const HEADING_MIN_VALUE_UNLIT: f32 = 0.25;

// Plate stock
pub const PLATE_MAX_SATURATION: f32 = 0.15;
pub const PLATE_MIN_VALUE_LIT: f32 = 0.75;
pub const PLATE_MIN_VALUE_UNLIT: f32 = 0.55;

/// Heading pixels needed on one side of the text to settle orientation.
pub const SERIAL_MIN_HEADING_PIXELS: u32 = 20;

/// The one glyph that reaches below the baseline.
const DESCENDER_GLYPH: char = 'Q';

const PRESENCE_RED_GAIN: f32 = 10.0;

/// Dark print. Heading red is never ink, however dim.
pub fn is_serial_ink(hsv: Hsv, lights: LightsState) -> bool {
    hsv.v < lights.select(INK_MAX_VALUE_LIT, INK_MAX_VALUE_UNLIT) && !is_heading_red(hsv, lights)
}

pub fn is_heading_red(hsv: Hsv, lights: LightsState) -> bool {
    hsv.hue_in(HEADING_HUE.0, HEADING_HUE.1)
        && hsv.s >= HEADING_MIN_SATURATION
        && hsv.v >= lights.select(HEADING_MIN_VALUE_LIT, HEADING_MIN_VALUE_UNLIT)
}

pub fn is_plate_white(hsv: Hsv, lights: LightsState) -> bool {
    hsv.s < PLATE_MAX_SATURATION && hsv.v >= lights.select(PLATE_MIN_VALUE_LIT, PLATE_MIN_VALUE_UNLIT)
}

/// Inclusive column span of one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnRun {
    start: u32,
    end: u32,
}

pub struct SerialNumberReader {
    symbols: Arc<TemplateRecognizer>,
}

impl SerialNumberReader {
    pub fn new(symbols: Arc<TemplateRecognizer>) -> Self {
        Self { symbols }
    }

    /// Bounds of the plate: its white stock together with the heading band.
    fn plate_bounds(frame: &Frame) -> Result<Rect> {
        let lights = frame.lights();
        find_edges(frame.image(), frame.bounds(), |p| {
            let hsv = Hsv::from_rgba(p);
            is_plate_white(hsv, lights) || is_heading_red(hsv, lights)
        })
    }

    /// Heading pixels of `plate` strictly above and strictly below `row`.
    fn heading_pixels(frame: &Frame, plate: &Rect, row: &Rect) -> (u32, u32) {
        let lights = frame.lights();
        let mut above = 0;
        let mut below = 0;
        for y in (plate.y..row.y).chain(row.bottom()..plate.bottom()) {
            for x in plate.x..plate.right() {
                if is_heading_red(frame.hsv_at(x, y), lights) {
                    if y < row.y {
                        above += 1;
                    } else {
                        below += 1;
                    }
                }
            }
        }
        (above, below)
    }

    /// Maximal runs of columns of `row` carrying ink, left to right.
    fn column_runs(frame: &Frame, row: &Rect) -> Vec<ColumnRun> {
        let lights = frame.lights();
        let inked =
            |x: u32| (row.y..row.bottom()).any(|y| is_serial_ink(frame.hsv_at(x, y), lights));

        let mut runs = Vec::new();
        let mut start = None;
        for x in row.x..row.right() {
            match (inked(x), start) {
                (true, None) => start = Some(x),
                (false, Some(s)) => {
                    runs.push(ColumnRun { start: s, end: x - 1 });
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push(ColumnRun {
                start: s,
                end: row.right() - 1,
            });
        }
        runs
    }

    /// Ink mask of `region` turned to reading orientation.
    fn char_mask(frame: &Frame, region: Rect, upside_down: bool) -> GrayImage {
        let lights = frame.lights();
        let mask = ink_mask(frame.image(), region, |p| is_serial_ink(Hsv::from_rgba(p), lights));
        if upside_down {
            imageops::rotate180(&mask)
        } else {
            mask
        }
    }

    fn classify_mask(&self, mask: &GrayImage) -> Result<char> {
        let found = self.symbols.classify(&self.symbols.fit(mask))?;
        found
            .label
            .chars()
            .next()
            .ok_or_else(|| RecognitionError::invalid_input("empty serial glyph label"))
    }

    /// Crop of `run` from the text row's top edge down to the character's
    /// own lowest ink, both taken in reading orientation.
    fn own_bottom_region(frame: &Frame, row: &Rect, run: ColumnRun, upside_down: bool) -> Result<Rect> {
        let lights = frame.lights();
        let columns = Rect::from_inclusive(run.start, row.y, run.end, row.bottom() - 1);
        let ink = find_edges(frame.image(), columns, |p| is_serial_ink(Hsv::from_rgba(p), lights))?;
        Ok(if upside_down {
            Rect::from_inclusive(run.start, ink.y, run.end, row.bottom() - 1)
        } else {
            Rect::from_inclusive(run.start, row.y, run.end, ink.bottom() - 1)
        })
    }
}

impl WidgetReader for SerialNumberReader {
    fn kind(&self) -> WidgetKind {
        WidgetKind::SerialNumber
    }

    /// A white plate that also shows some heading red.
    fn presence_score(&self, _frame: &Frame, counts: &PixelCounts) -> f32 {
        counts.fraction(ColorBucket::White) * (PRESENCE_RED_GAIN * counts.fraction(ColorBucket::Red)).min(1.0)
    }

    fn extract(&self, frame: &Frame, mut debug: Option<&mut DebugOverlay>) -> Result<ReadData> {
        let lights = frame.lights();

        let plate = Self::plate_bounds(frame)?;
        let row = find_edges(frame.image(), plate, |p| is_serial_ink(Hsv::from_rgba(p), lights))?;
        let (above, below) = Self::heading_pixels(frame, &plate, &row);
        debug!(?plate, ?row, above, below, "serial text row and heading pixels");
        if let Some(overlay) = debug.as_deref_mut() {
            overlay.mark_rect(&plate, REGION_COLOR);
            overlay.mark_rect(&row, REGION_COLOR);
        }

        let upside_down = match (
            above >= SERIAL_MIN_HEADING_PIXELS,
            below >= SERIAL_MIN_HEADING_PIXELS,
        ) {
            (true, false) => false,
            (false, true) => true,
            (false, false) => return Err(RecognitionError::ambiguous("no heading next to the serial")),
            (true, true) => {
                warn!(above, below, "serial heading found on both sides");
                return Err(RecognitionError::ambiguous("heading on both sides of the serial"));
            }
        };

        let mut runs = Self::column_runs(frame, &row);
        if upside_down {
            runs.reverse();
        }
        if runs.len() < SERIAL_LENGTH {
            return Err(RecognitionError::out_of_domain(format!(
                "found {} characters, a serial has {}",
                runs.len(),
                SERIAL_LENGTH
            )));
        }
        runs.truncate(SERIAL_LENGTH);

        let mut masks = Vec::with_capacity(SERIAL_LENGTH);
        let mut serial = String::with_capacity(SERIAL_LENGTH);
        for run in &runs {
            let region = Rect::from_inclusive(run.start, row.y, run.end, row.bottom() - 1);
            let mask = Self::char_mask(frame, region, upside_down);
            serial.push(self.classify_mask(&mask)?);
            masks.push(mask);
        }

        // A descender stretches the text row, so every other character was
        // classified with blank space beneath it.
        if serial.contains(DESCENDER_GLYPH) {
            debug!(%serial, "descender present, re-cropping characters");
            serial.clear();
            for (run, mask) in runs.iter().zip(masks.iter_mut()) {
                let region = Self::own_bottom_region(frame, &row, *run, upside_down)?;
                *mask = Self::char_mask(frame, region, upside_down);
                serial.push(self.classify_mask(mask)?);
            }
        }

        debug!(%serial, upside_down, "serial read");
        if let Some(overlay) = debug.as_deref_mut() {
            for (index, mask) in masks.iter().enumerate() {
                overlay.attach(format!("serial_char_{}", index), ImageUtils::luma_to_rgba(mask));
            }
            overlay.note(format!("serial: {} (upside down: {})", serial, upside_down));
        }

        Ok(ReadData::SerialNumber { serial })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::dimmed;
    use crate::template::{GlyphFont, SERIAL_ALPHABET};
    use image::{Rgba, RgbaImage};
    use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};

    const SCALE: f32 = 28.0;
    const PLATE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const HEADING: Rgba<u8> = Rgba([200, 30, 30, 255]);
    const PRINT: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const DIM_HEADING: Rgba<u8> = Rgba([110, 20, 20, 255]);
    const BACKGROUND: Rgba<u8> = Rgba([40, 60, 90, 255]);

    fn reader(font: &GlyphFont) -> Result<SerialNumberReader> {
        let symbols = TemplateRecognizer::render(font, &SERIAL_ALPHABET, (16, 22))?;
        Ok(SerialNumberReader::new(Arc::new(symbols)))
    }

    /// 200×80 white plate, heading band at rows 4..14 when `heading` is set,
    /// characters drawn one by one with an 8 px gap.
    fn serial_frame(font: &GlyphFont, text: &str, heading: bool) -> Frame {
        let band = if heading { Some(HEADING) } else { None };
        Frame::new(plate_image(font, text, band), LightsState::On)
    }

    fn plate_image(font: &GlyphFont, text: &str, heading: Option<Rgba<u8>>) -> RgbaImage {
        let mut image = RgbaImage::from_pixel(200, 80, PLATE);
        if let Some(color) = heading {
            draw_filled_rect_mut(&mut image, imageproc::rect::Rect::at(0, 4).of_size(200, 10), color);
        }
        let mut x = 8;
        for c in text.chars() {
            let glyph = c.to_string();
            draw_text_mut(&mut image, PRINT, x, 24, font.scale(), font.font(), &glyph);
            x += text_size(font.scale(), font.font(), &glyph).0 as i32 + 8;
        }
        image
    }

    fn read(reader: &SerialNumberReader, frame: &Frame) -> Result<String> {
        match reader.extract(frame, None)? {
            ReadData::SerialNumber { serial } => Ok(serial),
            other => panic!("unexpected reading {:?}", other),
        }
    }

    #[test]
    fn test_reads_upright_serial() -> Result<()> {
        let font = GlyphFont::embedded(SCALE)?;
        let frame = serial_frame(&font, "AB12CD", true);
        assert_eq!(read(&reader(&font)?, &frame)?, "AB12CD");
        Ok(())
    }

    #[test]
    fn test_reads_upside_down_serial() -> Result<()> {
        let font = GlyphFont::embedded(SCALE)?;
        let upright = serial_frame(&font, "AB12CD", true);
        let flipped = Frame::new(imageops::rotate180(upright.image()), LightsState::On);
        assert_eq!(read(&reader(&font)?, &flipped)?, "AB12CD");
        Ok(())
    }

    #[test]
    fn test_descender_triggers_recrop() -> Result<()> {
        let font = GlyphFont::embedded(SCALE)?;
        let reader = reader(&font)?;

        let frame = serial_frame(&font, "7QX4K2", true);
        assert_eq!(read(&reader, &frame)?, "7QX4K2");

        let flipped = Frame::new(imageops::rotate180(frame.image()), LightsState::On);
        assert_eq!(read(&reader, &flipped)?, "7QX4K2");
        Ok(())
    }

    #[test]
    fn test_reads_dim_heading() -> Result<()> {
        let font = GlyphFont::embedded(SCALE)?;
        let frame = Frame::new(plate_image(&font, "AB12CD", Some(DIM_HEADING)), LightsState::On);
        assert_eq!(read(&reader(&font)?, &frame)?, "AB12CD");
        Ok(())
    }

    #[test]
    fn test_reads_plate_on_dark_background() -> Result<()> {
        let font = GlyphFont::embedded(SCALE)?;
        let mut image = RgbaImage::from_pixel(240, 120, BACKGROUND);
        imageops::replace(&mut image, &plate_image(&font, "AB12CD", Some(HEADING)), 20, 20);
        let frame = Frame::new(image, LightsState::On);

        assert_eq!(SerialNumberReader::plate_bounds(&frame)?, Rect::new(20, 20, 200, 80));
        assert_eq!(read(&reader(&font)?, &frame)?, "AB12CD");
        Ok(())
    }

    #[test]
    fn test_reads_serial_with_lights_off() -> Result<()> {
        let font = GlyphFont::embedded(SCALE)?;
        let reader = reader(&font)?;
        let dark = dimmed(&plate_image(&font, "AB12CD", Some(HEADING)), 0.7);

        assert_eq!(read(&reader, &Frame::new(dark.clone(), LightsState::Off))?, "AB12CD");
        // The dimmed plate is too dark to be white under the lit calibration.
        assert!(reader.extract(&Frame::new(dark, LightsState::On), None).is_err());
        Ok(())
    }

    #[test]
    fn test_serial_predicates_are_disjoint() {
        let predicates: [fn(Hsv, LightsState) -> bool; 3] = [is_serial_ink, is_heading_red, is_plate_white];
        for lights in [LightsState::On, LightsState::Off] {
            for r in (0..=255u16).step_by(5) {
                for g in (0..=255u16).step_by(15) {
                    for b in (0..=255u16).step_by(15) {
                        let hsv = Hsv::from_rgb(r as u8, g as u8, b as u8);
                        let hits = predicates.iter().filter(|p| p(hsv, lights)).count();
                        assert!(hits <= 1, "{:?} matches {} serial predicates", hsv, hits);
                    }
                }
            }
        }
        let dim_red = Hsv::from_rgb(110, 20, 20);
        assert!(is_heading_red(dim_red, LightsState::On));
        assert!(!is_serial_ink(dim_red, LightsState::On));
    }

    #[test]
    fn test_short_serial_is_out_of_domain() -> Result<()> {
        let font = GlyphFont::embedded(SCALE)?;
        let frame = serial_frame(&font, "AB12C", true);
        let result = reader(&font)?.extract(&frame, None);
        assert!(matches!(result, Err(RecognitionError::OutOfDomain(_))));
        Ok(())
    }

    #[test]
    fn test_missing_heading_is_ambiguous() -> Result<()> {
        let font = GlyphFont::embedded(SCALE)?;
        let frame = serial_frame(&font, "AB12CD", false);
        let result = reader(&font)?.extract(&frame, None);
        assert!(matches!(result, Err(RecognitionError::AmbiguousDetection(_))));
        Ok(())
    }

    #[test]
    fn test_debug_overlay_gets_every_character() -> Result<()> {
        let font = GlyphFont::embedded(SCALE)?;
        let frame = serial_frame(&font, "AB12CD", true);
        let mut overlay = DebugOverlay::for_frame(&frame);
        reader(&font)?.extract(&frame, Some(&mut overlay))?;
        assert_eq!(overlay.crops().len(), SERIAL_LENGTH);
        assert_eq!(overlay.notes().len(), 1);
        Ok(())
    }

    #[test]
    fn test_presence_needs_both_white_and_red() -> Result<()> {
        let font = GlyphFont::embedded(SCALE)?;
        let reader = reader(&font)?;

        let with_heading = serial_frame(&font, "AB12CD", true);
        let counts = PixelCounts::compute(&with_heading);
        assert!(reader.presence_score(&with_heading, &counts) > 0.5);

        let bare = serial_frame(&font, "AB12CD", false);
        let counts = PixelCounts::compute(&bare);
        assert_eq!(reader.presence_score(&bare, &counts), 0.0);
        Ok(())
    }
}
