//! Indicator: LED state plus the three-letter label beside it
//!
//! The plate is framed by a red bezel. After perspective correction the LED
//! sits at a fixed position on one side and the label fills the other side.
//! A plate mounted upside down shows the LED on the right and its label
//! rotated by 180°.

use crate::color::{ColorBucket, Hsv, PixelCounts};
use crate::error::{RecognitionError, Result};
use crate::frame::Frame;
use crate::geometry::{find_corners, perspective_undistort, Interpolation, Rect};
use crate::template::{ink_mask, TemplateRecognizer};
use crate::traits::WidgetReader;
use crate::utils::{DebugOverlay, ImageUtils};
use bombvision_core::{IndicatorLabel, LightsState, ReadData, WidgetKind};
use image::{imageops, RgbaImage};
use std::sync::Arc;
use tracing::{debug, warn};

/// Size of the perspective-corrected plate.
pub const CANONICAL_SIZE: (u32, u32) = (120, 60);

// Bezel
pub const BEZEL_HUE: (f32, f32) = (345.0, 15.0);
pub const BEZEL_MIN_SATURATION: f32 = 0.6;
pub const BEZEL_MIN_VALUE_LIT: f32 = 0.4;
pub const BEZEL_MIN_VALUE_UNLIT: f32 = 0.25;
pub const BEZEL_MIN_RUN: u32 = 4;

// LED probe, in canonical coordinates for an upright plate
pub const LED_POSITION: (u32, u32) = (18, 30);
pub const LED_WINDOW_RADIUS: u32 = 3;
/// Share of the probe window that must carry one signature.
pub const LED_MATCH_FRACTION: f32 = 0.6;

// Lit LED: warm white
pub const LED_LIT_HUE: (f32, f32) = (30.0, 70.0);
pub const LED_LIT_SATURATION: (f32, f32) = (0.15, 0.75);
pub const LED_LIT_MIN_VALUE_LIT: f32 = 0.85;
pub const LED_LIT_MIN_VALUE_UNLIT: f32 = 0.7;

// Unlit LED: near black
pub const LED_UNLIT_MAX_VALUE_LIT: f32 = 0.18;
pub const LED_UNLIT_MAX_VALUE_UNLIT: f32 = 0.12;

/// Label area of an upright plate.
pub const LABEL_REGION: Rect = Rect {
    x: 40,
    y: 8,
    width: 74,
    height: 44,
};

// Label text: white paint
pub const LABEL_INK_MAX_SATURATION: f32 = 0.25;
pub const LABEL_INK_MIN_VALUE_LIT: f32 = 0.6;
pub const LABEL_INK_MIN_VALUE_UNLIT: f32 = 0.45;

// Presence weights
const PRESENCE_WHITE_WEIGHT: f32 = 0.25;
const PRESENCE_YELLOW_WEIGHT: f32 = 1.0;

pub fn is_bezel_red(hsv: Hsv, lights: LightsState) -> bool {
    hsv.hue_in(BEZEL_HUE.0, BEZEL_HUE.1)
        && hsv.s >= BEZEL_MIN_SATURATION
        && hsv.v >= lights.select(BEZEL_MIN_VALUE_LIT, BEZEL_MIN_VALUE_UNLIT)
}

pub fn is_led_lit(hsv: Hsv, lights: LightsState) -> bool {
    hsv.hue_in(LED_LIT_HUE.0, LED_LIT_HUE.1)
        && hsv.s >= LED_LIT_SATURATION.0
        && hsv.s < LED_LIT_SATURATION.1
        && hsv.v >= lights.select(LED_LIT_MIN_VALUE_LIT, LED_LIT_MIN_VALUE_UNLIT)
}

pub fn is_led_unlit(hsv: Hsv, lights: LightsState) -> bool {
    hsv.v <= lights.select(LED_UNLIT_MAX_VALUE_LIT, LED_UNLIT_MAX_VALUE_UNLIT)
}

pub fn is_label_ink(hsv: Hsv, lights: LightsState) -> bool {
    hsv.s < LABEL_INK_MAX_SATURATION
        && hsv.v >= lights.select(LABEL_INK_MIN_VALUE_LIT, LABEL_INK_MIN_VALUE_UNLIT)
}

/// Point or region mapped through a 180° turn of the canonical plate.
fn mirrored_point((x, y): (u32, u32)) -> (u32, u32) {
    (CANONICAL_SIZE.0 - 1 - x, CANONICAL_SIZE.1 - 1 - y)
}

fn mirrored_region(rect: &Rect) -> Rect {
    Rect::new(
        CANONICAL_SIZE.0 - rect.right(),
        CANONICAL_SIZE.1 - rect.bottom(),
        rect.width,
        rect.height,
    )
}

pub struct IndicatorReader {
    labels: Arc<TemplateRecognizer>,
}

impl IndicatorReader {
    pub fn new(labels: Arc<TemplateRecognizer>) -> Self {
        Self { labels }
    }

    /// `Some(lit)` when the window around `center` carries a lit or unlit
    /// LED signature, `None` when it carries neither.
    fn probe_led(plate: &RgbaImage, center: (u32, u32), lights: LightsState) -> Option<bool> {
        let x0 = center.0.saturating_sub(LED_WINDOW_RADIUS);
        let y0 = center.1.saturating_sub(LED_WINDOW_RADIUS);
        let window = Rect::new(x0, y0, 2 * LED_WINDOW_RADIUS + 1, 2 * LED_WINDOW_RADIUS + 1)
            .clip_to(plate);
        if window.is_empty() {
            return None;
        }

        let mut lit = 0u32;
        let mut unlit = 0u32;
        for y in window.y..window.bottom() {
            for x in window.x..window.right() {
                let hsv = Hsv::from_rgba(plate.get_pixel(x, y));
                if is_led_lit(hsv, lights) {
                    lit += 1;
                } else if is_led_unlit(hsv, lights) {
                    unlit += 1;
                }
            }
        }

        let total = window.area() as f32;
        if lit as f32 / total >= LED_MATCH_FRACTION {
            Some(true)
        } else if unlit as f32 / total >= LED_MATCH_FRACTION {
            Some(false)
        } else {
            None
        }
    }
}

impl WidgetReader for IndicatorReader {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Indicator
    }

    /// Lots of bezel red, a little white label paint, no yellow.
    fn presence_score(&self, _frame: &Frame, counts: &PixelCounts) -> f32 {
        let score = counts.fraction(ColorBucket::Red)
            + PRESENCE_WHITE_WEIGHT * counts.fraction(ColorBucket::White)
            - PRESENCE_YELLOW_WEIGHT * counts.fraction(ColorBucket::Yellow);
        score.max(0.0)
    }

    fn extract(&self, frame: &Frame, mut debug: Option<&mut DebugOverlay>) -> Result<ReadData> {
        let lights = frame.lights();

        let quad = find_corners(
            frame.image(),
            frame.bounds(),
            |p| is_bezel_red(Hsv::from_rgba(p), lights),
            BEZEL_MIN_RUN,
        )?;
        if let Some(overlay) = debug.as_deref_mut() {
            overlay.mark_quad(&quad);
        }

        let plate = perspective_undistort(frame.image(), &quad, Interpolation::Nearest, CANONICAL_SIZE)?;

        let left = Self::probe_led(&plate, LED_POSITION, lights);
        let right = Self::probe_led(&plate, mirrored_point(LED_POSITION), lights);
        debug!(?quad, ?left, ?right, "indicator LED probes");

        let (lit, upside_down) = match (left, right) {
            (Some(lit), None) => (lit, false),
            (None, Some(lit)) => (lit, true),
            (None, None) => {
                return Err(RecognitionError::ambiguous("no LED signature at either position"));
            }
            (Some(_), Some(_)) => {
                warn!("indicator shows an LED signature on both sides");
                return Err(RecognitionError::ambiguous("LED signature at both positions"));
            }
        };

        let region = if upside_down {
            mirrored_region(&LABEL_REGION)
        } else {
            LABEL_REGION
        };
        let mut mask = ink_mask(&plate, region, |p| is_label_ink(Hsv::from_rgba(p), lights));
        if upside_down {
            mask = imageops::rotate180(&mask);
        }

        let found = self
            .labels
            .recognize(&mask)
            .map_err(|_| RecognitionError::ambiguous("indicator label has no ink"))?;
        let label: IndicatorLabel = found.label.parse().map_err(|_| {
            RecognitionError::invalid_input(format!("'{}' is not an indicator label", found.label))
        })?;

        debug!(%label, lit, upside_down, distance = found.distance, "indicator read");
        if let Some(overlay) = debug.as_deref_mut() {
            overlay.attach("indicator_plate", plate);
            overlay.attach("indicator_label", ImageUtils::luma_to_rgba(&mask));
            overlay.note(format!(
                "indicator: {} {} (distance {}, upside down: {})",
                if lit { "lit" } else { "unlit" },
                label,
                found.distance,
                upside_down
            ));
        }

        Ok(ReadData::Indicator { lit, label })
    }
}
