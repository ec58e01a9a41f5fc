//! Coarse colour histogram used for presence scoring

use super::Hsv;
use crate::frame::Frame;
use bombvision_core::LightsState;
use serde::Serialize;

// Coarse bucket bounds. Hue ranges are [low, high); reds wrap through 0°.
const RED_HUE: (f32, f32) = (345.0, 15.0);
const RED_MIN_SATURATION: f32 = 0.5;
const RED_MIN_VALUE_LIT: f32 = 0.3;
const RED_MIN_VALUE_UNLIT: f32 = 0.2;

const YELLOW_HUE: (f32, f32) = (40.0, 70.0);
const YELLOW_MIN_SATURATION: f32 = 0.5;
const YELLOW_MIN_VALUE_LIT: f32 = 0.5;
const YELLOW_MIN_VALUE_UNLIT: f32 = 0.35;

const ACHROMATIC_MAX_SATURATION: f32 = 0.15;
const WHITE_MIN_VALUE_LIT: f32 = 0.8;
const WHITE_MIN_VALUE_UNLIT: f32 = 0.6;
const DARK_GREY_VALUE: (f32, f32) = (0.15, 0.45);
const BLACK_MAX_VALUE: f32 = 0.15;

/// Named coarse colour classes. A pixel falls in at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColorBucket {
    Red,
    Yellow,
    White,
    DarkGrey,
    Black,
}

impl ColorBucket {
    pub const ALL: [ColorBucket; 5] = [
        ColorBucket::Red,
        ColorBucket::Yellow,
        ColorBucket::White,
        ColorBucket::DarkGrey,
        ColorBucket::Black,
    ];

    /// First matching bucket, checked in declaration order.
    pub fn classify(hsv: Hsv, lights: LightsState) -> Option<ColorBucket> {
        if hsv.hue_in(RED_HUE.0, RED_HUE.1)
            && hsv.s >= RED_MIN_SATURATION
            && hsv.v >= lights.select(RED_MIN_VALUE_LIT, RED_MIN_VALUE_UNLIT)
        {
            return Some(ColorBucket::Red);
        }
        if hsv.hue_in(YELLOW_HUE.0, YELLOW_HUE.1)
            && hsv.s >= YELLOW_MIN_SATURATION
            && hsv.v >= lights.select(YELLOW_MIN_VALUE_LIT, YELLOW_MIN_VALUE_UNLIT)
        {
            return Some(ColorBucket::Yellow);
        }
        if hsv.s < ACHROMATIC_MAX_SATURATION
            && hsv.v >= lights.select(WHITE_MIN_VALUE_LIT, WHITE_MIN_VALUE_UNLIT)
        {
            return Some(ColorBucket::White);
        }
        if hsv.s < ACHROMATIC_MAX_SATURATION
            && hsv.v >= DARK_GREY_VALUE.0
            && hsv.v < DARK_GREY_VALUE.1
        {
            return Some(ColorBucket::DarkGrey);
        }
        if hsv.v < BLACK_MAX_VALUE {
            return Some(ColorBucket::Black);
        }
        None
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Per-bucket pixel counts of one frame.
///
/// The only constructor walks the frame, so a `PixelCounts` always matches
/// the frame it was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PixelCounts {
    counts: [u32; ColorBucket::ALL.len()],
    total: u32,
}

impl PixelCounts {
    pub fn compute(frame: &Frame) -> Self {
        let lights = frame.lights();
        let mut counts = [0u32; ColorBucket::ALL.len()];

        for pixel in frame.image().pixels() {
            if let Some(bucket) = ColorBucket::classify(Hsv::from_rgba(pixel), lights) {
                counts[bucket.index()] += 1;
            }
        }

        Self {
            counts,
            total: frame.width() * frame.height(),
        }
    }

    pub fn count(&self, bucket: ColorBucket) -> u32 {
        self.counts[bucket.index()]
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Share of the frame's pixels in `bucket`; 0 for an empty frame.
    pub fn fraction(&self, bucket: ColorBucket) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(bucket) as f32 / self.total as f32
    }
}
