//! Port plate: which connector types are mounted
//!
//! Every connector type has a distinctive plastic colour. After perspective
//! correction the reader counts pixels per colour and reports each port
//! whose count clears its threshold. Red is shared by two connectors and is
//! told apart by where it sits on the plate.

use crate::color::{ColorBucket, Hsv, PixelCounts};
use crate::error::Result;
use crate::frame::Frame;
use crate::geometry::{find_corners, perspective_undistort, Interpolation};
use crate::traits::WidgetReader;
use crate::utils::DebugOverlay;
use bombvision_core::{LightsState, PortSet, PortType, ReadData, WidgetKind};
use image::{Rgba, RgbaImage};
use tracing::debug;

/// Size of the perspective-corrected plate.
pub const CANONICAL_SIZE: (u32, u32) = (160, 80);

// Bezel: mid grey frame around the plate
pub const BEZEL_MAX_SATURATION: f32 = 0.12;
pub const BEZEL_VALUE_LIT: (f32, f32) = (0.45, 0.75);
pub const BEZEL_VALUE_UNLIT: (f32, f32) = (0.3, 0.55);
pub const BEZEL_MIN_RUN: u32 = 4;

// Connector plastics
pub const PORT_MIN_SATURATION: f32 = 0.3;
pub const PORT_MIN_VALUE_LIT: f32 = 0.3;
pub const PORT_MIN_VALUE_UNLIT: f32 = 0.2;

pub const PINK_HUE: (f32, f32) = (300.0, 345.0);
pub const PINK_MIN_VALUE_LIT: f32 = 0.5;
pub const PINK_MIN_VALUE_UNLIT: f32 = 0.35;

pub const TEAL_HUE: (f32, f32) = (160.0, 200.0);
pub const PURPLE_HUE: (f32, f32) = (250.0, 300.0);

pub const RED_HUE: (f32, f32) = (345.0, 25.0);
pub const RED_MIN_SATURATION: f32 = 0.45;

pub const WHITE_MAX_SATURATION: f32 = 0.1;
pub const WHITE_MIN_VALUE_LIT: f32 = 0.85;
pub const WHITE_MIN_VALUE_UNLIT: f32 = 0.65;

// Minimum pixel counts on the canonical plate
pub const PARALLEL_MIN_PIXELS: u32 = 1200;
pub const SERIAL_MIN_PIXELS: u32 = 600;
pub const PS2_MIN_PIXELS: u32 = 300;
pub const DVI_D_MIN_PIXELS: u32 = 1000;
pub const STEREO_RCA_MIN_PIXELS: u32 = 250;
pub const RJ45_MIN_PIXELS: u32 = 400;

pub fn is_bezel_grey(hsv: Hsv, lights: LightsState) -> bool {
    let (low, high) = lights.select(BEZEL_VALUE_LIT, BEZEL_VALUE_UNLIT);
    hsv.s < BEZEL_MAX_SATURATION && hsv.v >= low && hsv.v < high
}

fn is_port_plastic(hsv: Hsv, lights: LightsState) -> bool {
    hsv.s >= PORT_MIN_SATURATION && hsv.v >= lights.select(PORT_MIN_VALUE_LIT, PORT_MIN_VALUE_UNLIT)
}

pub fn is_port_pink(hsv: Hsv, lights: LightsState) -> bool {
    is_port_plastic(hsv, lights)
        && hsv.hue_in(PINK_HUE.0, PINK_HUE.1)
        && hsv.v >= lights.select(PINK_MIN_VALUE_LIT, PINK_MIN_VALUE_UNLIT)
}

pub fn is_port_teal(hsv: Hsv, lights: LightsState) -> bool {
    is_port_plastic(hsv, lights) && hsv.hue_in(TEAL_HUE.0, TEAL_HUE.1)
}

pub fn is_port_purple(hsv: Hsv, lights: LightsState) -> bool {
    is_port_plastic(hsv, lights) && hsv.hue_in(PURPLE_HUE.0, PURPLE_HUE.1)
}

pub fn is_port_red(hsv: Hsv, lights: LightsState) -> bool {
    is_port_plastic(hsv, lights) && hsv.hue_in(RED_HUE.0, RED_HUE.1) && hsv.s >= RED_MIN_SATURATION
}

pub fn is_port_white(hsv: Hsv, lights: LightsState) -> bool {
    hsv.s < WHITE_MAX_SATURATION && hsv.v >= lights.select(WHITE_MIN_VALUE_LIT, WHITE_MIN_VALUE_UNLIT)
}

/// Colour class of a single plate pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortBucket {
    Pink,
    Teal,
    Purple,
    White,
    /// Red within the outer quarters of the plate.
    RedEdge,
    /// Red in the middle half of the plate.
    RedMiddle,
}

impl PortBucket {
    pub const ALL: [PortBucket; 6] = [
        PortBucket::Pink,
        PortBucket::Teal,
        PortBucket::Purple,
        PortBucket::White,
        PortBucket::RedEdge,
        PortBucket::RedMiddle,
    ];

    /// Bucket of the pixel at column `x` of a plate `width` pixels wide.
    pub fn classify(hsv: Hsv, x: u32, width: u32, lights: LightsState) -> Option<PortBucket> {
        if is_port_pink(hsv, lights) {
            Some(PortBucket::Pink)
        } else if is_port_teal(hsv, lights) {
            Some(PortBucket::Teal)
        } else if is_port_purple(hsv, lights) {
            Some(PortBucket::Purple)
        } else if is_port_white(hsv, lights) {
            Some(PortBucket::White)
        } else if is_port_red(hsv, lights) {
            if x < width / 4 || x >= 3 * width / 4 {
                Some(PortBucket::RedEdge)
            } else {
                Some(PortBucket::RedMiddle)
            }
        } else {
            None
        }
    }

    /// The connector this colour stands for and its pixel threshold.
    pub fn port(self) -> (PortType, u32) {
        match self {
            PortBucket::Pink => (PortType::Parallel, PARALLEL_MIN_PIXELS),
            PortBucket::Teal => (PortType::Serial, SERIAL_MIN_PIXELS),
            PortBucket::Purple => (PortType::Ps2, PS2_MIN_PIXELS),
            PortBucket::White => (PortType::DviD, DVI_D_MIN_PIXELS),
            PortBucket::RedEdge => (PortType::StereoRca, STEREO_RCA_MIN_PIXELS),
            PortBucket::RedMiddle => (PortType::Rj45, RJ45_MIN_PIXELS),
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn debug_color(self) -> Rgba<u8> {
        match self {
            PortBucket::Pink => Rgba([255, 0, 255, 255]),
            PortBucket::Teal => Rgba([0, 255, 255, 255]),
            PortBucket::Purple => Rgba([128, 0, 255, 255]),
            PortBucket::White => Rgba([255, 255, 0, 255]),
            PortBucket::RedEdge => Rgba([255, 0, 0, 255]),
            PortBucket::RedMiddle => Rgba([255, 128, 0, 255]),
        }
    }
}

/// Pixel counts per `PortBucket` over a canonical plate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortCounts {
    counts: [u32; PortBucket::ALL.len()],
}

impl PortCounts {
    pub fn compute(plate: &RgbaImage, lights: LightsState) -> Self {
        let mut counts = Self::default();
        let width = plate.width();
        for (x, _, pixel) in plate.enumerate_pixels() {
            if let Some(bucket) = PortBucket::classify(Hsv::from_rgba(pixel), x, width, lights) {
                counts.counts[bucket.index()] += 1;
            }
        }
        counts
    }

    pub fn count(&self, bucket: PortBucket) -> u32 {
        self.counts[bucket.index()]
    }

    /// Every port whose colour clears its threshold.
    pub fn ports(&self) -> PortSet {
        PortBucket::ALL
            .iter()
            .map(|&bucket| (bucket.port(), self.count(bucket)))
            .filter(|((_, threshold), count)| count >= threshold)
            .map(|((port, _), _)| port)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PortPlateReader;

impl PortPlateReader {
    pub fn new() -> Self {
        Self
    }

    /// Copy of `plate` with every bucketed pixel painted in its debug colour.
    fn paint_buckets(plate: &RgbaImage, lights: LightsState) -> RgbaImage {
        let width = plate.width();
        let mut painted = plate.clone();
        for (x, _, pixel) in painted.enumerate_pixels_mut() {
            if let Some(bucket) = PortBucket::classify(Hsv::from_rgba(pixel), x, width, lights) {
                *pixel = bucket.debug_color();
            }
        }
        painted
    }
}

impl WidgetReader for PortPlateReader {
    fn kind(&self) -> WidgetKind {
        WidgetKind::PortPlate
    }

    /// The plate body is the only large dark grey surface.
    fn presence_score(&self, _frame: &Frame, counts: &PixelCounts) -> f32 {
        counts.fraction(ColorBucket::DarkGrey)
    }

    fn extract(&self, frame: &Frame, mut debug: Option<&mut DebugOverlay>) -> Result<ReadData> {
        let lights = frame.lights();

        let quad = find_corners(
            frame.image(),
            frame.bounds(),
            |p| is_bezel_grey(Hsv::from_rgba(p), lights),
            BEZEL_MIN_RUN,
        )?;
        let plate = perspective_undistort(frame.image(), &quad, Interpolation::Nearest, CANONICAL_SIZE)?;

        let counts = PortCounts::compute(&plate, lights);
        let ports = counts.ports();
        debug!(?quad, ?counts, %ports, "port plate read");

        if let Some(overlay) = debug.as_deref_mut() {
            overlay.mark_quad(&quad);
            overlay.attach("port_plate", Self::paint_buckets(&plate, lights));
            let summary: Vec<String> = PortBucket::ALL
                .iter()
                .map(|&bucket| format!("{:?}={}", bucket, counts.count(bucket)))
                .collect();
            overlay.note(format!("port pixels: {}", summary.join(" ")));
        }

        Ok(ReadData::PortPlate { ports })
    }
}
