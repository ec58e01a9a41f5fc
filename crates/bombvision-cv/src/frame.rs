//! Captured sub-image plus its lighting calibration

use crate::color::Hsv;
use crate::geometry::Rect;
use bombvision_core::LightsState;
use image::RgbaImage;

/// One immutable captured sub-image, cropped around a single widget.
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbaImage,
    lights: LightsState,
}

impl Frame {
    pub fn new(image: RgbaImage, lights: LightsState) -> Self {
        Self { image, lights }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn lights(&self) -> LightsState {
        self.lights
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The whole frame as a search region.
    pub fn bounds(&self) -> Rect {
        Rect::of_image(&self.image)
    }

    pub fn hsv_at(&self, x: u32, y: u32) -> Hsv {
        Hsv::from_rgba(self.image.get_pixel(x, y))
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}
