//! Image loading and conversion helpers

use crate::frame::Frame;
use anyhow::{Context, Result};
use bombvision_core::LightsState;
use image::{GrayImage, Rgba, RgbaImage};
use std::path::Path;

/// Image utility functions
pub struct ImageUtils;

impl ImageUtils {
    /// Load any supported image file as RGBA.
    pub fn load_rgba<P: AsRef<Path>>(path: P) -> Result<RgbaImage> {
        let img = image::open(&path)
            .with_context(|| format!("Failed to open image: {:?}", path.as_ref()))?;
        Ok(img.to_rgba8())
    }

    /// Load any supported image file as 8-bit luma.
    pub fn load_luma<P: AsRef<Path>>(path: P) -> Result<GrayImage> {
        let img = image::open(&path)
            .with_context(|| format!("Failed to open image: {:?}", path.as_ref()))?;
        Ok(img.to_luma8())
    }

    /// Load an image file straight into a frame.
    pub fn load_frame<P: AsRef<Path>>(path: P, lights: LightsState) -> Result<Frame> {
        Ok(Frame::new(Self::load_rgba(path)?, lights))
    }

    pub fn save_rgba<P: AsRef<Path>>(image: &RgbaImage, path: P) -> Result<()> {
        image
            .save(&path)
            .with_context(|| format!("Failed to save image: {:?}", path.as_ref()))
    }

    /// Expand a luma mask to opaque RGBA, for pasting crops into overlays.
    pub fn luma_to_rgba(mask: &GrayImage) -> RgbaImage {
        RgbaImage::from_fn(mask.width(), mask.height(), |x, y| {
            let value = mask.get_pixel(x, y)[0];
            Rgba([value, value, value, 255])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_luma_to_rgba() {
        let mut mask = GrayImage::from_pixel(3, 2, Luma([255]));
        mask.put_pixel(1, 1, Luma([0]));
        let rgba = ImageUtils::luma_to_rgba(&mask);

        assert_eq!(rgba.dimensions(), (3, 2));
        assert_eq!(*rgba.get_pixel(1, 1), Rgba([0, 0, 0, 255]));
        assert_eq!(*rgba.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_save_and_load_frame() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("frame.png");
        let image = RgbaImage::from_pixel(5, 4, Rgba([10, 20, 30, 255]));

        ImageUtils::save_rgba(&image, &path)?;
        let frame = ImageUtils::load_frame(&path, LightsState::Off)?;

        assert_eq!(frame.image(), &image);
        assert_eq!(frame.lights(), LightsState::Off);
        Ok(())
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = ImageUtils::load_rgba("does/not/exist.png").unwrap_err();
        assert!(format!("{:#}", err).contains("does/not/exist.png"));
    }
}
