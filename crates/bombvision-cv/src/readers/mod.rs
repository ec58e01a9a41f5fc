//! Per-widget readers
//!
//! Each reader owns the colour calibration for its widget and implements
//! [`WidgetReader`](crate::traits::WidgetReader).

pub mod battery;
pub mod indicator;
pub mod port_plate;
pub mod serial;

pub use battery::BatteryHolderReader;
pub use indicator::IndicatorReader;
pub use port_plate::{PortBucket, PortCounts, PortPlateReader};
pub use serial::SerialNumberReader;

/// Copy of `image` with every colour channel scaled by `factor`, as a scene
/// looks once the room lights go out.
#[cfg(test)]
pub(crate) fn dimmed(image: &image::RgbaImage, factor: f32) -> image::RgbaImage {
    let mut dim = image.clone();
    for pixel in dim.pixels_mut() {
        for channel in pixel.0.iter_mut().take(3) {
            *channel = (*channel as f32 * factor).round() as u8;
        }
    }
    dim
}
