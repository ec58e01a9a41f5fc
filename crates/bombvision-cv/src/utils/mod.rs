//! Utility modules

pub mod debug;
pub mod image;

pub use debug::DebugOverlay;
pub use self::image::ImageUtils;
