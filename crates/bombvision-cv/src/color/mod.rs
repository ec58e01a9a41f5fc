//! Colour model: HSV conversion and coarse buckets
//!
//! Widget-specific predicates live beside each reader; this module only
//! provides the conversion and the shared histogram used for scoring.

pub mod counts;
pub mod hsv;

pub use counts::{ColorBucket, PixelCounts};
pub use hsv::Hsv;
