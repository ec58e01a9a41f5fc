//! Frame-level recognition: configuration and reader dispatch

pub mod config;
pub mod registry;

pub use config::{DebugConfig, GlyphConfig, RecognitionConfig};
pub use registry::{ReaderRegistry, Recognition};
