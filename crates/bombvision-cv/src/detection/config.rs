//! Recognition configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main recognition configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Presence score the best reader must reach before it is trusted.
    pub min_confidence: f32,
    pub glyph: GlyphConfig,
    pub debug: DebugConfig,
}

/// Reference glyph configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphConfig {
    /// Pixel height the embedded font is rendered at.
    pub font_scale: f32,
    pub serial_size: (u32, u32), // (width, height)
    pub indicator_size: (u32, u32), // (width, height)
    /// Load captured references from `<dir>/serial` and `<dir>/indicator`
    /// instead of rendering them.
    pub reference_dir: Option<PathBuf>,
}

/// Diagnostic output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub draw_overlay: bool,
    pub save_intermediate: bool,
    pub output_dir: PathBuf,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.1,
            glyph: GlyphConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for GlyphConfig {
    fn default() -> Self {
        Self {
            font_scale: 28.0,
            serial_size: (16, 22),
            indicator_size: (48, 16),
            reference_dir: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            draw_overlay: false,
            save_intermediate: false,
            output_dir: "debug".into(),
        }
    }
}

impl RecognitionConfig {
    /// Read a JSON configuration file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        serde_json::from_str(&text).with_context(|| format!("Failed to parse config: {:?}", path))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, text).with_context(|| format!("Failed to write config: {:?}", path))
    }

    /// Configuration with debug output switched on, written to `dir`.
    pub fn with_debug_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.debug.draw_overlay = true;
        self.debug.save_intermediate = true;
        self.debug.output_dir = dir.into();
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }
}
