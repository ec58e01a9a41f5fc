//! Loading and saving reference glyphs as image files
//!
//! Rendered references are the default. Captured references let the glyph
//! tables be recalibrated against real screenshots without touching code:
//! dump the rendered set, replace files with crops from recordings, and
//! point the configuration at the directory.

use super::font::{is_ink, INK, PAPER};
use super::matcher::normalize;
use super::{Glyph, GlyphSet};
use crate::utils::image::ImageUtils;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Glyph file loader searching several directories
pub struct GlyphLoader {
    glyph_dirs: Vec<PathBuf>,
    supported_extensions: Vec<String>,
}

impl GlyphLoader {
    pub fn new() -> Self {
        Self {
            glyph_dirs: Vec::new(),
            supported_extensions: vec!["png".to_string(), "bmp".to_string()],
        }
    }

    pub fn add_glyph_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.glyph_dirs.push(dir.as_ref().to_path_buf());
        self
    }

    /// Load one reference per label, normalized to `canonical` unless the
    /// file already has that size.
    ///
    /// Every label must have a file; a partial set would silently skew
    /// classification towards the labels that are present.
    pub fn load_set<S: AsRef<str>>(&self, labels: &[S], canonical: (u32, u32)) -> Result<GlyphSet> {
        let mut glyphs = Vec::with_capacity(labels.len());

        for label in labels {
            let label = label.as_ref();
            let path = self
                .find_glyph_file(label)?
                .ok_or_else(|| anyhow!("No reference glyph file for '{}' in {:?}", label, self.glyph_dirs))?;

            let mut mask = ImageUtils::load_luma(&path)?;
            for pixel in mask.pixels_mut() {
                *pixel = if is_ink(pixel) { INK } else { PAPER };
            }

            // Files already at canonical size were saved by `save_set`
            let bitmap = if mask.dimensions() == canonical {
                mask
            } else {
                normalize(&mask, canonical)
                    .with_context(|| format!("Reference glyph has no ink: {:?}", path))?
            };
            glyphs.push(Glyph::new(label, bitmap));
        }

        tracing::info!(count = glyphs.len(), dirs = ?self.glyph_dirs, "loaded reference glyphs");
        Ok(GlyphSet::new(canonical, glyphs)?)
    }

    /// Write every reference of `set` as `<label>.png` into `dir`.
    pub fn save_set<P: AsRef<Path>>(set: &GlyphSet, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).with_context(|| format!("Failed to create directory: {:?}", dir))?;

        for glyph in set.iter() {
            let path = dir.join(format!("{}.png", glyph.label));
            glyph
                .bitmap
                .save(&path)
                .with_context(|| format!("Failed to save glyph: {:?}", path))?;
        }
        Ok(())
    }

    fn generate_candidates(&self, label: &str) -> Vec<String> {
        let mut candidates = Vec::new();
        for ext in &self.supported_extensions {
            candidates.push(format!("{}.{}", label, ext));
            candidates.push(format!("_{}.{}", label, ext));
        }
        candidates
    }

    fn find_glyph_file(&self, label: &str) -> Result<Option<PathBuf>> {
        for candidate in self.generate_candidates(label) {
            for dir in &self.glyph_dirs {
                let path = dir.join(&candidate);
                if path.exists() {
                    return Ok(Some(path));
                }

                // Case-insensitive search
                if let Ok(entries) = fs::read_dir(dir) {
                    for entry in entries.flatten() {
                        let file_name = entry.file_name();
                        if file_name.to_string_lossy().eq_ignore_ascii_case(&candidate) {
                            return Ok(Some(entry.path()));
                        }
                    }
                }
            }
        }
        Ok(None)
    }
}

impl Default for GlyphLoader {
    fn default() -> Self {
        Self::new()
    }
}
