//! Template recognition of glyphs and labels

pub mod font;
pub mod loader;
pub mod matcher;

pub use font::GlyphFont;
pub use loader::GlyphLoader;
pub use matcher::{ink_mask, l1_distance, TemplateRecognizer};

use crate::error::{RecognitionError, Result};
use bombvision_core::IndicatorLabel;
use image::GrayImage;

/// Symbols that can appear on a serial-number plate, in comparison order.
pub const SERIAL_ALPHABET: [&str; 36] = [
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "A", "B", "C", "D", "E", "F", "G", "H",
    "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z",
];

/// Indicator codes in comparison order.
pub fn indicator_alphabet() -> Vec<&'static str> {
    IndicatorLabel::ALL.iter().map(|label| label.as_str()).collect()
}

/// One canonical reference bitmap and the label it stands for.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub label: String,
    pub bitmap: GrayImage,
}

impl Glyph {
    pub fn new(label: impl Into<String>, bitmap: GrayImage) -> Self {
        Self {
            label: label.into(),
            bitmap,
        }
    }
}

/// Ordered, read-only set of reference glyphs sharing one canonical size.
#[derive(Debug, Clone)]
pub struct GlyphSet {
    canonical: (u32, u32),
    glyphs: Vec<Glyph>,
}

impl GlyphSet {
    pub fn new(canonical: (u32, u32), glyphs: Vec<Glyph>) -> Result<Self> {
        if glyphs.is_empty() {
            return Err(RecognitionError::invalid_input("glyph set needs at least one reference"));
        }
        if let Some(odd) = glyphs.iter().find(|g| g.bitmap.dimensions() != canonical) {
            return Err(RecognitionError::invalid_input(format!(
                "reference '{}' is {:?}, expected {:?}",
                odd.label,
                odd.bitmap.dimensions(),
                canonical
            )));
        }
        Ok(Self { canonical, glyphs })
    }

    pub fn canonical_size(&self) -> (u32, u32) {
        self.canonical
    }

    pub fn as_slice(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Glyph> {
        self.glyphs.iter()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Best reference for a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    pub index: usize,
    pub label: &'a str,
    pub distance: u64,
}
