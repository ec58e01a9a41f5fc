//! Reference glyph rendering with the embedded font

use crate::error::{RecognitionError, Result};
use ab_glyph::{FontArc, PxScale};
use image::{GrayImage, Luma};
use imageproc::drawing::{draw_text_mut, text_size};

/// Ink is drawn black on white; anything darker than this counts as ink.
pub const INK_THRESHOLD: u8 = 128;

pub const INK: Luma<u8> = Luma([0]);
pub const PAPER: Luma<u8> = Luma([255]);

pub fn is_ink(pixel: &Luma<u8>) -> bool {
    pixel[0] < INK_THRESHOLD
}

/// The fixed font reference glyphs are rendered with.
#[derive(Clone)]
pub struct GlyphFont {
    font: FontArc,
    scale: PxScale,
}

impl GlyphFont {
    /// DejaVu Sans, compiled into the binary.
    pub fn embedded(scale: f32) -> Result<Self> {
        let font_data: &'static [u8] = include_bytes!("../../assets/DejaVuSans.ttf");
        let font = FontArc::try_from_slice(font_data)
            .map_err(|e| RecognitionError::invalid_input(format!("embedded font: {}", e)))?;
        Self::from_font(font, scale)
    }

    pub fn from_font(font: FontArc, scale: f32) -> Result<Self> {
        if !(scale > 0.0) {
            return Err(RecognitionError::invalid_input(format!("font scale {} must be positive", scale)));
        }
        Ok(Self {
            font,
            scale: PxScale::from(scale),
        })
    }

    pub fn font(&self) -> &FontArc {
        &self.font
    }

    pub fn scale(&self) -> PxScale {
        self.scale
    }

    /// Render `text` black on a white canvas with a margin on every side,
    /// so descenders and overhangs are never clipped.
    pub fn render(&self, text: &str) -> GrayImage {
        let (text_width, text_height) = text_size(self.scale, &self.font, text);
        let margin = self.scale.y.ceil() as u32 / 2 + 1;

        let mut canvas = GrayImage::from_pixel(
            text_width + 2 * margin,
            text_height + 2 * margin,
            PAPER,
        );
        draw_text_mut(
            &mut canvas,
            INK,
            margin as i32,
            margin as i32,
            self.scale,
            &self.font,
            text,
        );
        canvas
    }

    /// Render `text` and threshold it to a pure ink/paper mask.
    pub fn render_mask(&self, text: &str) -> GrayImage {
        let mut mask = self.render(text);
        for pixel in mask.pixels_mut() {
            *pixel = if is_ink(pixel) { INK } else { PAPER };
        }
        mask
    }
}

impl std::fmt::Debug for GlyphFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphFont").field("scale", &self.scale).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_font_loads() -> Result<()> {
        let font = GlyphFont::embedded(32.0)?;
        assert_eq!(font.scale().y, 32.0);
        Ok(())
    }

    #[test]
    fn test_rejects_non_positive_scale() {
        assert!(GlyphFont::embedded(0.0).is_err());
        assert!(GlyphFont::embedded(f32::NAN).is_err());
    }

    #[test]
    fn test_render_mask_is_binary_and_inked() -> Result<()> {
        let font = GlyphFont::embedded(32.0)?;
        let mask = font.render_mask("Q");

        assert!(mask.pixels().all(|p| *p == INK || *p == PAPER));
        assert!(mask.pixels().any(is_ink));
        // Margin keeps the border clean
        for x in 0..mask.width() {
            assert_eq!(*mask.get_pixel(x, 0), PAPER);
            assert_eq!(*mask.get_pixel(x, mask.height() - 1), PAPER);
        }
        Ok(())
    }
}
