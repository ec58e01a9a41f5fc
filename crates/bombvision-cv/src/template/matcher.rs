//! Nearest-reference glyph classification by L1 distance

use super::font::{is_ink, GlyphFont, INK, PAPER};
use super::{Glyph, GlyphSet, Match};
use crate::error::{RecognitionError, Result};
use crate::geometry::{find_edges, Rect};
use image::imageops::{self, FilterType};
use image::{GrayImage, Rgba, RgbaImage};
use tracing::debug;

/// Classifies glyph masks against a fixed reference set.
///
/// References and candidates go through the same crop-then-resize pipeline,
/// so a candidate rendered like its reference compares at distance 0.
#[derive(Debug, Clone)]
pub struct TemplateRecognizer {
    glyphs: GlyphSet,
}

impl TemplateRecognizer {
    pub fn new(glyphs: GlyphSet) -> Self {
        Self { glyphs }
    }

    /// Build references by rendering every label with `font`.
    pub fn render<S: AsRef<str>>(font: &GlyphFont, labels: &[S], canonical: (u32, u32)) -> Result<Self> {
        let mut glyphs = Vec::with_capacity(labels.len());
        for label in labels {
            let label = label.as_ref();
            let mask = font.render_mask(label);
            let bitmap = normalize(&mask, canonical).map_err(|_| {
                RecognitionError::invalid_input(format!("label '{}' renders without ink", label))
            })?;
            glyphs.push(Glyph::new(label, bitmap));
        }

        debug!(count = glyphs.len(), ?canonical, "rendered reference glyphs");
        Ok(Self::new(GlyphSet::new(canonical, glyphs)?))
    }

    pub fn glyphs(&self) -> &GlyphSet {
        &self.glyphs
    }

    pub fn canonical_size(&self) -> (u32, u32) {
        self.glyphs.canonical_size()
    }

    /// Crop `mask` to its ink and resize to the canonical size.
    pub fn normalize(&self, mask: &GrayImage) -> Result<GrayImage> {
        normalize(mask, self.canonical_size())
    }

    /// Resize an already-cropped mask to the canonical size.
    pub fn fit(&self, mask: &GrayImage) -> GrayImage {
        fit(mask, self.canonical_size())
    }

    /// Nearest reference to `candidate`, which must already be canonical.
    /// Ties go to the first reference in enumeration order.
    pub fn classify(&self, candidate: &GrayImage) -> Result<Match<'_>> {
        if candidate.dimensions() != self.canonical_size() {
            return Err(RecognitionError::invalid_input(format!(
                "candidate is {:?}, references are {:?}",
                candidate.dimensions(),
                self.canonical_size()
            )));
        }

        let distances = self.distances(candidate);
        let (index, distance) = distances
            .into_iter()
            .enumerate()
            .min_by_key(|&(_, distance)| distance)
            .ok_or_else(|| RecognitionError::invalid_input("empty glyph set"))?;

        Ok(Match {
            index,
            label: &self.glyphs.as_slice()[index].label,
            distance,
        })
    }

    /// `normalize` followed by `classify`.
    pub fn recognize(&self, mask: &GrayImage) -> Result<Match<'_>> {
        let candidate = self.normalize(mask)?;
        self.classify(&candidate)
    }

    #[cfg(feature = "parallel")]
    fn distances(&self, candidate: &GrayImage) -> Vec<u64> {
        use rayon::prelude::*;
        self.glyphs
            .as_slice()
            .par_iter()
            .map(|glyph| l1_distance(&glyph.bitmap, candidate))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn distances(&self, candidate: &GrayImage) -> Vec<u64> {
        self.glyphs
            .iter()
            .map(|glyph| l1_distance(&glyph.bitmap, candidate))
            .collect()
    }
}

/// Sum of absolute per-pixel differences of two equally sized images.
pub fn l1_distance(a: &GrayImage, b: &GrayImage) -> u64 {
    a.as_raw()
        .iter()
        .zip(b.as_raw().iter())
        .map(|(&p, &q)| p.abs_diff(q) as u64)
        .sum()
}

/// Crop to the ink bounding box, then resize to `canonical`.
pub fn normalize(mask: &GrayImage, canonical: (u32, u32)) -> Result<GrayImage> {
    let bounds = find_edges(mask, Rect::of_image(mask), is_ink)?;
    let cropped = imageops::crop_imm(mask, bounds.x, bounds.y, bounds.width, bounds.height).to_image();
    Ok(fit(&cropped, canonical))
}

/// Nearest-neighbour resize to `canonical`, keeping the mask binary.
pub fn fit(mask: &GrayImage, (width, height): (u32, u32)) -> GrayImage {
    let mut resized = imageops::resize(mask, width, height, FilterType::Nearest);
    for pixel in resized.pixels_mut() {
        *pixel = if is_ink(pixel) { INK } else { PAPER };
    }
    resized
}

/// Ink mask of `region` in a colour image: pixels satisfying `predicate`
/// become ink, everything else paper.
pub fn ink_mask<F>(image: &RgbaImage, region: Rect, predicate: F) -> GrayImage
where
    F: Fn(&Rgba<u8>) -> bool,
{
    let region = region.clip_to(image);
    GrayImage::from_fn(region.width, region.height, |x, y| {
        if predicate(image.get_pixel(region.x + x, region.y + y)) {
            INK
        } else {
            PAPER
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::SERIAL_ALPHABET;

    fn serial_recognizer() -> Result<TemplateRecognizer> {
        let font = GlyphFont::embedded(40.0)?;
        TemplateRecognizer::render(&font, &SERIAL_ALPHABET, (20, 28))
    }

    #[test]
    fn test_reference_round_trip_is_exact() -> Result<()> {
        let font = GlyphFont::embedded(40.0)?;
        let recognizer = TemplateRecognizer::render(&font, &SERIAL_ALPHABET, (20, 28))?;

        for (index, symbol) in SERIAL_ALPHABET.iter().enumerate() {
            let mask = font.render_mask(symbol);
            let found = recognizer.recognize(&mask)?;
            assert_eq!(found.distance, 0, "symbol {}", symbol);
            // Identical references would resolve to the first one
            assert!(found.index <= index);
            let glyphs = recognizer.glyphs().as_slice();
            assert_eq!(glyphs[found.index].bitmap, glyphs[index].bitmap);
        }
        Ok(())
    }

    #[test]
    fn test_classification_is_deterministic_and_minimal() -> Result<()> {
        let recognizer = serial_recognizer()?;
        let font = GlyphFont::embedded(44.0)?;
        let candidate = recognizer.normalize(&font.render_mask("7"))?;

        let first = recognizer.classify(&candidate)?;
        let second = recognizer.classify(&candidate)?;
        assert_eq!(first, second);

        for glyph in recognizer.glyphs().iter() {
            assert!(first.distance <= l1_distance(&glyph.bitmap, &candidate));
        }
        Ok(())
    }

    #[test]
    fn test_ties_resolve_to_first_reference() -> Result<()> {
        let blank = GrayImage::from_pixel(4, 4, INK);
        let set = GlyphSet::new(
            (4, 4),
            vec![Glyph::new("first", blank.clone()), Glyph::new("second", blank.clone())],
        )?;
        let recognizer = TemplateRecognizer::new(set);

        let found = recognizer.classify(&blank)?;
        assert_eq!(found.index, 0);
        assert_eq!(found.label, "first");
        Ok(())
    }

    #[test]
    fn test_wrong_candidate_size_is_rejected() -> Result<()> {
        let recognizer = serial_recognizer()?;
        let result = recognizer.classify(&GrayImage::new(5, 5));
        assert!(matches!(result, Err(RecognitionError::InvalidInput(_))));
        Ok(())
    }

    #[test]
    fn test_blank_mask_cannot_be_normalized() -> Result<()> {
        let recognizer = serial_recognizer()?;
        let blank = GrayImage::from_pixel(10, 10, PAPER);
        assert!(recognizer.normalize(&blank).is_err());
        Ok(())
    }

    #[test]
    fn test_ink_mask_uses_predicate() {
        let mut image = RgbaImage::from_pixel(6, 6, Rgba([255, 255, 255, 255]));
        image.put_pixel(3, 2, Rgba([0, 0, 0, 255]));
        let mask = ink_mask(&image, Rect::new(2, 2, 3, 3), |p| p[0] < 100);

        assert_eq!(mask.dimensions(), (3, 3));
        assert_eq!(*mask.get_pixel(1, 0), INK);
        assert_eq!(*mask.get_pixel(0, 0), PAPER);
    }
}
