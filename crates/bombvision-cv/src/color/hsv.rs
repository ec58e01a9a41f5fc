use image::Rgba;
use serde::{Deserialize, Serialize};

/// Hue in degrees [0, 360), saturation and value in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Hsv {
    pub fn new(h: f32, s: f32, v: f32) -> Self {
        Self { h, s, v }
    }

    /// Standard max/min chroma conversion. Achromatic pixels get hue 0.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let r = r as f32 / 255.0;
        let g = g as f32 / 255.0;
        let b = b as f32 / 255.0;

        let max = r.max(g.max(b));
        let min = r.min(g.min(b));
        let chroma = max - min;

        let v = max;
        let s = if max <= f32::EPSILON { 0.0 } else { chroma / max };

        if chroma <= 1e-6 {
            return Self { h: 0.0, s, v };
        }

        let (difference, sector) = if max == r {
            (g - b, 0.0)
        } else if max == g {
            (b - r, 2.0)
        } else {
            (r - g, 4.0)
        };

        let mut h = (difference / chroma + sector) * 60.0;
        if h < 0.0 {
            h += 360.0;
        }
        if h >= 360.0 {
            h -= 360.0;
        }

        Self { h, s, v }
    }

    pub fn from_rgba(pixel: &Rgba<u8>) -> Self {
        Self::from_rgb(pixel[0], pixel[1], pixel[2])
    }

    /// Hue inside `[low, high)`. When `low > high` the range wraps through 0°,
    /// which is how reds are expressed.
    pub fn hue_in(&self, low: f32, high: f32) -> bool {
        if low <= high {
            self.h >= low && self.h < high
        } else {
            self.h >= low || self.h < high
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_primary_colors() {
        let red = Hsv::from_rgb(255, 0, 0);
        assert!(close(red.h, 0.0) && close(red.s, 1.0) && close(red.v, 1.0));

        let green = Hsv::from_rgb(0, 255, 0);
        assert!(close(green.h, 120.0));

        let blue = Hsv::from_rgb(0, 0, 255);
        assert!(close(blue.h, 240.0));

        let magenta = Hsv::from_rgb(255, 0, 255);
        assert!(close(magenta.h, 300.0));
    }

    #[test]
    fn test_greys_have_no_saturation() {
        for level in [0u8, 1, 77, 128, 254, 255] {
            let grey = Hsv::from_rgb(level, level, level);
            assert_eq!(grey.h, 0.0);
            assert_eq!(grey.s, 0.0);
            assert!(close(grey.v, level as f32 / 255.0));
        }
    }

    #[test]
    fn test_conversion_stays_in_range() {
        for r in (0..=255u16).step_by(15) {
            for g in (0..=255u16).step_by(15) {
                for b in (0..=255u16).step_by(15) {
                    let hsv = Hsv::from_rgb(r as u8, g as u8, b as u8);
                    assert!((0.0..360.0).contains(&hsv.h), "{:?}", hsv);
                    assert!((0.0..=1.0).contains(&hsv.s));
                    assert!((0.0..=1.0).contains(&hsv.v));
                }
            }
        }
    }

    #[test]
    fn test_hue_wraparound() {
        let reddish = Hsv::new(350.0, 1.0, 1.0);
        assert!(reddish.hue_in(345.0, 15.0));
        assert!(Hsv::new(0.0, 1.0, 1.0).hue_in(345.0, 15.0));
        assert!(!Hsv::new(15.0, 1.0, 1.0).hue_in(345.0, 15.0));
        assert!(!Hsv::new(200.0, 1.0, 1.0).hue_in(345.0, 15.0));
        assert!(Hsv::new(40.0, 1.0, 1.0).hue_in(40.0, 70.0));
        assert!(!Hsv::new(70.0, 1.0, 1.0).hue_in(40.0, 70.0));
    }
}
