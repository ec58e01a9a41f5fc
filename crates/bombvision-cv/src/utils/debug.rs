//! Diagnostic overlay filled in by readers while they work
//!
//! Purely observational: readers behave identically with or without one.

use super::image::ImageUtils;
use crate::frame::Frame;
use crate::geometry::{Point, Quad, Rect};
use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_cross_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use std::fs;
use std::path::Path;

pub const CORNER_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);
pub const EDGE_COLOR: Rgba<u8> = Rgba([0, 160, 255, 255]);
pub const REGION_COLOR: Rgba<u8> = Rgba([255, 0, 255, 255]);

pub struct DebugOverlay {
    canvas: RgbaImage,
    crops: Vec<(String, RgbaImage)>,
    notes: Vec<String>,
}

impl DebugOverlay {
    pub fn new(canvas: RgbaImage) -> Self {
        Self {
            canvas,
            crops: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Overlay starting as a copy of the frame.
    pub fn for_frame(frame: &Frame) -> Self {
        Self::new(frame.image().clone())
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn crops(&self) -> &[(String, RgbaImage)] {
        &self.crops
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn mark_point(&mut self, point: Point, color: Rgba<u8>) {
        draw_cross_mut(&mut self.canvas, color, point.x, point.y);
    }

    pub fn mark_quad(&mut self, quad: &Quad) {
        let edges = [(quad.tl, quad.tr), (quad.tr, quad.br), (quad.br, quad.bl), (quad.bl, quad.tl)];
        for (from, to) in edges {
            draw_line_segment_mut(&mut self.canvas, from.to_f32(), to.to_f32(), EDGE_COLOR);
        }
        for corner in quad.corners() {
            self.mark_point(corner, CORNER_COLOR);
        }
    }

    pub fn mark_rect(&mut self, rect: &Rect, color: Rgba<u8>) {
        if rect.is_empty() {
            return;
        }
        draw_hollow_rect_mut(&mut self.canvas, rect.to_imageproc(), color);
    }

    pub fn highlight(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        if x < self.canvas.width() && y < self.canvas.height() {
            self.canvas.put_pixel(x, y, color);
        }
    }

    /// Keep an intermediate image (undistorted plate, glyph crop, ...).
    pub fn attach(&mut self, name: impl Into<String>, image: RgbaImage) {
        self.crops.push((name.into(), image));
    }

    pub fn note(&mut self, text: impl Into<String>) {
        self.notes.push(text.into());
    }

    /// Drop attached crops, keeping the annotated canvas and notes.
    pub fn clear_crops(&mut self) {
        self.crops.clear();
    }

    /// Write `<stem>.png`, every attached crop as `<stem>_<name>.png` and the
    /// notes as `<stem>.txt` into `dir`.
    pub fn save<P: AsRef<Path>>(&self, dir: P, stem: &str) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).with_context(|| format!("Failed to create directory: {:?}", dir))?;

        ImageUtils::save_rgba(&self.canvas, dir.join(format!("{}.png", stem)))?;
        for (index, (name, image)) in self.crops.iter().enumerate() {
            let file = format!("{}_{:02}_{}.png", stem, index, sanitize(name));
            ImageUtils::save_rgba(image, dir.join(file))?;
        }
        if !self.notes.is_empty() {
            let path = dir.join(format!("{}.txt", stem));
            fs::write(&path, self.notes.join("\n"))
                .with_context(|| format!("Failed to write notes: {:?}", path))?;
        }
        Ok(())
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
