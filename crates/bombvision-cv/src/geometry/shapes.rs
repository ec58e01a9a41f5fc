//! Rectangles, points and quadrilaterals in pixel coordinates

use image::{ImageBuffer, Pixel};
use serde::{Deserialize, Serialize};

/// Axis-aligned pixel rectangle. `x`/`y` is the top-left pixel; the right
/// and bottom edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle spanning the inclusive pixel range `[x0, x1] × [y0, y1]`.
    pub fn from_inclusive(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1)
    }

    pub fn of_image<P: Pixel>(image: &ImageBuffer<P, Vec<P::Subpixel>>) -> Self {
        Self::new(0, 0, image.width(), image.height())
    }

    /// Exclusive right edge, saturating at `u32::MAX`.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge, saturating at `u32::MAX`.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Overlap of two rectangles; empty (zero-sized) when they are disjoint.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());

        if x1 <= x0 || y1 <= y0 {
            return Rect::new(x0, y0, 0, 0);
        }
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Clip to the bounds of `image`.
    pub fn clip_to<P: Pixel>(&self, image: &ImageBuffer<P, Vec<P::Subpixel>>) -> Rect {
        self.intersect(&Rect::of_image(image))
    }

    /// Convert for the `imageproc` drawing functions.
    pub fn to_imageproc(&self) -> imageproc::rect::Rect {
        imageproc::rect::Rect::at(self.x as i32, self.y as i32)
            .of_size(self.width.max(1), self.height.max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_f32(self) -> (f32, f32) {
        (self.x as f32, self.y as f32)
    }
}

/// Four corners of a detected planar region, always ordered top-left,
/// top-right, bottom-left, bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quad {
    pub tl: Point,
    pub tr: Point,
    pub bl: Point,
    pub br: Point,
}

impl Quad {
    pub fn new(tl: Point, tr: Point, bl: Point, br: Point) -> Self {
        Self { tl, tr, bl, br }
    }

    /// Corners of `rect` as inclusive pixel positions.
    pub fn from_rect(rect: &Rect) -> Self {
        let x0 = rect.x as i32;
        let y0 = rect.y as i32;
        let x1 = rect.right() as i32 - 1;
        let y1 = rect.bottom() as i32 - 1;
        Self::new(
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x0, y1),
            Point::new(x1, y1),
        )
    }

    pub fn corners(&self) -> [Point; 4] {
        [self.tl, self.tr, self.bl, self.br]
    }

    pub fn control_points(&self) -> [(f32, f32); 4] {
        self.corners().map(Point::to_f32)
    }
}
