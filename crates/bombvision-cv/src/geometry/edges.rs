use super::Rect;
use crate::error::{RecognitionError, Result};
use image::{ImageBuffer, Pixel};

/// Smallest axis-aligned rectangle enclosing every pixel of `region` that
/// satisfies `predicate`.
///
/// The region is clipped to the image first. No matching pixel is a
/// recognition failure, never an empty rectangle.
pub fn find_edges<P, F>(
    image: &ImageBuffer<P, Vec<P::Subpixel>>,
    region: Rect,
    predicate: F,
) -> Result<Rect>
where
    P: Pixel,
    F: Fn(&P) -> bool,
{
    let region = region.clip_to(image);

    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut found = false;

    for y in region.y..region.bottom() {
        for x in region.x..region.right() {
            if predicate(image.get_pixel(x, y)) {
                found = true;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }
    }

    if !found {
        return Err(RecognitionError::ambiguous(format!(
            "no matching pixel inside {}x{} region at ({}, {})",
            region.width, region.height, region.x, region.y
        )));
    }

    Ok(Rect::from_inclusive(min_x, min_y, max_x, max_y))
}
