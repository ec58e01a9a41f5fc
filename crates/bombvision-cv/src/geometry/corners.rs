use super::{Point, Quad, Rect};
use crate::error::{RecognitionError, Result};
use image::{ImageBuffer, Pixel};

/// Corner directions as (sx, sy) signs, in `Quad` order.
const DIRECTIONS: [(i64, i64); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Locate the four extreme corners of a quadrilateral-shaped blob of pixels
/// satisfying `predicate`.
///
/// For each corner the lines of constant `sx·x + sy·y` are swept from the
/// outermost one inward. The first line carrying a diagonal run of at least
/// `min_run` matching pixels anchors the corner; shorter runs are noise.
/// The corner is the run's extreme x and y in that corner's direction, which
/// is exact for axis-aligned blobs and close for mildly rotated ones.
pub fn find_corners<P, F>(
    image: &ImageBuffer<P, Vec<P::Subpixel>>,
    region: Rect,
    predicate: F,
    min_run: u32,
) -> Result<Quad>
where
    P: Pixel,
    F: Fn(&P) -> bool,
{
    if min_run == 0 {
        return Err(RecognitionError::invalid_input("corner search needs min_run >= 1"));
    }

    let region = region.clip_to(image);
    if region.is_empty() {
        return Err(RecognitionError::ambiguous("corner search region is empty"));
    }

    let mut corners = [Point::new(0, 0); 4];
    for (slot, &(sx, sy)) in corners.iter_mut().zip(DIRECTIONS.iter()) {
        *slot = sweep_corner(image, &region, &predicate, min_run as i64, sx, sy).ok_or_else(
            || {
                RecognitionError::ambiguous(format!(
                    "no run of {} pixels found for corner ({:+}, {:+})",
                    min_run, sx, sy
                ))
            },
        )?;
    }

    Ok(Quad::new(corners[0], corners[1], corners[2], corners[3]))
}

fn sweep_corner<P, F>(
    image: &ImageBuffer<P, Vec<P::Subpixel>>,
    region: &Rect,
    predicate: &F,
    min_run: i64,
    sx: i64,
    sy: i64,
) -> Option<Point>
where
    P: Pixel,
    F: Fn(&P) -> bool,
{
    let x0 = region.x as i64;
    let y0 = region.y as i64;
    let x1 = region.right() as i64 - 1;
    let y1 = region.bottom() as i64 - 1;

    let projections = [sx * x0 + sy * y0, sx * x1 + sy * y0, sx * x0 + sy * y1, sx * x1 + sy * y1];
    let p_max = *projections.iter().max()?;
    let p_min = *projections.iter().min()?;

    for p in (p_min..=p_max).rev() {
        // (start x, length) of the longest run on this line
        let mut best: Option<(i64, i64)> = None;
        let mut run_start = 0;
        let mut run_len = 0;

        for x in x0..=x1 {
            // sy is ±1, so dividing by it is multiplying by it
            let y = sy * (p - sx * x);
            let hit = y >= y0 && y <= y1 && predicate(image.get_pixel(x as u32, y as u32));

            if hit {
                if run_len == 0 {
                    run_start = x;
                }
                run_len += 1;
                if best.is_none_or(|(_, len)| run_len > len) {
                    best = Some((run_start, run_len));
                }
            } else {
                run_len = 0;
            }
        }

        if let Some((start, len)) = best {
            if len >= min_run {
                let end = start + len - 1;
                let y_start = sy * (p - sx * start);
                let y_end = sy * (p - sx * end);

                let corner_x = if sx > 0 { end } else { start };
                let corner_y = if sy > 0 { y_start.max(y_end) } else { y_start.min(y_end) };
                return Some(Point::new(corner_x as i32, corner_y as i32));
            }
        }
    }

    None
}
