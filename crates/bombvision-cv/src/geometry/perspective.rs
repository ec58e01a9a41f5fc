use super::Quad;
use crate::error::{RecognitionError, Result};
use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use tracing::debug;

/// Quads enclosing less than this many square pixels cannot be undistorted.
const MIN_QUAD_AREA: f32 = 1.0;

/// Resample the region bounded by `quad` into a `width × height` image.
///
/// The homography sends `quad`'s corners to the output's corner pixels; every
/// output pixel is then inverse-mapped into the source and sampled with
/// `interpolation`. Readers use nearest-neighbour so later colour and glyph
/// comparisons see hard edges. Destination pixels mapping outside the source
/// come out transparent black.
pub fn perspective_undistort(
    image: &RgbaImage,
    quad: &Quad,
    interpolation: Interpolation,
    (width, height): (u32, u32),
) -> Result<RgbaImage> {
    if width < 2 || height < 2 {
        return Err(RecognitionError::invalid_input(format!(
            "undistort target {}x{} is too small",
            width, height
        )));
    }

    let area = quad_area(quad);
    if area < MIN_QUAD_AREA {
        return Err(RecognitionError::ambiguous(format!(
            "degenerate quadrilateral {:?} (area {:.1})",
            quad, area
        )));
    }

    let right = (width - 1) as f32;
    let bottom = (height - 1) as f32;
    let target = [(0.0, 0.0), (right, 0.0), (0.0, bottom), (right, bottom)];

    let projection = Projection::from_control_points(quad.control_points(), target)
        .ok_or_else(|| {
            RecognitionError::ambiguous(format!("no homography maps {:?} to {}x{}", quad, width, height))
        })?;

    debug!(?quad, width, height, "undistorting quadrilateral");

    let mut output = RgbaImage::new(width, height);
    warp_into(image, &projection, interpolation, Rgba([0, 0, 0, 0]), &mut output);
    Ok(output)
}

/// Shoelace area of the polygon tl → tr → br → bl.
fn quad_area(quad: &Quad) -> f32 {
    let ring = [quad.tl, quad.tr, quad.br, quad.bl];
    let mut twice_area = 0i64;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        twice_area += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
    }
    (twice_area.abs() as f32) / 2.0
}
