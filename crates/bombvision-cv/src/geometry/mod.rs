//! Geometry toolkit: bounding boxes, corner search, perspective correction
//!
//! Everything here is parameterized by a pixel predicate and knows nothing
//! about particular widgets.

pub mod corners;
pub mod edges;
pub mod perspective;
pub mod shapes;

pub use corners::find_corners;
pub use edges::find_edges;
pub use imageproc::geometric_transformations::Interpolation;
pub use perspective::perspective_undistort;
pub use shapes::{Point, Quad, Rect};
