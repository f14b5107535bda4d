//! Geometry helpers for axis-aligned rectangles.
//!
//! Contains:
//! - The overlap predicate used by block rejection sampling
//! - Inclusive containment and point-in-rectangle tests
//! - Clipping a rectangle to the topology bounds
//! - Polar offsets used for sector rings

use super::types::{Point3, Rect};

/// Overlap test between two axis-aligned rectangles.
///
/// Two rectangles overlap unless they are separated along at least one axis.
/// Separation is non-strict: rectangles that only share an edge (or a
/// corner) do not overlap, so blocks on a zero-width street grid may touch.
///
/// The predicate is symmetric and every non-degenerate rectangle overlaps
/// itself.
///
/// # Parameters
///
/// * `a` - First rectangle
/// * `b` - Second rectangle
///
/// # Returns
///
/// `true` if the interiors intersect, `false` otherwise.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    !(a.x_min >= b.x_max || b.x_min >= a.x_max || a.y_min >= b.y_max || b.y_min >= a.y_max)
}

/// True if `candidate` overlaps any rectangle in `placed`.
pub fn overlaps_any<'a>(candidate: &Rect, placed: impl IntoIterator<Item = &'a Rect>) -> bool {
    placed.into_iter().any(|r| overlaps(r, candidate))
}

/// Inclusive containment: every edge of `inner` lies within `outer`.
pub fn contains(outer: &Rect, inner: &Rect) -> bool {
    inner.x_min >= outer.x_min && inner.x_max <= outer.x_max && inner.y_min >= outer.y_min && inner.y_max <= outer.y_max
}

/// Inclusive point-in-rectangle test on the horizontal plane.
pub fn point_in_rect(p: &Point3, rect: &Rect) -> bool {
    p.x >= rect.x_min && p.x <= rect.x_max && p.y >= rect.y_min && p.y <= rect.y_max
}

/// Clamp each edge of `rect` to `bounds`.
///
/// Used for mobility ranges: a box that reaches past the topology edge is
/// cut back to the edge rather than rejected.
pub fn clip_to(rect: &Rect, bounds: &Rect) -> Rect {
    Rect {
        x_min: rect.x_min.max(bounds.x_min),
        x_max: rect.x_max.min(bounds.x_max),
        y_min: rect.y_min.max(bounds.y_min),
        y_max: rect.y_max.min(bounds.y_max),
    }
}

/// Point at `radius` from `center` in direction `angle` (radians), keeping `z`.
pub fn polar_offset(center: &Point3, radius: f64, angle: f64) -> Point3 {
    Point3 {
        x: center.x + radius * angle.cos(),
        y: center.y + radius * angle.sin(),
        z: center.z,
    }
}

/// Horizontal Euclidean distance between two points.
pub fn horizontal_distance(a: &Point3, b: &Point3) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}
