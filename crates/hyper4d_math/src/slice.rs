//! Cross-sections of 4D geometry at a constant-W hyperplane
//!
//! A slice is the 3D shape left where a 4D solid meets `w = w_plane`. For
//! wireframe geometry that is the set of points where edges cross the plane.
//! Edges that don't cross are simply skipped; that is the normal case, not
//! an error.

use crate::{MathError, Vec4};

/// Edges whose endpoints differ in W by less than this are parallel to the plane
pub const PARALLEL_EPSILON: f64 = 1e-10;

/// True iff `|v.w - w_plane| <= tolerance`
#[inline]
pub fn is_in_slice(v: Vec4, w_plane: f64, tolerance: f64) -> bool {
    (v.w - w_plane).abs() <= tolerance
}

/// Where the segment `v1`-`v2` meets the hyperplane `w = w_plane`.
///
/// `None` when both endpoints lie strictly on the same side, or when the
/// segment is parallel to the plane (including lying in it). An endpoint
/// sitting exactly on the plane counts as a crossing at that endpoint.
/// The returned point has `w == w_plane` exactly.
pub fn edge_crossing(v1: Vec4, v2: Vec4, w_plane: f64) -> Option<Vec4> {
    let d1 = v1.w - w_plane;
    let d2 = v2.w - w_plane;
    if d1 * d2 > 0.0 {
        return None;
    }
    let dw = v2.w - v1.w;
    if dw.abs() <= PARALLEL_EPSILON {
        return None;
    }
    let t = (w_plane - v1.w) / dw;
    let mut p = v1.lerp(v2, t);
    p.w = w_plane;
    Some(p)
}

/// Collect the crossing point of every edge that meets `w = w_plane`.
///
/// `edges` index into `vertices`.
///
/// # Errors
/// [`MathError::EdgeIndexOutOfRange`] if an edge names a missing vertex.
pub fn slice_edges(vertices: &[Vec4], edges: &[[usize; 2]], w_plane: f64) -> Result<Vec<Vec4>, MathError> {
    let mut out = Vec::new();
    slice_edges_into(vertices, edges, w_plane, &mut out)?;
    Ok(out)
}

/// [`slice_edges`] appending into a reusable buffer.
///
/// `out` is cleared first. On error it holds the crossings found before the
/// bad edge.
pub fn slice_edges_into(
    vertices: &[Vec4],
    edges: &[[usize; 2]],
    w_plane: f64,
    out: &mut Vec<Vec4>,
) -> Result<(), MathError> {
    out.clear();
    let fetch = |index: usize| {
        vertices
            .get(index)
            .copied()
            .ok_or(MathError::EdgeIndexOutOfRange { index, vertex_count: vertices.len() })
    };
    for &[a, b] in edges {
        let (v1, v2) = (fetch(a)?, fetch(b)?);
        if let Some(p) = edge_crossing(v1, v2, w_plane) {
            out.push(p);
        }
    }
    Ok(())
}

/// A point kept by [`project_slice`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlicePoint {
    /// The xyz of the source point, w = 0
    pub point: Vec4,
    /// 1 at the slice centre falling to 0 at its edge; always 1 without fade
    pub alpha: f64,
}

/// Keep a point only if it lies within `thickness` of `slice_w`.
///
/// With `fade` the alpha drops linearly with distance from the slice.
pub fn project_slice(v: Vec4, slice_w: f64, thickness: f64, fade: bool) -> Option<SlicePoint> {
    let dist = (v.w - slice_w).abs();
    if dist > thickness {
        return None;
    }
    let alpha = if fade && thickness > 0.0 {
        (1.0 - dist / thickness).clamp(0.0, 1.0)
    } else {
        1.0
    };
    Some(SlicePoint {
        point: Vec4::new(v.x, v.y, v.z, 0.0),
        alpha,
    })
}
