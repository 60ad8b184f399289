use crate::error::{PolycutError, PolycutResult};
use crate::types::Point2D;

pub mod border;
pub mod flatten;

pub use border::Border;
pub use flatten::{flatten_bez_path, flatten_svg_path};

/// Squared Euclidean distance between two points.
///
/// Prefer this to [`distance`] when only comparisons are needed.
pub fn squared_distance(a: Point2D, b: Point2D) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    dx * dx + dy * dy
}

/// Euclidean distance between two points.
pub fn distance(a: Point2D, b: Point2D) -> f64 {
    squared_distance(a, b).sqrt()
}

/// Find the vertex of `path` nearest to `point`.
///
/// Returns the squared distance and the index of that vertex, or `None` for an empty path.
/// On ties the lowest index wins.
pub fn nearest_point_on_path(point: Point2D, path: &[Point2D]) -> Option<(f64, usize)> {
    let (first, rest) = path.split_first()?;
    let mut nearest = (squared_distance(point, *first), 0);
    for (index, vertex) in rest.iter().enumerate() {
        let dist = squared_distance(point, *vertex);
        if dist < nearest.0 {
            nearest = (dist, index + 1);
        }
    }
    Some(nearest)
}

/// Fail with [`PolycutError::PathNotClosed`] if the endpoints of `path` are more than `eps` apart.
///
/// Empty and single-point paths are always considered closed.
pub fn verify_closed(path: &[Point2D], eps: f64) -> PolycutResult<()> {
    match (path.first(), path.last()) {
        (Some(first), Some(last)) if path.len() > 1 && distance(*first, *last) > eps => {
            Err(PolycutError::PathNotClosed)
        }
        _ => Ok(()),
    }
}

/// Return the closed `path` re-started (and re-closed) at index `new_start`.
///
/// The duplicated leading vertex is dropped and the new first vertex is appended at the end.
/// Index 0, the last index and anything beyond it leave the path unchanged.
pub fn rotate_closed_path(path: &[Point2D], new_start: usize) -> Vec<Point2D> {
    if new_start == 0 || new_start + 1 >= path.len() {
        return path.to_vec();
    }

    let mut rotated = Vec::with_capacity(path.len());
    rotated.extend_from_slice(&path[new_start..]);
    rotated.extend_from_slice(&path[1..=new_start]);
    rotated
}

/// Close an open polyline by repeating its first point at the end.
///
/// Paths whose endpoints are already within `eps` are left untouched.
pub fn close_path(path: &mut Vec<Point2D>, eps: f64) {
    if let (Some(first), Some(last)) = (path.first().copied(), path.last().copied()) {
        if path.len() > 1 && distance(first, last) > eps {
            path.push(first);
        }
    }
}
