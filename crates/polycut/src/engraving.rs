use crate::geometry::distance;
use crate::types::{EngravingToolPath, OrientedWaypoint, Point2D};
use kurbo::Point;
use std::f64::consts::PI;
use tracing::debug;

/// Generate one oriented waypoint sequence per input path.
///
/// The engraving blade must stay tangent to the path, so every waypoint carries the heading of
/// the tool. Headings are measured counterclockwise from the +Y axis and accumulate turn by
/// turn: a closed counterclockwise square ends at 2π, not at 0, as the rotation axis has no
/// wrap-around.
///
/// * `z` - the constant engraving depth of every waypoint.
/// * `min_distance` - points closer than this to the last kept point are merged.
/// * `discretization_step` - maximum segment length, `f64::INFINITY` disables splitting.
///
/// The output always has as many sequences as there are input paths; empty paths give empty
/// sequences and paths collapsing to one point give a single waypoint with heading 0.
pub fn generate_engraving_toolpaths<P: AsRef<[Point2D]>>(
    paths: &[P],
    z: f64,
    min_distance: f64,
    discretization_step: f64,
) -> EngravingToolPath {
    let paths: Vec<Vec<OrientedWaypoint>> = paths
        .iter()
        .map(|path| oriented_path(path.as_ref(), z, min_distance, discretization_step))
        .collect();

    debug!(
        paths = paths.len(),
        waypoints = paths.iter().map(Vec::len).sum::<usize>(),
        "generated engraving tool paths"
    );

    EngravingToolPath { paths }
}

fn oriented_path(
    path: &[Point2D],
    z: f64,
    min_distance: f64,
    discretization_step: f64,
) -> Vec<OrientedWaypoint> {
    let merged = merge_near_points(path, min_distance);
    let points = discretize_path(&merged, discretization_step);
    let headings = compute_headings(&points);

    points
        .iter()
        .zip(headings)
        .map(|(&(x, y), theta)| OrientedWaypoint::new(x, y, z, theta))
        .collect()
}

/// Drop every point not further than `min_distance` from the last kept point.
///
/// Comparing against the last kept point (and not the previous raw point) keeps a long run
/// of closely spaced points from disappearing entirely.
pub fn merge_near_points(path: &[Point2D], min_distance: f64) -> Vec<Point2D> {
    let mut merged: Vec<Point2D> = Vec::with_capacity(path.len());
    for &point in path {
        match merged.last() {
            Some(&last) if distance(last, point) <= min_distance => {}
            _ => merged.push(point),
        }
    }
    merged
}

/// Split every segment longer than `step` into `ceil(length / step)` equal parts.
///
/// An infinite (or non-positive) step returns the path unchanged.
pub fn discretize_path(path: &[Point2D], step: f64) -> Vec<Point2D> {
    if !step.is_finite() || step <= 0.0 || path.len() < 2 {
        return path.to_vec();
    }

    let mut discretized = Vec::with_capacity(path.len());
    discretized.push(path[0]);

    for segment in path.windows(2) {
        let (start, end) = (segment[0], segment[1]);
        let length = distance(start, end);
        if length > step {
            let parts = (length / step).ceil() as usize;
            let a = Point::new(start.0, start.1);
            let b = Point::new(end.0, end.1);
            for i in 1..parts {
                let p = a.lerp(b, i as f64 / parts as f64);
                discretized.push((p.x, p.y));
            }
        }
        discretized.push(end);
    }

    discretized
}

/// Cumulative tool heading at every vertex of `path`.
///
/// The first heading is the orientation of the first segment, counterclockwise from +Y and
/// reduced to [0, π). Every following vertex adds the signed turn between the incoming and
/// outgoing segments, in (-π, π]. The last vertex keeps the heading of the last segment.
pub fn compute_headings(path: &[Point2D]) -> Vec<f64> {
    if path.len() < 2 {
        return vec![0.0; path.len()];
    }

    let directions: Vec<(f64, f64)> = path
        .windows(2)
        .map(|segment| (segment[1].0 - segment[0].0, segment[1].1 - segment[0].1))
        .collect();

    let mut headings = Vec::with_capacity(path.len());
    let (dx, dy) = directions[0];
    let mut heading = (-dx).atan2(dy).rem_euclid(PI);
    headings.push(heading);

    for pair in directions.windows(2) {
        let previous = pair[0].1.atan2(pair[0].0);
        let current = pair[1].1.atan2(pair[1].0);
        heading += wrap_turn(current - previous);
        headings.push(heading);
    }

    headings.push(heading);
    headings
}

/// Bring a difference of two `atan2` results into (-π, π].
fn wrap_turn(turn: f64) -> f64 {
    if turn > PI {
        turn - 2.0 * PI
    } else if turn <= -PI {
        turn + 2.0 * PI
    } else {
        turn
    }
}
