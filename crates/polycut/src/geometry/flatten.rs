use crate::types::Point2D;
use anyhow::{anyhow, Result};
use kurbo::{BezPath, PathEl};

/// Flatten a Bézier path into polylines, one per subpath.
///
/// `tolerance` is the maximum distance between the curve and its approximation (mm).
/// A `ClosePath` element repeats the subpath start so the polyline is explicitly closed.
pub fn flatten_bez_path(path: &BezPath, tolerance: f64) -> Vec<Vec<Point2D>> {
    let mut polylines: Vec<Vec<Point2D>> = Vec::new();
    let mut current: Vec<Point2D> = Vec::new();

    kurbo::flatten(path, tolerance, |el| match el {
        PathEl::MoveTo(p) => {
            if !current.is_empty() {
                polylines.push(std::mem::take(&mut current));
            }
            current.push((p.x, p.y));
        }
        PathEl::LineTo(p) => current.push((p.x, p.y)),
        PathEl::ClosePath => {
            if let (Some(first), Some(last)) = (current.first().cloned(), current.last().cloned()) {
                if first != last {
                    current.push(first);
                }
                polylines.push(std::mem::take(&mut current));
            }
        }
        // flatten only emits lines
        PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => current.push((p.x, p.y)),
    });

    if !current.is_empty() {
        polylines.push(current);
    }

    polylines
}

/// Parse SVG path data (the `d` attribute) already expressed in millimetres and flatten it.
pub fn flatten_svg_path(data: &str, tolerance: f64) -> Result<Vec<Vec<Point2D>>> {
    let path = BezPath::from_svg(data).map_err(|err| anyhow!("invalid path data {data:?}: {err}"))?;
    Ok(flatten_bez_path(&path, tolerance))
}
