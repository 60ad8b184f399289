use crate::error::PolycutResult;
use crate::geometry::{nearest_point_on_path, rotate_closed_path, verify_closed, Border};
use crate::types::{CuttingToolPath, Point2D};
use tracing::debug;

/// Machine home, where every cutting program starts and ends.
pub const HOME: Point2D = (0.0, 0.0);

/// Generate the 2-axis tool path for the united closed `path`.
///
/// The path is entered at its vertex nearest to the entry point: the bottom left corner of
/// `border` if one is given, machine home otherwise. When a border is given the stock is
/// squared after the path by cutting along the border counterclockwise from the entry point.
///
/// Returns `Ok(None)` for an empty path and [`crate::PolycutError::PathNotClosed`] when the
/// path endpoints are more than `close_distance` apart. The result never contains two
/// identical consecutive points.
pub fn generate_cutting_toolpath(
    path: &[Point2D],
    close_distance: f64,
    border: Option<&Border>,
) -> PolycutResult<Option<CuttingToolPath>> {
    verify_closed(path, close_distance)?;

    let entry = border.map(Border::bottom_left).unwrap_or(HOME);
    let Some((_, start)) = nearest_point_on_path(entry, path) else {
        return Ok(None);
    };
    let rotated = rotate_closed_path(path, start);

    let mut toolpath = CuttingToolPath::with_capacity(rotated.len() + 8);
    push_point(&mut toolpath, HOME);
    push_point(&mut toolpath, entry);
    for &point in &rotated {
        push_point(&mut toolpath, point);
    }
    push_point(&mut toolpath, entry);

    if let Some(border) = border {
        push_point(&mut toolpath, border.bottom_right());
        push_point(&mut toolpath, border.top_right());
        push_point(&mut toolpath, border.top_left());
        push_point(&mut toolpath, entry);
    }

    push_point(&mut toolpath, HOME);

    debug!(
        input_points = path.len(),
        output_points = toolpath.len(),
        squared = border.is_some(),
        "generated cutting tool path"
    );

    Ok(Some(toolpath))
}

fn push_point(toolpath: &mut CuttingToolPath, point: Point2D) {
    if toolpath.last() != Some(&point) {
        toolpath.push(point);
    }
}
