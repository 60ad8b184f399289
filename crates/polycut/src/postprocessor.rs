use crate::geometry::distance;
use crate::types::{EngravingToolPath, GCode, OrientedWaypoint, Point2D};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Feed rate line of every engraving program.
const ENGRAVING_FEED: &str = "G01 F300";

/// Parameters of the engraving post-processor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngravingPostSettings {
    /// Rotation axis scale: the axis value is `degrees(theta) / mm_per_degree`.
    pub mm_per_degree: f64,
    /// Z of every retract.
    pub safe_z: f64,
    /// Moves shorter than this may be combined with a rotation (mm).
    pub small_distance: f64,
    /// Rotations smaller than this may be combined with a move (radians).
    pub small_angle: f64,
}

/// Convert a cutting tool path to G-code.
///
/// Returns `None` for an empty path.
pub fn post_process_cutting(path: &[Point2D], speed: f64) -> Option<GCode> {
    if path.is_empty() {
        return None;
    }

    let mut lines = Vec::with_capacity(path.len() + 3);
    lines.push("M3".to_string()); // Spindle on
    lines.push(format!("G01 F{}", coord(speed)));

    for &(x, y) in path {
        lines.push(format!("G01 X{} Y{}", coord(x), coord(y)));
    }

    lines.push("M5".to_string()); // Spindle off

    debug!(lines = lines.len(), "post-processed cutting tool path");
    Some(GCode { lines })
}

/// Convert engraving tool paths to G-code for the 4-axis machine.
///
/// The rotation axis is driven as the `E` axis. Small moves with small rotations are merged
/// into a single line so engraving is continuous; larger ones are split into a positional line
/// followed by a rotation-only line so the controller never moves both a lot at once.
///
/// Returns `None` when every path is empty.
pub fn post_process_engraving(
    toolpath: &EngravingToolPath,
    settings: &EngravingPostSettings,
) -> Option<GCode> {
    if toolpath.is_empty() {
        return None;
    }

    let rotation = |waypoint: &OrientedWaypoint| waypoint.theta.to_degrees() / settings.mm_per_degree;

    let mut lines = Vec::new();
    lines.push("M3".to_string());
    lines.push(ENGRAVING_FEED.to_string());
    lines.push(format!("G00 Z{}", coord(settings.safe_z)));

    for path in toolpath.paths.iter().filter(|path| !path.is_empty()) {
        // Entry move and plunge
        let start = &path[0];
        lines.push(format!(
            "G00 X{} Y{} E{}",
            coord(start.x),
            coord(start.y),
            coord(rotation(start))
        ));
        lines.push(format!("G01 Z{}", coord(start.z)));

        for pair in path.windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);
            let linear = distance(previous.position(), current.position());
            let angular = (current.theta - previous.theta).abs();
            let heading_changed = current.theta != previous.theta;

            let position = format!(
                "G01 X{} Y{} Z{}",
                coord(current.x),
                coord(current.y),
                coord(current.z)
            );

            if linear < settings.small_distance && angular < settings.small_angle {
                if heading_changed {
                    lines.push(format!("{position} E{}", coord(rotation(current))));
                } else {
                    lines.push(position);
                }
            } else {
                lines.push(position);
                if heading_changed {
                    lines.push(format!("G01 E{}", coord(rotation(current))));
                }
            }
        }

        // Exit move
        lines.push(format!("G01 Z{}", coord(settings.safe_z)));
    }

    // Back home
    lines.push(format!("G00 X{} Y{} E{}", coord(0.0), coord(0.0), coord(0.0)));
    lines.push(format!("G00 Z{}", coord(0.0)));
    lines.push("M5".to_string());

    debug!(lines = lines.len(), "post-processed engraving tool paths");
    Some(GCode { lines })
}

/// Fixed three-decimal rendering of a value, without a negative zero.
fn coord(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.3}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MM_PER_DEGREE: f64 = 18.0;

    fn settings(safe_z: f64, small_distance: f64, small_angle: f64) -> EngravingPostSettings {
        EngravingPostSettings {
            mm_per_degree: MM_PER_DEGREE,
            safe_z,
            small_distance,
            small_angle,
        }
    }

    fn toolpath(paths: Vec<Vec<(f64, f64, f64, f64)>>) -> EngravingToolPath {
        EngravingToolPath {
            paths: paths
                .into_iter()
                .map(|path| path.into_iter().map(OrientedWaypoint::from).collect())
                .collect(),
        }
    }

    fn e(angle: f64) -> String {
        format!("{:.3}", angle.to_degrees() / MM_PER_DEGREE)
    }

    #[test]
    fn test_cutting_empty_path() {
        assert_eq!(post_process_cutting(&[], 313.0), None);
    }

    #[test]
    fn test_cutting_single_point() {
        let gcode = post_process_cutting(&[(1.0, 2.0)], 313.0).unwrap();
        assert_eq!(gcode.to_text(), "M3\nG01 F313.000\nG01 X1.000 Y2.000\nM5\n");
    }

    #[test]
    fn test_cutting_multiple_points() {
        let path = [(1.0, 2.0), (3.0, 4.0), (5.0, 6.0), (7.0, 8.0), (9.0, 0.0)];
        let gcode = post_process_cutting(&path, 313.0).unwrap();
        assert_eq!(
            gcode.lines,
            vec![
                "M3",
                "G01 F313.000",
                "G01 X1.000 Y2.000",
                "G01 X3.000 Y4.000",
                "G01 X5.000 Y6.000",
                "G01 X7.000 Y8.000",
                "G01 X9.000 Y0.000",
                "M5"
            ]
        );
    }

    #[test]
    fn test_engraving_without_waypoints() {
        let settings = settings(10.0, 2.0, 30f64.to_radians());
        assert_eq!(post_process_engraving(&toolpath(vec![]), &settings), None);
        assert_eq!(
            post_process_engraving(&toolpath(vec![vec![], vec![], vec![]]), &settings),
            None
        );
    }

    #[test]
    fn test_engraving_single_point() {
        let gcode = post_process_engraving(
            &toolpath(vec![vec![(1.0, 2.0, 3.0, 0.0)]]),
            &settings(17.0, 2.0, 30f64.to_radians()),
        )
        .unwrap();
        assert_eq!(
            gcode.to_text(),
            "M3\n\
             G01 F300\n\
             G00 Z17.000\n\
             G00 X1.000 Y2.000 E0.000\n\
             G01 Z3.000\n\
             G01 Z17.000\n\
             G00 X0.000 Y0.000 E0.000\n\
             G00 Z0.000\n\
             M5\n"
        );
    }

    #[test]
    fn test_engraving_distant_points_split_moves() {
        let gcode = post_process_engraving(
            &toolpath(vec![vec![
                (100.0, 200.0, 300.0, 0.3),
                (1000.0, 2000.0, 3200.0, 1.5),
                (4500.0, 3300.0, 8700.0, 1.2),
                (6400.0, 7700.0, 6200.0, 2.5),
                (0.0, 3200.0, 4400.0, 0.0),
            ]]),
            &settings(57.0, 2.0, 30f64.to_radians()),
        )
        .unwrap();
        let expected = vec![
            "M3".to_string(),
            "G01 F300".to_string(),
            "G00 Z57.000".to_string(),
            format!("G00 X100.000 Y200.000 E{}", e(0.3)),
            "G01 Z300.000".to_string(),
            "G01 X1000.000 Y2000.000 Z3200.000".to_string(),
            format!("G01 E{}", e(1.5)),
            "G01 X4500.000 Y3300.000 Z8700.000".to_string(),
            format!("G01 E{}", e(1.2)),
            "G01 X6400.000 Y7700.000 Z6200.000".to_string(),
            format!("G01 E{}", e(2.5)),
            "G01 X0.000 Y3200.000 Z4400.000".to_string(),
            "G01 E0.000".to_string(),
            "G01 Z57.000".to_string(),
            "G00 X0.000 Y0.000 E0.000".to_string(),
            "G00 Z0.000".to_string(),
            "M5".to_string(),
        ];
        assert_eq!(gcode.lines, expected);
    }

    #[test]
    fn test_engraving_multiple_paths() {
        let gcode = post_process_engraving(
            &toolpath(vec![
                vec![
                    (100.0, 200.0, 300.0, 0.3),
                    (1000.0, 2000.0, 3200.0, 1.5),
                    (500.0, 500.0, 500.0, 0.0),
                ],
                vec![],
                vec![
                    (4500.0, 3300.0, 8700.0, 1.2),
                    (6400.0, 7700.0, 6200.0, 2.5),
                    (0.0, 3200.0, 4400.0, 0.0),
                ],
            ]),
            &settings(33.0, 2.0, 30f64.to_radians()),
        )
        .unwrap();
        let expected = vec![
            "M3".to_string(),
            "G01 F300".to_string(),
            "G00 Z33.000".to_string(),
            format!("G00 X100.000 Y200.000 E{}", e(0.3)),
            "G01 Z300.000".to_string(),
            "G01 X1000.000 Y2000.000 Z3200.000".to_string(),
            format!("G01 E{}", e(1.5)),
            "G01 X500.000 Y500.000 Z500.000".to_string(),
            "G01 E0.000".to_string(),
            "G01 Z33.000".to_string(),
            format!("G00 X4500.000 Y3300.000 E{}", e(1.2)),
            "G01 Z8700.000".to_string(),
            "G01 X6400.000 Y7700.000 Z6200.000".to_string(),
            format!("G01 E{}", e(2.5)),
            "G01 X0.000 Y3200.000 Z4400.000".to_string(),
            "G01 E0.000".to_string(),
            "G01 Z33.000".to_string(),
            "G00 X0.000 Y0.000 E0.000".to_string(),
            "G00 Z0.000".to_string(),
            "M5".to_string(),
        ];
        assert_eq!(gcode.lines, expected);
    }

    #[test]
    fn test_engraving_near_points_are_combined() {
        let gcode = post_process_engraving(
            &toolpath(vec![vec![
                (100.0, 200.0, 300.0, 0.3),
                (110.0, 200.0, 300.0, 0.5),
                (105.0, 205.0, 300.0, 1.2),
                (106.0, 206.0, 300.0, 1.3),
                (107.0, 206.0, 300.0, 1.3),
                (200.0, 100.0, 300.0, 1.3),
                (0.0, 0.0, 300.0, 0.0),
            ]]),
            &settings(57.0, 20.0, 0.5),
        )
        .unwrap();
        let expected = vec![
            "M3".to_string(),
            "G01 F300".to_string(),
            "G00 Z57.000".to_string(),
            format!("G00 X100.000 Y200.000 E{}", e(0.3)),
            "G01 Z300.000".to_string(),
            format!("G01 X110.000 Y200.000 Z300.000 E{}", e(0.5)),
            "G01 X105.000 Y205.000 Z300.000".to_string(),
            format!("G01 E{}", e(1.2)),
            format!("G01 X106.000 Y206.000 Z300.000 E{}", e(1.3)),
            "G01 X107.000 Y206.000 Z300.000".to_string(),
            "G01 X200.000 Y100.000 Z300.000".to_string(),
            "G01 X0.000 Y0.000 Z300.000".to_string(),
            "G01 E0.000".to_string(),
            "G01 Z57.000".to_string(),
            "G00 X0.000 Y0.000 E0.000".to_string(),
            "G00 Z0.000".to_string(),
            "M5".to_string(),
        ];
        assert_eq!(gcode.lines, expected);
    }

    #[test]
    fn test_negative_zero_is_not_rendered() {
        assert_eq!(coord(-0.0), "0.000");
        assert_eq!(coord(-1.5), "-1.500");
        assert_eq!(coord(2.0 / 3.0), "0.667");
    }
}
