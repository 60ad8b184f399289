use serde::{Deserialize, Serialize};

/// A point in machine coordinates, in millimetres.
pub type Point2D = (f64, f64);

/// The flat tool path of the cutting machine.
///
/// Starts and ends at machine home and never contains two identical consecutive points.
pub type CuttingToolPath = Vec<Point2D>;

/// One oriented position of the engraving tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedWaypoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Cumulative tool heading in radians. Not wrapped to [0, 2π).
    pub theta: f64,
}

impl OrientedWaypoint {
    pub fn new(x: f64, y: f64, z: f64, theta: f64) -> Self {
        Self { x, y, z, theta }
    }

    /// The planar position of the waypoint.
    pub fn position(&self) -> Point2D {
        (self.x, self.y)
    }
}

impl From<(f64, f64, f64, f64)> for OrientedWaypoint {
    fn from((x, y, z, theta): (f64, f64, f64, f64)) -> Self {
        Self::new(x, y, z, theta)
    }
}

/// Independent oriented waypoint sequences, one per input path.
///
/// The tool is lifted between entries; nothing joins consecutive sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngravingToolPath {
    pub paths: Vec<Vec<OrientedWaypoint>>,
}

impl EngravingToolPath {
    /// True when no sequence contains a waypoint.
    pub fn is_empty(&self) -> bool {
        self.paths.iter().all(|path| path.is_empty())
    }
}

/// Represents the final, machine-specific G-code output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GCode {
    /// A list of G-code command strings.
    pub lines: Vec<String>,
}

impl GCode {
    /// The program text: every line terminated by a newline.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }
}

impl std::fmt::Display for GCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}
