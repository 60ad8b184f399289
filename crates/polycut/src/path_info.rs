use crate::geometry::distance;
use crate::job::CuttingSettings;
use crate::types::Point2D;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Statistics about a cutting tool path.
#[derive(Debug, Clone)]
pub struct PathInfo<'a> {
    path: &'a [Point2D],
    settings: &'a CuttingSettings,
    base_filename: String,
}

/// Meta-information written next to a generated program (`.psj`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaInfo {
    pub version: u32,
    pub name: String,
    pub generated_by: String,
    pub gcode_filename: String,
    pub svg_filename: String,
    /// Estimated working time in whole seconds.
    pub duration: u64,
    pub creation_time: String,
    pub points_inside_workpiece: bool,
    pub workpiece_dim_x: f64,
    pub workpiece_dim_y: f64,
    pub speed: f64,
    pub flatness: f64,
    pub square: bool,
    pub margin: f64,
    pub machine_type: String,
    pub auto_close_path: bool,
}

impl<'a> PathInfo<'a> {
    pub fn new(path: &'a [Point2D], settings: &'a CuttingSettings, base_filename: &str) -> Self {
        Self {
            path,
            settings,
            base_filename: base_filename.to_string(),
        }
    }

    /// True if every point lies within the workpiece. An empty path is inside.
    pub fn is_path_inside_workpiece(&self) -> bool {
        self.path.iter().all(|&(x, y)| {
            (0.0..=self.settings.dim_x).contains(&x) && (0.0..=self.settings.dim_y).contains(&y)
        })
    }

    /// Length of the tool path (mm).
    pub fn length(&self) -> f64 {
        self.path
            .windows(2)
            .map(|segment| distance(segment[0], segment[1]))
            .sum()
    }

    /// Estimated working time in seconds, 0 when the speed is 0.
    pub fn working_time_sec(&self) -> f64 {
        if self.settings.speed == 0.0 {
            return 0.0;
        }
        self.length() / self.settings.speed * 60.0
    }

    /// Estimated working time in whole minutes, rounded up.
    pub fn working_time_min(&self) -> u64 {
        (self.working_time_sec() / 60.0).ceil() as u64
    }

    pub fn gcode_filename(&self) -> String {
        format!("{}.gcode", self.base_filename)
    }

    pub fn svg_filename(&self) -> String {
        format!("{}.svg", self.base_filename)
    }

    pub fn metainfo_filename(&self) -> String {
        format!("{}.psj", self.base_filename)
    }

    /// Preview of the tool path: the workpiece outline and the path as one polyline.
    ///
    /// Units are millimetres with the y axis pointing up, as on the machine.
    pub fn svg(&self) -> String {
        let (width, height) = (self.settings.dim_x, self.settings.dim_y);
        let points = self
            .path
            .iter()
            .map(|&(x, y)| format!("{x:.3},{y:.3}"))
            .collect::<Vec<_>>()
            .join(" ");

        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}mm\" height=\"{height}mm\" viewBox=\"0 0 {width} {height}\">\n"
        ));
        svg.push_str(&format!(
            "  <g transform=\"translate(0 {height}) scale(1 -1)\">\n"
        ));
        svg.push_str(&format!(
            "    <rect x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" fill=\"none\" stroke=\"#888888\" stroke-width=\"0.5\"/>\n"
        ));
        svg.push_str(&format!(
            "    <polyline points=\"{points}\" fill=\"none\" stroke=\"#ff0000\" stroke-width=\"0.5\"/>\n"
        ));
        svg.push_str("  </g>\n</svg>\n");
        svg
    }

    pub fn metainfo(&self) -> MetaInfo {
        MetaInfo {
            version: 1,
            name: self.settings.shape_name.clone(),
            generated_by: "2DPlugin".to_string(),
            gcode_filename: self.gcode_filename(),
            svg_filename: self.svg_filename(),
            duration: self.working_time_sec().ceil() as u64,
            creation_time: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            points_inside_workpiece: self.is_path_inside_workpiece(),
            workpiece_dim_x: self.settings.dim_x,
            workpiece_dim_y: self.settings.dim_y,
            speed: self.settings.speed,
            flatness: self.settings.flatness,
            square: self.settings.square,
            margin: self.settings.margin,
            machine_type: self.settings.machine.identifier().to_string(),
            auto_close_path: self.settings.auto_close_path,
        }
    }
}
