use crate::geometry::flatten_svg_path;
use crate::machine::Machine;
use crate::postprocessor::EngravingPostSettings;
use crate::types::Point2D;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings of a 2-axis cutting job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CuttingSettings {
    /// Name of the shape, also the base name of the generated files.
    pub shape_name: String,
    /// Workpiece width (mm).
    pub dim_x: f64,
    /// Workpiece height (mm).
    pub dim_y: f64,
    /// Cutting speed (mm/min).
    pub speed: f64,
    /// Flattening tolerance for curved path data (mm).
    pub flatness: f64,
    /// Cut along the border of the pieces at the end of the job.
    pub square: bool,
    /// Margin between the pieces and the border (mm).
    pub margin: f64,
    pub machine: Machine,
    /// Close open paths by joining their end with their start.
    pub auto_close_path: bool,
    /// Endpoints closer than this make a path closed (mm).
    pub close_distance: f64,
}

impl Default for CuttingSettings {
    fn default() -> Self {
        Self {
            shape_name: "my shape".to_string(),
            dim_x: 200.0,
            dim_y: 200.0,
            speed: 500.0,
            flatness: 0.1,
            square: false,
            margin: 0.0,
            machine: Machine::P400,
            auto_close_path: true,
            close_distance: 0.5,
        }
    }
}

/// Settings of a 4-axis engraving job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngravingSettings {
    /// Base name of the generated program.
    pub file_name: String,
    pub dim_x: f64,
    pub dim_y: f64,
    /// Engraving depth (mm).
    pub depth_z: f64,
    pub mm_per_degree: f64,
    /// Points nearer than this are merged (mm).
    pub min_distance: f64,
    pub safe_z: f64,
    pub small_distance: f64,
    /// Radians.
    pub small_angle: f64,
    /// Maximum segment length (mm), `null` disables discretization.
    pub discretization_step: Option<f64>,
    pub flatness: f64,
}

impl Default for EngravingSettings {
    fn default() -> Self {
        Self {
            file_name: "polyshaper".to_string(),
            dim_x: 200.0,
            dim_y: 200.0,
            depth_z: 10.0,
            mm_per_degree: 18.0,
            min_distance: 0.01,
            safe_z: 10.0,
            small_distance: 5.0,
            small_angle: 189f64.to_radians(),
            discretization_step: Some(2.0),
            flatness: 1.0,
        }
    }
}

impl EngravingSettings {
    /// The discretization step, infinite when disabled.
    pub fn discretization_step(&self) -> f64 {
        self.discretization_step.unwrap_or(f64::INFINITY)
    }

    pub fn post_settings(&self) -> EngravingPostSettings {
        EngravingPostSettings {
            mm_per_degree: self.mm_per_degree,
            safe_z: self.safe_z,
            small_distance: self.small_distance,
            small_angle: self.small_angle,
        }
    }
}

/// What a job produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Cutting(CuttingSettings),
    Engraving(EngravingSettings),
}

/// One input path of a job, in millimetre machine coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobPath {
    /// An already flat polyline, `[[x, y], ...]`.
    Polyline(Vec<Point2D>),
    /// SVG path data, flattened at the operation's flatness.
    PathData(String),
}

/// A job file: the operation with its settings and the geometry to process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub operation: Operation,
    #[serde(default)]
    pub paths: Vec<JobPath>,
}

impl Job {
    /// Load a job from a JSON file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).with_context(|| format!("read job {}", path.display()))?;
        let job: Job = serde_json::from_slice(&data)
            .with_context(|| format!("deserialize job {}", path.display()))?;
        Ok(job)
    }

    /// Persist the job as pretty JSON.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let data = serde_json::to_vec_pretty(self).context("serialize job to JSON bytes")?;
        fs::write(path, data).with_context(|| format!("write job {}", path.display()))
    }

    /// Flattening tolerance of the operation.
    pub fn flatness(&self) -> f64 {
        match &self.operation {
            Operation::Cutting(settings) => settings.flatness,
            Operation::Engraving(settings) => settings.flatness,
        }
    }

    /// All input paths as polylines; path data may yield several polylines each.
    pub fn polylines(&self) -> Result<Vec<Vec<Point2D>>> {
        let flatness = self.flatness();
        let mut polylines = Vec::new();
        for path in &self.paths {
            match path {
                JobPath::Polyline(points) => polylines.push(points.clone()),
                JobPath::PathData(data) => polylines.extend(flatten_svg_path(data, flatness)?),
            }
        }
        Ok(polylines)
    }
}
