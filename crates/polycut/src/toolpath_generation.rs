use crate::cutting::generate_cutting_toolpath;
use crate::engraving::generate_engraving_toolpaths;
use crate::error::PolycutResult;
use crate::geometry::{close_path, Border};
use crate::job::{CuttingSettings, EngravingSettings};
use crate::path_info::PathInfo;
use crate::postprocessor::{post_process_cutting, post_process_engraving};
use crate::types::{CuttingToolPath, EngravingToolPath, GCode, Point2D};
use crate::union::unite_paths;
use tracing::{debug, warn};

/// Everything produced by a cutting job.
#[derive(Debug, Clone, PartialEq)]
pub struct CuttingOutput {
    /// The border squared around the pieces, if requested.
    pub border: Option<Border>,
    /// The tool path, `None` when there was nothing to cut.
    pub toolpath: Option<CuttingToolPath>,
    pub gcode: Option<GCode>,
}

/// Everything produced by an engraving job.
#[derive(Debug, Clone, PartialEq)]
pub struct EngravingOutput {
    pub toolpath: EngravingToolPath,
    /// The program, `None` when every path was empty.
    pub gcode: Option<GCode>,
}

/// Run the cutting pipeline: machine check, optional border, union, tool path and program.
///
/// Fails if the workpiece does not fit the machine or if a path is not closed (after
/// auto-closing, when enabled).
pub fn generate_cutting_job(
    paths: &[Vec<Point2D>],
    settings: &CuttingSettings,
) -> PolycutResult<CuttingOutput> {
    settings
        .machine
        .check_piece_dimensions(settings.dim_x, settings.dim_y)?;

    let mut paths = paths.to_vec();
    if settings.auto_close_path {
        for path in &mut paths {
            close_path(path, settings.close_distance);
        }
    }

    let border = settings
        .square
        .then(|| Border::new(&paths, settings.margin));

    let union = unite_paths(&paths, settings.close_distance)?;
    let toolpath = generate_cutting_toolpath(&union, settings.close_distance, border.as_ref())?;
    let gcode = toolpath
        .as_deref()
        .and_then(|toolpath| post_process_cutting(toolpath, settings.speed));

    if let Some(toolpath) = &toolpath {
        let info = PathInfo::new(toolpath, settings, &settings.shape_name);
        if !info.is_path_inside_workpiece() {
            warn!(
                dim_x = settings.dim_x,
                dim_y = settings.dim_y,
                "some points of the tool path lie outside the workpiece"
            );
        }
    }

    debug!(
        paths = paths.len(),
        machine = settings.machine.name(),
        has_program = gcode.is_some(),
        "cutting job done"
    );

    Ok(CuttingOutput {
        border,
        toolpath,
        gcode,
    })
}

/// Run the engraving pipeline: oriented tool paths and program.
pub fn generate_engraving_job(
    paths: &[Vec<Point2D>],
    settings: &EngravingSettings,
) -> EngravingOutput {
    let toolpath = generate_engraving_toolpaths(
        paths,
        settings.depth_z,
        settings.min_distance,
        settings.discretization_step(),
    );
    let gcode = post_process_engraving(&toolpath, &settings.post_settings());

    debug!(
        paths = paths.len(),
        has_program = gcode.is_some(),
        "engraving job done"
    );

    EngravingOutput { toolpath, gcode }
}
