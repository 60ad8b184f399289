mod cutting;
mod engraving;
mod error;
mod geometry;
mod job;
mod machine;
mod output;
mod path_info;
mod postprocessor;
mod toolpath_generation;
mod types;
mod union;

pub use cutting::{generate_cutting_toolpath, HOME};
pub use engraving::{
    compute_headings, discretize_path, generate_engraving_toolpaths, merge_near_points,
};
pub use error::*;
pub use geometry::*;
pub use job::*;
pub use machine::Machine;
pub use output::{base_filename, default_output_dir, write_cutting_outputs, write_file};
pub use path_info::{MetaInfo, PathInfo};
pub use postprocessor::{post_process_cutting, post_process_engraving, EngravingPostSettings};
pub use toolpath_generation::*;
pub use types::*;
pub use union::unite_paths;

/// Initialize the tracing subscriber, logging to stderr at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Load the polylines of `job` and run its operation.
///
/// Path data is flattened first, at the flatness of the operation.
pub fn run_job(job: &Job) -> anyhow::Result<JobOutput> {
    let paths = job.polylines()?;
    let output = match &job.operation {
        Operation::Cutting(settings) => JobOutput::Cutting(generate_cutting_job(&paths, settings)?),
        Operation::Engraving(settings) => {
            JobOutput::Engraving(generate_engraving_job(&paths, settings))
        }
    };
    Ok(output)
}

/// Result of [`run_job`].
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutput {
    Cutting(CuttingOutput),
    Engraving(EngravingOutput),
}

impl JobOutput {
    pub fn gcode(&self) -> Option<&GCode> {
        match self {
            JobOutput::Cutting(output) => output.gcode.as_ref(),
            JobOutput::Engraving(output) => output.gcode.as_ref(),
        }
    }
}
