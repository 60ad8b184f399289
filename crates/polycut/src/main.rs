use anyhow::{bail, Context, Result};
use polycut::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

fn main() {
    if let Err(e) = init_logging() {
        eprintln!("Warning: could not initialize logging: {e}");
    }

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("");

    let result = match (command, args.get(2)) {
        ("cut" | "engrave", Some(job)) => run(command, Path::new(job), args.get(3).map(PathBuf::from)),
        ("machines", _) => {
            list_machines();
            Ok(())
        }
        _ => {
            println!("Usage: polycut [cut|engrave|machines] <job.json> [out_dir]");
            println!("  cut       - Generate a 2-axis cutting program, its SVG preview and .psj metadata");
            println!("  engrave   - Generate a 4-axis engraving program");
            println!("  machines  - List the supported machines");
            println!("\nThe output directory defaults to ~/PolyShaper.");
            return;
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(command: &str, job_path: &Path, out_dir: Option<PathBuf>) -> Result<()> {
    let job = Job::load_from_path(job_path)?;
    match (command, &job.operation) {
        ("cut", Operation::Cutting(_)) | ("engrave", Operation::Engraving(_)) => {}
        ("cut", _) => bail!("{} is not a cutting job", job_path.display()),
        _ => bail!("{} is not an engraving job", job_path.display()),
    }

    let output = run_job(&job).with_context(|| format!("run job {}", job_path.display()))?;
    let Some(gcode) = output.gcode() else {
        warn!("nothing to do, no program written");
        return Ok(());
    };
    let out_dir = resolve_output_dir(out_dir)?;

    match (&output, &job.operation) {
        (JobOutput::Cutting(cutting), Operation::Cutting(settings)) => {
            let toolpath = cutting.toolpath.as_deref().unwrap_or_default();
            let metainfo = write_cutting_outputs(&out_dir, toolpath, gcode, settings)?;
            info!(
                seconds = metainfo.duration,
                inside_workpiece = metainfo.points_inside_workpiece,
                "estimated working time"
            );
        }
        (JobOutput::Engraving(engraving), Operation::Engraving(settings)) => {
            let base = base_filename(&settings.file_name, &out_dir)?;
            write_file(out_dir.join(format!("{base}.gcode")), &gcode.to_text())?;
            info!(
                paths = engraving.toolpath.paths.len(),
                lines = gcode.lines.len(),
                "engraving program written"
            );
        }
        _ => bail!("job output does not match its operation"),
    }
    Ok(())
}

fn resolve_output_dir(out_dir: Option<PathBuf>) -> Result<PathBuf> {
    match out_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("create output directory {}", dir.display()))?;
            Ok(dir)
        }
        None => default_output_dir(),
    }
}

fn list_machines() {
    for machine in Machine::ALL {
        println!(
            "{:<18} {:<20} {:>6.0} x {:<6.0} mm",
            machine.identifier(),
            machine.name(),
            machine.working_area_width(),
            machine.working_area_height()
        );
    }
}
