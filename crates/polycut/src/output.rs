use crate::job::CuttingSettings;
use crate::path_info::{MetaInfo, PathInfo};
use crate::types::{GCode, Point2D};
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Return `<basename>-NNN`, the first name not clashing with generated files in `dir`.
///
/// Existing `<basename>-NNN.gcode`, `.psj` and `.svg` files are considered; the sequence
/// number is one past the highest one found, 000 if none exists.
pub fn base_filename<P: AsRef<Path>>(basename: &str, dir: P) -> Result<String> {
    let dir = dir.as_ref();
    let pattern = Regex::new(&format!(r"^{}-(\d{{3}})\.(gcode|psj|svg)$", regex::escape(basename)))
        .context("build file name pattern")?;

    let mut highest: Option<u32> = None;
    for entry in fs::read_dir(dir).with_context(|| format!("list directory {}", dir.display()))? {
        let entry = entry.with_context(|| format!("list directory {}", dir.display()))?;
        let name = entry.file_name();
        let Some(captures) = name.to_str().and_then(|name| pattern.captures(name)) else {
            continue;
        };
        let sequence: u32 = captures[1].parse().context("parse sequence number")?;
        highest = Some(highest.map_or(sequence, |current| current.max(sequence)));
    }

    let next = highest.map_or(0, |sequence| sequence + 1);
    Ok(format!("{basename}-{next:03}"))
}

/// Write `contents` to `path`.
pub fn write_file<P: AsRef<Path>>(path: P, contents: &str) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, contents).with_context(|| format!("write file {}", path.display()))?;
    info!(path = %path.display(), "wrote file");
    Ok(())
}

/// Write the program, its SVG preview and its `.psj` meta-information into `dir`.
///
/// The files share the next free `<shape_name>-NNN` base name; the written record is returned.
pub fn write_cutting_outputs<P: AsRef<Path>>(
    dir: P,
    toolpath: &[Point2D],
    gcode: &GCode,
    settings: &CuttingSettings,
) -> Result<MetaInfo> {
    let dir = dir.as_ref();
    let base = base_filename(&settings.shape_name, dir)?;
    let info = PathInfo::new(toolpath, settings, &base);
    let metainfo = info.metainfo();

    write_file(dir.join(info.gcode_filename()), &gcode.to_text())?;
    write_file(dir.join(info.svg_filename()), &info.svg())?;
    let record = serde_json::to_string_pretty(&metainfo).context("serialize meta-information")?;
    write_file(dir.join(info.metainfo_filename()), &record)?;

    Ok(metainfo)
}

/// Resolve the default output directory (`~/PolyShaper`), creating it if missing.
pub fn default_output_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("could not determine home directory"))?;
    let dir = home.join("PolyShaper");
    fs::create_dir_all(&dir)
        .with_context(|| format!("create output directory {}", dir.display()))?;
    Ok(dir)
}
