//! Generated level export
//!
//! One `x||y||z||id||Type||ROTATE_k` line per placed block. Air cells are
//! omitted and cells the solver left ambiguous are written with the
//! `Unfilled` type and `-` in place of an id.

use std::fs;
use std::path::Path;

use crate::algorithm::executor::GeneratedGrid;
use crate::catalog::modules::ModuleRegistry;
use crate::io::configuration::{AIR_MODULE, FIELD_SEPARATOR, UNFILLED_MODULE};
use crate::io::error::{Result, file_system};
use crate::math::rotation::Rotation;

/// Counts from one export
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Lines naming a concrete module
    pub placed: usize,
    /// Lines for unfilled cells
    pub unfilled: usize,
    /// Air cells that produced no line
    pub air: usize,
}

/// Render a generated grid in level form
///
/// # Errors
///
/// Returns `UnknownModule` if a cell holds an id the registry does not know
pub fn format_level(grid: &GeneratedGrid, registry: &ModuleRegistry) -> Result<(String, ExportSummary)> {
    let air = registry.find(AIR_MODULE, Rotation::R0);
    let mut out = String::new();
    let mut summary = ExportSummary::default();

    for ([x, y, z], module) in grid.placements() {
        match module {
            Some(id) if Some(id) == air => summary.air += 1,
            Some(id) => {
                let module = registry.get(id)?;
                out.push_str(&format!(
                    "{x}{FIELD_SEPARATOR}{y}{FIELD_SEPARATOR}{z}{FIELD_SEPARATOR}{id}\
                     {FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}\n",
                    module.kind,
                    module.rotation.artifact_name()
                ));
                summary.placed += 1;
            }
            None => {
                out.push_str(&format!(
                    "{x}{FIELD_SEPARATOR}{y}{FIELD_SEPARATOR}{z}{FIELD_SEPARATOR}-\
                     {FIELD_SEPARATOR}{UNFILLED_MODULE}{FIELD_SEPARATOR}{}\n",
                    Rotation::R0.artifact_name()
                ));
                summary.unfilled += 1;
            }
        }
    }

    Ok((out, summary))
}

/// Write a generated grid to `path`
///
/// # Errors
///
/// Returns `UnknownModule` for unregistered ids and `FileSystem` if the file
/// cannot be written
pub fn write_level(path: &Path, grid: &GeneratedGrid, registry: &ModuleRegistry) -> Result<ExportSummary> {
    let (contents, summary) = format_level(grid, registry)?;
    fs::write(path, contents).map_err(|source| file_system(path, "write", source))?;
    tracing::info!(
        path = %path.display(),
        placed = summary.placed,
        unfilled = summary.unfilled,
        "level written"
    );
    Ok(summary)
}
