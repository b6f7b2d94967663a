//! Pattern and module catalog files
//!
//! `patterns.txt` holds one `a,b,(dx, dy, dz)||frequency` line per pattern and
//! `modules.txt` one `Type||id||frequency||ROTATE_k` line per module, in id
//! order. Both are written by extraction and read back by generation.

use std::fs;
use std::path::Path;

use crate::catalog::modules::{ModuleId, ModuleRegistry, SymmetryClass};
use crate::catalog::patterns::{PatternCatalog, PatternKey};
use crate::io::configuration::FIELD_SEPARATOR;
use crate::io::error::{Result, TilewaveError, file_system, malformed_artifact};
use crate::math::rotation::Rotation;
use crate::spatial::neighborhood::Offset;

/// Render a catalog in artifact form
pub fn format_patterns(catalog: &PatternCatalog) -> String {
    catalog
        .iter()
        .map(|pattern| {
            format!(
                "{},{},{}{FIELD_SEPARATOR}{}\n",
                pattern.point_a, pattern.point_b, pattern.offset, pattern.frequency
            )
        })
        .collect()
}

/// Render a registry in artifact form
pub fn format_modules(registry: &ModuleRegistry) -> String {
    registry
        .iter()
        .map(|module| {
            format!(
                "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}\n",
                module.kind,
                module.id,
                module.frequency,
                module.rotation.artifact_name()
            )
        })
        .collect()
}

/// Write `patterns.txt`
///
/// # Errors
///
/// Returns `FileSystem` if the file cannot be written
pub fn write_patterns(path: &Path, catalog: &PatternCatalog) -> Result<()> {
    fs::write(path, format_patterns(catalog)).map_err(|source| file_system(path, "write", source))
}

/// Write `modules.txt`
///
/// # Errors
///
/// Returns `FileSystem` if the file cannot be written
pub fn write_modules(path: &Path, registry: &ModuleRegistry) -> Result<()> {
    fs::write(path, format_modules(registry)).map_err(|source| file_system(path, "write", source))
}

/// Parse the contents of a patterns file
///
/// Repeated keys are summed.
///
/// # Errors
///
/// Returns `MalformedArtifact` naming the 1-based line of the first record
/// that does not parse or whose offset is outside the neighbourhood
pub fn parse_patterns(path: &Path, contents: &str) -> Result<PatternCatalog> {
    let mut catalog = PatternCatalog::new();
    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_number = index + 1;
        let malformed = |reason: &str| malformed_artifact(path, line_number, &reason);

        let (key, frequency) = line
            .rsplit_once(FIELD_SEPARATOR)
            .ok_or_else(|| malformed("expected 'key||frequency'"))?;
        let frequency = frequency
            .trim()
            .parse::<usize>()
            .map_err(|error| malformed(&format!("frequency '{}': {error}", frequency.trim())))?;

        let fields: Vec<&str> = key.split(',').map(str::trim).collect();
        let [point_a, point_b, dx, dy, dz] = *fields.as_slice() else {
            return Err(malformed(&format!(
                "expected 'a,b,(dx, dy, dz)', found {} fields",
                fields.len()
            )));
        };
        let (Some(dx), Some(dz)) = (dx.strip_prefix('('), dz.strip_suffix(')')) else {
            return Err(malformed("offset must be parenthesised"));
        };

        let id = |field: &str| {
            field
                .trim()
                .parse::<usize>()
                .map(ModuleId)
                .map_err(|error| malformed(&format!("module id '{field}': {error}")))
        };
        let component = |field: &str| {
            field
                .trim()
                .parse::<i32>()
                .map_err(|error| malformed(&format!("offset component '{field}': {error}")))
        };

        let offset = Offset::new(component(dx)?, component(dy)?, component(dz)?);
        if !offset.is_sampled() {
            return Err(malformed(&format!(
                "offset {offset} is not in the 18-direction neighbourhood"
            )));
        }
        catalog.record(PatternKey::new(id(point_a)?, id(point_b)?, offset), frequency)?;
    }
    Ok(catalog)
}

/// Parse the contents of a modules file
///
/// Symmetry classes are not stored in the file, so they are supplied by the
/// caller (usually from the template's info file).
///
/// # Errors
///
/// Returns `MalformedArtifact` naming the 1-based line of the first record
/// that does not parse, including ids out of sequence and duplicates
pub fn parse_modules(
    path: &Path,
    contents: &str,
    symmetry: &[(String, SymmetryClass)],
) -> Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    for (kind, class) in symmetry {
        registry.set_symmetry(kind, *class);
    }

    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_number = index + 1;
        let malformed = |reason: &str| malformed_artifact(path, line_number, &reason);

        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();
        let [kind, id, frequency, rotation] = *fields.as_slice() else {
            return Err(malformed(&format!(
                "expected 'Type||id||frequency||rotation', found {} fields",
                fields.len()
            )));
        };

        let id = id
            .parse::<usize>()
            .map_err(|error| malformed(&format!("id '{id}': {error}")))?;
        let frequency = frequency
            .parse::<usize>()
            .map_err(|error| malformed(&format!("frequency '{frequency}': {error}")))?;
        let rotation = rotation.parse::<Rotation>().map_err(|error| malformed(&error))?;

        registry
            .insert_record(kind, ModuleId(id), frequency, rotation)
            .map_err(|error| match error {
                TilewaveError::InvalidSourceData { reason } => malformed(&reason),
                other => other,
            })?;
    }
    Ok(registry)
}

/// Read `patterns.txt`
///
/// # Errors
///
/// Returns `FileSystem` if the file cannot be read, otherwise see [`parse_patterns`]
pub fn read_patterns(path: &Path) -> Result<PatternCatalog> {
    let contents = fs::read_to_string(path).map_err(|source| file_system(path, "read", source))?;
    let catalog = parse_patterns(path, &contents)?;
    tracing::debug!(path = %path.display(), patterns = catalog.len(), "patterns read");
    Ok(catalog)
}

/// Read `modules.txt`
///
/// # Errors
///
/// Returns `FileSystem` if the file cannot be read, otherwise see [`parse_modules`]
pub fn read_modules(path: &Path, symmetry: &[(String, SymmetryClass)]) -> Result<ModuleRegistry> {
    let contents = fs::read_to_string(path).map_err(|source| file_system(path, "read", source))?;
    let registry = parse_modules(path, &contents, symmetry)?;
    tracing::debug!(path = %path.display(), modules = registry.len(), "modules read");
    Ok(registry)
}
