//! Template folder reader
//!
//! A template folder holds `info.txt` (dimensions and symmetry lists) and
//! `template_data.txt` (one exported block per line). The exporter works in a
//! z-up frame; everything is converted to y-up here, so the vertical axis of
//! every grid in this crate is the second coordinate.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::modules::{ModuleId, ModuleRegistry, SymmetryClass};
use crate::io::configuration::{
    AIR_MODULE, BASE_MODULE, FIELD_SEPARATOR, FOUR_WAY_KEY, INFO_FILE, TEMPLATE_FILE,
    TEMPLATE_SIZE_KEYS, TILE_SIZE_KEYS, TWO_WAY_KEY, UNFILLED_MODULE,
};
use crate::io::error::{Result, TilewaveError, file_system, malformed_artifact};
use crate::math::rotation::{Quaternion, Rotation};
use crate::spatial::grid::Grid3;

/// Parsed contents of `info.txt`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateInfo {
    /// Template extent in cells, `[x, y, z]` with y vertical
    pub dims: [usize; 3],
    /// Block edge length in export units, `[x, y, z]` with y vertical
    pub tile_size: [usize; 3],
    /// Types with four-way rotational symmetry
    pub four_way: Vec<String>,
    /// Types with two-way rotational symmetry
    pub two_way: Vec<String>,
}

impl TemplateInfo {
    /// Parse the `key:value` lines of an info file
    ///
    /// # Errors
    ///
    /// Returns `MalformedArtifact` for lines without a `:` separator, missing
    /// keys, or sizes that are not positive integers
    pub fn parse(path: &Path, contents: &str) -> Result<Self> {
        let mut entries = HashMap::new();
        for (number, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (key, value) = line
                .split_once(':')
                .ok_or_else(|| malformed_artifact(path, number + 1, &"expected 'key:value'"))?;
            entries.insert(key.trim().to_string(), value.trim().to_string());
        }

        let size = |key: &str| -> Result<usize> {
            let value = entries
                .get(key)
                .ok_or_else(|| malformed_artifact(path, 0, &format!("missing key '{key}'")))?;
            match value.parse::<usize>() {
                Ok(parsed) if parsed > 0 => Ok(parsed),
                _ => Err(malformed_artifact(
                    path,
                    0,
                    &format!("'{key}' must be a positive integer, got '{value}'"),
                )),
            }
        };
        let list = |key: &str| -> Vec<String> {
            entries
                .get(key)
                .map(|value| {
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|kind| !kind.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default()
        };

        let [template_x, template_y, template_z] = TEMPLATE_SIZE_KEYS;
        let [tile_x, tile_y, tile_z] = TILE_SIZE_KEYS;
        // The exporter's y and z are swapped relative to ours
        Ok(Self {
            dims: [size(template_x)?, size(template_z)?, size(template_y)?],
            tile_size: [size(tile_x)?, size(tile_z)?, size(tile_y)?],
            four_way: list(FOUR_WAY_KEY),
            two_way: list(TWO_WAY_KEY),
        })
    }

    /// Read and parse an info file
    ///
    /// # Errors
    ///
    /// Returns `FileSystem` if the file cannot be read, otherwise see [`Self::parse`]
    pub fn read(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).map_err(|source| file_system(path, "read", source))?;
        Self::parse(path, &contents)
    }

    /// Declared symmetry class of every listed type
    pub fn symmetry_classes(&self) -> Vec<(String, SymmetryClass)> {
        self.four_way
            .iter()
            .map(|kind| (kind.clone(), SymmetryClass::FourWay))
            .chain(
                self.two_way
                    .iter()
                    .map(|kind| (kind.clone(), SymmetryClass::TwoWay)),
            )
            .collect()
    }

    /// Registry holding the default modules, with symmetry classes declared
    pub fn seeded_registry(&self) -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        for (kind, class) in self.symmetry_classes() {
            registry.set_symmetry(&kind, class);
        }
        for kind in [AIR_MODULE, UNFILLED_MODULE, BASE_MODULE] {
            registry.identity_of(kind, Rotation::R0);
        }
        registry
    }
}

/// One exported block
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// Module type
    pub kind: String,
    /// Cell in y-up template coordinates
    pub cell: [usize; 3],
    /// Orientation about the vertical axis
    pub rotation: Rotation,
}

/// Parse one `name||x||y||z||w||qx||qy||qz` line
///
/// The name is cut at its first `.` so duplicated objects share a type.
///
/// # Errors
///
/// Returns `MalformedArtifact` for wrong field counts, unparsable numbers or
/// negative positions, and `InvalidRotation` for orientations that are not a
/// quarter turn about the vertical axis
pub fn parse_placement(
    path: &Path,
    line_number: usize,
    line: &str,
    tile_size: [usize; 3],
) -> Result<Placement> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();
    let [name, px, py, pz, w, qx, qy, qz] = *fields.as_slice() else {
        return Err(malformed_artifact(
            path,
            line_number,
            &format!("expected 8 fields, found {}", fields.len()),
        ));
    };

    let number = |field: &str, label: &str| -> Result<f64> {
        field.parse::<f64>().map_err(|error| {
            malformed_artifact(path, line_number, &format!("{label} '{field}': {error}"))
        })
    };

    let quaternion = Quaternion::new(
        number(w, "w")?,
        number(qx, "x")?,
        number(qy, "y")?,
        number(qz, "z")?,
    )
    .z_up_to_y_up();
    let rotation =
        quaternion
            .vertical_quarter_turn()
            .ok_or_else(|| TilewaveError::InvalidRotation {
                quaternion: quaternion.components(),
                location: format!("{} line {line_number}", path.display()),
            })?;

    // Exporter positions are z-up: its y is our z and its z is our y
    let [tile_x, tile_y, tile_z] = tile_size;
    let cell = [
        to_cell(number(px, "x position")?, tile_x),
        to_cell(number(pz, "z position")?, tile_y),
        to_cell(number(py, "y position")?, tile_z),
    ];
    let [Some(x), Some(y), Some(z)] = cell else {
        return Err(malformed_artifact(
            path,
            line_number,
            &format!("position ({px}, {py}, {pz}) is not a non-negative cell"),
        ));
    };

    let kind = name.split('.').next().unwrap_or(name).to_string();
    Ok(Placement {
        kind,
        cell: [x, y, z],
        rotation,
    })
}

fn to_cell(position: f64, tile_size: usize) -> Option<usize> {
    let rounded = position.round();
    if !rounded.is_finite() || rounded < 0.0 {
        return None;
    }
    (rounded as usize).checked_div(tile_size)
}

/// A template grid with the registry its ids refer to
#[derive(Clone, Debug)]
pub struct TemplateData {
    /// Template folder
    pub folder: PathBuf,
    /// Parsed info file
    pub info: TemplateInfo,
    /// Module id per cell; uncovered cells hold air
    pub grid: Grid3<ModuleId>,
    /// Registered modules, including every rotated variant seen so far
    pub registry: ModuleRegistry,
}

impl TemplateData {
    /// Build a template from already parsed placements
    ///
    /// # Errors
    ///
    /// Returns `MalformedArtifact` if a placement lies outside the template
    /// extent
    pub fn from_placements(
        folder: &Path,
        info: TemplateInfo,
        placements: impl IntoIterator<Item = (usize, Placement)>,
    ) -> Result<Self> {
        let mut registry = info.seeded_registry();
        let air = registry.identity_of(AIR_MODULE, Rotation::R0);
        let mut grid = Grid3::filled(info.dims, air);
        let template_path = folder.join(TEMPLATE_FILE);

        for (line_number, placement) in placements {
            let id = registry.identity_of(&placement.kind, placement.rotation);
            let Some(cell) = grid.get_mut(placement.cell) else {
                let [x, y, z] = placement.cell;
                return Err(malformed_artifact(
                    &template_path,
                    line_number,
                    &format!(
                        "cell ({x}, {y}, {z}) lies outside the template extent {:?}",
                        info.dims
                    ),
                ));
            };
            *cell = id;
            registry.record_placement(id)?;
        }

        tracing::info!(
            folder = %folder.display(),
            dims = ?info.dims,
            modules = registry.len(),
            "template loaded"
        );
        Ok(Self {
            folder: folder.to_path_buf(),
            info,
            grid,
            registry,
        })
    }

    /// Read `info.txt` and `template_data.txt` from a template folder
    ///
    /// # Errors
    ///
    /// Returns `FileSystem` for unreadable files, `MalformedArtifact` for
    /// unparsable lines and `InvalidRotation` for off-axis orientations
    pub fn read(folder: &Path) -> Result<Self> {
        let info = TemplateInfo::read(&folder.join(INFO_FILE))?;
        let template_path = folder.join(TEMPLATE_FILE);
        let contents = fs::read_to_string(&template_path)
            .map_err(|source| file_system(&template_path, "read", source))?;

        let placements = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                parse_placement(&template_path, index + 1, line, info.tile_size)
                    .map(|placement| (index + 1, placement))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_placements(folder, info, placements)
    }
}
