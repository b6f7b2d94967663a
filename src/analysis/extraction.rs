//! Pattern extraction from a template grid
//!
//! Every in-bounds cell pair along the sampled neighbourhood is one
//! observation. The template is scanned as given and in its three quarter-turn
//! rotations, with module ids remapped through the registry, and the four
//! frequency tables are summed.

use crate::catalog::modules::{ModuleId, ModuleRegistry};
use crate::catalog::patterns::{PatternCatalog, PatternKey};
use crate::io::error::Result;
use crate::math::rotation::Rotation;
use crate::spatial::grid::Grid3;

/// Template grid of module ids
pub type Template = Grid3<ModuleId>;

/// Record every adjacency observation of a single template orientation
///
/// # Errors
///
/// Propagates catalog insertion failures (only possible for offsets outside
/// the neighbourhood, which this scan never produces)
pub fn extract_patterns(template: &Template) -> Result<PatternCatalog> {
    let mut catalog = PatternCatalog::new();
    for (coord, &point_a) in template.indexed_iter() {
        for (offset, neighbor) in template.neighbors(coord) {
            if let Some(&point_b) = template.get(neighbor) {
                catalog.record(PatternKey::new(point_a, point_b, offset), 1)?;
            }
        }
    }
    Ok(catalog)
}

/// Rotate a template about the vertical axis and remap every module id
///
/// New `(type, rotation)` variants are registered as they are encountered.
///
/// # Errors
///
/// Returns `UnknownModule` if the template references an unregistered id
pub fn rotate_template(
    template: &Template,
    rotation: Rotation,
    registry: &mut ModuleRegistry,
) -> Result<Template> {
    let mut rotated = template.rotated(rotation);
    let mut failure = None;
    rotated.for_each_mut(|_, id| {
        if failure.is_some() {
            return;
        }
        match registry.rotate_module(*id, rotation) {
            Ok(new_id) => *id = new_id,
            Err(error) => failure = Some(error),
        }
    });

    match failure {
        Some(error) => Err(error),
        None => Ok(rotated),
    }
}

/// Learns a pattern catalog from a template, folding in its rotations
pub struct PatternExtractor<'a> {
    registry: &'a mut ModuleRegistry,
}

impl<'a> PatternExtractor<'a> {
    /// Create an extractor that registers rotated variants in `registry`
    pub const fn new(registry: &'a mut ModuleRegistry) -> Self {
        Self { registry }
    }

    /// Extract and merge the patterns of all four template orientations
    ///
    /// # Errors
    ///
    /// Returns `UnknownModule` if the template references an unregistered id
    pub fn extract(&mut self, template: &Template) -> Result<PatternCatalog> {
        let mut merged = extract_patterns(template)?;
        tracing::info!(
            dims = ?template.dims(),
            patterns = merged.len(),
            "extracted base orientation"
        );

        for rotation in [Rotation::R90, Rotation::R180, Rotation::R270] {
            let rotated = rotate_template(template, rotation, self.registry)?;
            let table = extract_patterns(&rotated)?;
            tracing::debug!(
                %rotation,
                patterns = table.len(),
                observations = table.total_observations(),
                modules = self.registry.len(),
                "extracted rotated orientation"
            );
            merged.merge(&table)?;
        }

        tracing::info!(
            patterns = merged.len(),
            observations = merged.total_observations(),
            modules = self.registry.len(),
            "pattern catalog merged"
        );
        Ok(merged)
    }
}
