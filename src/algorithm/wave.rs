//! Per-cell possibility state for the solver
//!
//! Every cell keeps the set of patterns still possible there (the wave) and a
//! cached projection of that set onto module ids. Each mutation in this module
//! keeps the projection exact.

use crate::algorithm::bitset::Membership;
use crate::catalog::modules::ModuleId;
use crate::catalog::patterns::PatternCatalog;
use crate::io::error::{Result, TilewaveError};
use crate::spatial::grid::{Coord, Grid3};

/// Possibility state of one output cell
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellState {
    /// Pattern indices still possible at this cell
    pub patterns: Membership,
    /// Module ids still possible at this cell
    pub modules: Membership,
}

impl CellState {
    /// Number of patterns still possible
    pub fn entropy(&self) -> usize {
        self.patterns.count()
    }

    /// Whether the wave has been reduced to a single pattern
    pub fn is_collapsed(&self) -> bool {
        self.patterns.count() == 1
    }

    /// Whether no possibility remains
    pub fn is_contradiction(&self) -> bool {
        self.patterns.is_empty() || self.modules.is_empty()
    }
}

/// Wave state over the whole output grid
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wave {
    cells: Grid3<CellState>,
    pattern_count: usize,
    module_count: usize,
}

impl Wave {
    /// Create a wave where every pattern is possible everywhere
    ///
    /// Permissible modules start as the `point_a` projection of the full
    /// catalog, so modules no pattern starts from are never offered.
    pub fn new(dims: [usize; 3], catalog: &PatternCatalog, module_count: usize) -> Self {
        let pattern_count = catalog.len();
        let modules = Membership::from_indices(
            catalog.iter().map(|pattern| pattern.point_a.index()),
            module_count,
        );
        let initial = CellState {
            patterns: Membership::all(pattern_count),
            modules,
        };

        Self {
            cells: Grid3::filled(dims, initial),
            pattern_count,
            module_count,
        }
    }

    /// Grid dimensions `[x, y, z]`
    pub fn dims(&self) -> [usize; 3] {
        self.cells.dims()
    }

    /// Number of patterns in the catalog this wave was built from
    pub const fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Number of module ids tracked per cell
    pub const fn module_count(&self) -> usize {
        self.module_count
    }

    /// Borrow the grid of cell states
    pub const fn cells(&self) -> &Grid3<CellState> {
        &self.cells
    }

    /// Borrow one cell
    pub fn cell(&self, coord: Coord) -> Option<&CellState> {
        self.cells.get(coord)
    }

    /// Mutably borrow one cell
    pub fn cell_mut(&mut self, coord: Coord) -> Option<&mut CellState> {
        self.cells.get_mut(coord)
    }

    /// Reduce a cell to exactly one pattern and its `point_a`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the coordinate or pattern index is out of
    /// range
    pub fn collapse_to(
        &mut self,
        coord: Coord,
        pattern_index: usize,
        catalog: &PatternCatalog,
    ) -> Result<ModuleId> {
        let point_a = catalog
            .pattern(pattern_index)
            .map(|pattern| pattern.point_a)
            .ok_or_else(|| {
                crate::io::error::invalid_parameter(
                    "pattern_index",
                    &pattern_index,
                    &"outside the pattern catalog",
                )
            })?;
        let cell = self.cell_or_error(coord)?;

        cell.patterns.clear();
        cell.patterns.insert(pattern_index);
        cell.modules.clear();
        cell.modules.insert(point_a.index());
        Ok(point_a)
    }

    /// Restrict a cell to the patterns that start from `module`
    ///
    /// # Errors
    ///
    /// Returns `Contradiction` if `module` is no longer possible at the cell
    pub fn force_module(
        &mut self,
        coord: Coord,
        module: ModuleId,
        catalog: &PatternCatalog,
    ) -> Result<()> {
        let cell = self.cell_or_error(coord)?;
        let mut remaining = Membership::new(cell.patterns.capacity());
        for index in cell.patterns.iter() {
            if catalog
                .pattern(index)
                .is_some_and(|pattern| pattern.point_a == module)
            {
                remaining.insert(index);
            }
        }

        if remaining.is_empty() || !cell.modules.contains(module.index()) {
            return Err(TilewaveError::Contradiction {
                position: coord,
                iteration: 0,
                module: Some(module),
            });
        }

        cell.patterns = remaining;
        cell.modules.clear();
        cell.modules.insert(module.index());
        Ok(())
    }

    /// Overwrite every column with the state of column `(source_x, ·, source_z)`
    pub fn replicate_column(&mut self, source_x: usize, source_z: usize) {
        let column: Vec<Option<CellState>> = (0..self.cells.size_y())
            .map(|y| self.cells.get([source_x, y, source_z]).cloned())
            .collect();

        self.cells.for_each_mut(|[_, y, _], cell| {
            if let Some(Some(source)) = column.get(y) {
                cell.clone_from(source);
            }
        });
    }

    /// Module ids named by the wave at a cell, in ascending order
    pub fn modules_in_wave(&self, coord: Coord, catalog: &PatternCatalog) -> Vec<ModuleId> {
        let mut ids: Vec<ModuleId> = self
            .cells
            .get(coord)
            .map(|cell| {
                cell.patterns
                    .iter()
                    .filter_map(|index| catalog.pattern(index).map(|pattern| pattern.point_a))
                    .collect()
            })
            .unwrap_or_default();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// The single module a cell resolved to, if its wave names exactly one
    pub fn resolved_module(&self, coord: Coord, catalog: &PatternCatalog) -> Option<ModuleId> {
        match self.modules_in_wave(coord, catalog).as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    fn cell_or_error(&mut self, coord: Coord) -> Result<&mut CellState> {
        let dims = self.cells.dims();
        self.cells.get_mut(coord).ok_or_else(|| {
            crate::io::error::invalid_parameter(
                "coord",
                &format!("{coord:?}"),
                &format!("outside grid {dims:?}"),
            )
        })
    }
}
