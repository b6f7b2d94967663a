use crate::{
    algorithm::propagation::{PropagationStats, propagate, propagate_all, verify_collapsed},
    algorithm::selection::{RandomSelector, lowest_entropy_cells},
    algorithm::wave::Wave,
    catalog::modules::{ModuleId, ModuleRegistry},
    catalog::patterns::PatternCatalog,
    io::configuration::MAX_GRID_DIMENSION,
    io::error::{Result, TilewaveError, WithContext, invalid_parameter},
    spatial::grid::{Coord, Grid3},
};
use rand::{Rng, rngs::StdRng};
use std::fmt;
use std::str::FromStr;

/// Global state of a generation run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveState {
    /// Boundary seeding has not happened yet
    Initializing,
    /// Constraints from the last change are being relaxed
    Propagating,
    /// Looking for the next cell to collapse
    Selecting,
    /// Choosing a pattern for the selected cell
    Collapsing,
    /// Every cell is resolved
    Solved,
    /// Some cell ran out of possibilities
    Contradiction,
}

impl SolveState {
    /// Whether the run can make no further progress
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Solved | Self::Contradiction)
    }
}

/// How boundary seeds are applied before the first selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BoundaryMode {
    /// Force every bottom and top cell, then propagate the whole grid
    #[default]
    Propagate,
    /// Seed a corner of each boundary layer, propagate, copy column `(0, ·, 0)`
    /// to every column, then settle the whole grid
    Replicate,
}

impl fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Propagate => f.write_str("propagate"),
            Self::Replicate => f.write_str("replicate"),
        }
    }
}

impl FromStr for BoundaryMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "propagate" => Ok(Self::Propagate),
            "replicate" => Ok(Self::Replicate),
            other => Err(format!(
                "unknown boundary mode '{other}' (expected 'propagate' or 'replicate')"
            )),
        }
    }
}

/// Solver parameters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolverConfig {
    /// Module forced onto the lowest layer
    pub ground: Option<ModuleId>,
    /// Module forced onto the highest layer
    pub ceiling: Option<ModuleId>,
    /// How the boundary seeds are applied
    pub boundary: BoundaryMode,
}

/// Concrete module per cell, `None` where the cell stayed unfilled
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedGrid {
    cells: Grid3<Option<ModuleId>>,
}

impl GeneratedGrid {
    /// Wrap a grid of resolved modules
    pub const fn new(cells: Grid3<Option<ModuleId>>) -> Self {
        Self { cells }
    }

    /// Grid dimensions `[x, y, z]`
    pub fn dims(&self) -> [usize; 3] {
        self.cells.dims()
    }

    /// Module at a cell, `None` for unfilled or out-of-range cells
    pub fn get(&self, coord: Coord) -> Option<ModuleId> {
        self.cells.get(coord).copied().flatten()
    }

    /// Borrow the underlying grid
    pub const fn cells(&self) -> &Grid3<Option<ModuleId>> {
        &self.cells
    }

    /// Every `(coord, module)` pair in grid order
    pub fn placements(&self) -> impl Iterator<Item = (Coord, Option<ModuleId>)> + '_ {
        self.cells.indexed_iter().map(|(coord, &module)| (coord, module))
    }

    /// Number of cells holding a concrete module
    pub fn filled_count(&self) -> usize {
        self.placements()
            .filter(|(_, module)| module.is_some())
            .count()
    }
}

/// Wave function collapse solver over a fixed output grid
///
/// Owns the wave for the duration of one run. Selection, collapse and
/// propagation for one change always complete before the next selection.
pub struct WaveSolver<R = StdRng> {
    /// Patterns the wave is defined over
    catalog: PatternCatalog,
    /// Per-cell possibility state
    wave: Wave,
    /// Boundary seeding parameters
    config: SolverConfig,
    /// Random source for tie-breaks and weighted collapse
    selector: RandomSelector<R>,
    /// Current state of the run
    state: SolveState,
    /// Completed collapse iterations
    iteration: usize,
    /// Accumulated propagation work
    propagation: PropagationStats,
}

impl WaveSolver<StdRng> {
    /// Create a solver whose randomness is fully determined by `seed`
    ///
    /// # Errors
    ///
    /// See [`WaveSolver::new`]
    pub fn with_seed(
        catalog: PatternCatalog,
        registry: &ModuleRegistry,
        dims: [usize; 3],
        config: SolverConfig,
        seed: u64,
    ) -> Result<Self> {
        let rng = RandomSelector::from_seed(seed);
        Self::from_selector(catalog, registry, dims, config, rng)
    }
}

impl<R: Rng> WaveSolver<R> {
    /// Create a solver drawing randomness from `rng`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any dimension is zero or exceeds the maximum grid dimension
    /// - The catalog is empty
    /// - A pattern or boundary module references an unregistered module
    pub fn new(
        catalog: PatternCatalog,
        registry: &ModuleRegistry,
        dims: [usize; 3],
        config: SolverConfig,
        rng: R,
    ) -> Result<Self> {
        Self::from_selector(catalog, registry, dims, config, RandomSelector::new(rng))
    }

    fn from_selector(
        catalog: PatternCatalog,
        registry: &ModuleRegistry,
        dims: [usize; 3],
        config: SolverConfig,
        selector: RandomSelector<R>,
    ) -> Result<Self> {
        let [size_x, size_y, size_z] = dims;
        for (parameter, size) in [("size_x", size_x), ("size_y", size_y), ("size_z", size_z)] {
            if size == 0 || size > MAX_GRID_DIMENSION {
                return Err(invalid_parameter(
                    parameter,
                    &size,
                    &format!("must be between 1 and {MAX_GRID_DIMENSION}"),
                ));
            }
        }
        if catalog.is_empty() {
            return Err(TilewaveError::InvalidSourceData {
                reason: "pattern catalog is empty".to_string(),
            });
        }
        catalog.validate_against(registry)?;
        for id in [config.ground, config.ceiling].into_iter().flatten() {
            registry.get(id)?;
        }

        let wave = Wave::new(dims, &catalog, registry.len());
        tracing::debug!(
            patterns = catalog.len(),
            modules = registry.len(),
            ?dims,
            "solver created"
        );

        Ok(Self {
            catalog,
            wave,
            config,
            selector,
            state: SolveState::Initializing,
            iteration: 0,
            propagation: PropagationStats::default(),
        })
    }

    /// Current state of the run
    pub const fn state(&self) -> SolveState {
        self.state
    }

    /// Number of completed collapse iterations
    pub const fn iteration(&self) -> usize {
        self.iteration
    }

    /// Borrow the wave
    pub const fn wave(&self) -> &Wave {
        &self.wave
    }

    /// Borrow the catalog
    pub const fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Accumulated propagation counters
    pub const fn propagation_stats(&self) -> PropagationStats {
        self.propagation
    }

    /// Number of output cells
    pub fn cell_count(&self) -> usize {
        self.wave.cells().len()
    }

    /// Number of cells whose wave is down to a single pattern
    pub fn collapsed_count(&self) -> usize {
        self.wave
            .cells()
            .indexed_iter()
            .filter(|(_, state)| state.is_collapsed())
            .count()
    }

    /// Apply boundary seeds and settle the wave
    ///
    /// Does nothing once the run has left the initializing state.
    ///
    /// # Errors
    ///
    /// Returns `Contradiction` if the boundary seeds are incompatible with the
    /// catalog or with each other
    pub fn initialize(&mut self) -> Result<()> {
        if self.state != SolveState::Initializing {
            return Ok(());
        }

        let result = match self.config.boundary {
            BoundaryMode::Propagate => self.seed_full_layers(),
            BoundaryMode::Replicate => self.seed_replicated_column(),
        };
        self.settle(result)?;

        self.state = SolveState::Selecting;
        tracing::info!(
            mode = %self.config.boundary,
            collapsed = self.collapsed_count(),
            cells = self.cell_count(),
            "boundary seeded"
        );
        Ok(())
    }

    /// Run one selection, collapse and propagation cycle
    ///
    /// Returns whether another iteration may follow. Seeds the boundary first
    /// if that has not happened yet.
    ///
    /// # Errors
    ///
    /// Returns `Contradiction` (stamped with the iteration) when a cell runs
    /// out of possibilities; the solver then stays in the contradiction state
    pub fn execute_iteration(&mut self) -> Result<bool> {
        if self.state == SolveState::Initializing {
            self.initialize()?;
        }
        if self.state.is_terminal() {
            return Ok(false);
        }

        self.state = SolveState::Selecting;
        let candidates = lowest_entropy_cells(&self.wave);
        let Some(&coord) = self.selector.choose(&candidates.cells) else {
            if let Err(error) = verify_collapsed(&self.wave, &self.catalog) {
                self.state = SolveState::Contradiction;
                tracing::warn!(%error, "solve failed");
                return Err(error).with_iteration(self.iteration);
            }
            self.state = SolveState::Solved;
            tracing::info!(iterations = self.iteration, "wave solved");
            return Ok(false);
        };

        self.state = SolveState::Collapsing;
        let chosen = self
            .wave
            .cell(coord)
            .and_then(|state| self.selector.choose_pattern(state, &self.catalog));
        let Some(pattern_index) = chosen else {
            self.state = SolveState::Contradiction;
            return Err(TilewaveError::Contradiction {
                position: coord,
                iteration: self.iteration,
                module: None,
            });
        };
        let module = self.wave.collapse_to(coord, pattern_index, &self.catalog)?;
        tracing::debug!(
            iteration = self.iteration,
            ?coord,
            entropy = candidates.entropy,
            tied = candidates.cells.len(),
            %module,
            "collapsed cell"
        );

        self.state = SolveState::Propagating;
        let result = propagate(&mut self.wave, &self.catalog, [coord]);
        let iteration = self.iteration;
        self.settle(result).with_iteration(iteration)?;

        self.iteration += 1;
        self.state = SolveState::Selecting;
        Ok(true)
    }

    /// Iterate until the wave is solved
    ///
    /// # Errors
    ///
    /// Returns `Contradiction` if the run fails; the grid is not read out
    pub fn run(&mut self) -> Result<GeneratedGrid> {
        while self.execute_iteration()? {}
        Ok(self.read_out())
    }

    /// Resolve every cell to its module, leaving ambiguous cells unfilled
    pub fn read_out(&self) -> GeneratedGrid {
        GeneratedGrid::new(
            self.wave
                .cells()
                .map(|coord, _| self.wave.resolved_module(coord, &self.catalog)),
        )
    }

    fn seed_full_layers(&mut self) -> Result<PropagationStats> {
        let [size_x, size_y, size_z] = self.wave.dims();
        for (module, y) in self.boundary_layers(size_y) {
            for x in 0..size_x {
                for z in 0..size_z {
                    self.wave.force_module([x, y, z], module, &self.catalog)?;
                }
            }
        }
        let stats = propagate_all(&mut self.wave, &self.catalog)?;
        verify_collapsed(&self.wave, &self.catalog)?;
        Ok(stats)
    }

    fn seed_replicated_column(&mut self) -> Result<PropagationStats> {
        let mut stats = PropagationStats::default();
        let [_, size_y, _] = self.wave.dims();
        for (module, y) in self.boundary_layers(size_y) {
            for seed in [[0, y, 0], [1, y, 0], [0, y, 1]] {
                if !self.wave.cells().contains(seed) {
                    continue;
                }
                self.wave.force_module(seed, module, &self.catalog)?;
                let local = propagate(&mut self.wave, &self.catalog, [seed])?;
                stats.dequeued += local.dequeued;
                stats.revisions += local.revisions;
                stats.reductions += local.reductions;
            }
        }

        self.wave.replicate_column(0, 0);
        // Settle anything the column copy left inconsistent at the grid faces
        let settled = propagate_all(&mut self.wave, &self.catalog)?;
        stats.dequeued += settled.dequeued;
        stats.revisions += settled.revisions;
        stats.reductions += settled.reductions;
        verify_collapsed(&self.wave, &self.catalog)?;
        Ok(stats)
    }

    fn boundary_layers(&self, size_y: usize) -> Vec<(ModuleId, usize)> {
        let mut layers = Vec::with_capacity(2);
        if let Some(ground) = self.config.ground {
            layers.push((ground, 0));
        }
        if let Some(ceiling) = self.config.ceiling {
            layers.push((ceiling, size_y.saturating_sub(1)));
        }
        layers
    }

    /// Record propagation work and move to the contradiction state on failure
    fn settle(&mut self, result: Result<PropagationStats>) -> Result<()> {
        match result {
            Ok(stats) => {
                self.propagation.dequeued += stats.dequeued;
                self.propagation.revisions += stats.revisions;
                self.propagation.reductions += stats.reductions;
                Ok(())
            }
            Err(error) => {
                if error.is_contradiction() {
                    self.state = SolveState::Contradiction;
                    tracing::warn!(%error, "solve failed");
                }
                Err(error)
            }
        }
    }
}
