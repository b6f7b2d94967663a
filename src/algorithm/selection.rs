use crate::{
    algorithm::wave::{CellState, Wave},
    catalog::patterns::PatternCatalog,
    spatial::grid::Coord,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Cells sharing the lowest entropy above one
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntropyCandidates {
    /// Number of patterns still possible at each candidate
    pub entropy: usize,
    /// Candidate coordinates in grid order
    pub cells: Vec<Coord>,
}

impl EntropyCandidates {
    /// Whether no cell is left to collapse
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Collect every cell of minimum entropy, ignoring cells with one or zero patterns
///
/// Collapsed cells and contradicted cells are never candidates, so an empty
/// result means the wave is fully resolved.
pub fn lowest_entropy_cells(wave: &Wave) -> EntropyCandidates {
    let mut candidates = EntropyCandidates {
        entropy: usize::MAX,
        cells: Vec::new(),
    };

    for (coord, state) in wave.cells().indexed_iter() {
        let entropy = state.entropy();
        if entropy <= 1 {
            continue;
        }
        if entropy < candidates.entropy {
            candidates.entropy = entropy;
            candidates.cells.clear();
        }
        if entropy == candidates.entropy {
            candidates.cells.push(coord);
        }
    }

    if candidates.cells.is_empty() {
        candidates.entropy = 0;
    }
    candidates
}

/// Injectable random source for reproducible stochastic choices
pub struct RandomSelector<R = StdRng> {
    rng: R,
}

impl RandomSelector<StdRng> {
    /// Create a deterministic selector from a seed
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomSelector<R> {
    /// Wrap an existing generator
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Uniformly pick an element of a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.rng.random_range(0..items.len()))
    }

    /// Integer weighted random selection
    ///
    /// Draws below the total weight and walks the cumulative sum. Returns
    /// `None` when every weight is zero.
    pub fn weighted_choice(&mut self, weights: &[usize]) -> Option<usize> {
        let total: usize = weights.iter().sum();
        if total == 0 {
            return None;
        }

        let target = self.rng.random_range(0..total);
        let mut running = 0;
        for (i, &weight) in weights.iter().enumerate() {
            running += weight;
            if target < running {
                return Some(i);
            }
        }
        None
    }

    /// Pick one possible pattern of a cell, weighted by catalog frequency
    pub fn choose_pattern(&mut self, state: &CellState, catalog: &PatternCatalog) -> Option<usize> {
        let possible: Vec<usize> = state.patterns.iter().collect();
        let weights: Vec<usize> = possible
            .iter()
            .map(|&index| catalog.pattern(index).map_or(0, |pattern| pattern.frequency))
            .collect();
        self.weighted_choice(&weights)
            .and_then(|choice| possible.get(choice).copied())
    }
}
