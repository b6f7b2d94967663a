use crate::{
    algorithm::bitset::Membership,
    algorithm::wave::Wave,
    catalog::modules::ModuleId,
    catalog::patterns::PatternCatalog,
    io::error::{Result, TilewaveError},
    spatial::grid::Coord,
    spatial::neighborhood::Offset,
};
use std::collections::VecDeque;

/// Outcome of revising one cell against one of its neighbours
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Revision {
    /// Nothing was removed
    Unchanged,
    /// At least one pattern or module was removed
    Reduced,
}

/// Work counters for a single propagation run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropagationStats {
    /// Cells taken off the queue
    pub dequeued: usize,
    /// Neighbour revisions performed
    pub revisions: usize,
    /// Revisions that removed something
    pub reductions: usize,
}

/// Revise `cell` against the permissible modules of its neighbour `source`
///
/// Patterns at `cell` pointing towards `source` whose `point_b` is no longer
/// permissible there are removed. A module at `cell` survives only while some
/// remaining pattern in that direction supports it; patterns starting from a
/// dropped module go with it. Directions the catalog never observed impose no
/// constraint.
///
/// # Errors
///
/// Returns `Contradiction` if `cell` is left with nothing possible, or
/// `UnknownModule` if a pattern names a module outside the wave's range
pub fn revise(
    wave: &mut Wave,
    catalog: &PatternCatalog,
    cell: Coord,
    source: Coord,
) -> Result<Revision> {
    let direction = Offset::between(cell, source);
    let candidates = catalog.with_offset(direction);
    if candidates.is_empty() {
        return Ok(Revision::Unchanged);
    }

    let module_count = wave.module_count();
    let Some(source_modules) = wave.cell(source).map(|state| state.modules.clone()) else {
        return Ok(Revision::Unchanged);
    };
    let Some(state) = wave.cell_mut(cell) else {
        return Ok(Revision::Unchanged);
    };

    let mut removed_patterns = false;
    let mut supported = Membership::new(module_count);
    for &index in candidates {
        if !state.patterns.contains(index) {
            continue;
        }
        let Some(pattern) = catalog.pattern(index) else {
            continue;
        };
        for id in [pattern.point_a, pattern.point_b] {
            if id.index() >= module_count {
                return Err(TilewaveError::UnknownModule {
                    id,
                    registered: module_count,
                });
            }
        }

        if source_modules.contains(pattern.point_b.index()) {
            supported.insert(pattern.point_a.index());
        } else {
            state.patterns.remove(index);
            removed_patterns = true;
        }
    }

    let dropped: Vec<usize> = state
        .modules
        .iter()
        .filter(|&module| !supported.contains(module))
        .collect();
    for &module in &dropped {
        state.modules.remove(module);
    }

    if !dropped.is_empty() {
        let stale: Vec<usize> = state
            .patterns
            .iter()
            .filter(|&index| {
                catalog
                    .pattern(index)
                    .is_some_and(|pattern| !state.modules.contains(pattern.point_a.index()))
            })
            .collect();
        for index in stale {
            state.patterns.remove(index);
        }
    }

    if state.modules.is_empty() || state.patterns.is_empty() {
        return Err(TilewaveError::Contradiction {
            position: cell,
            iteration: 0,
            module: None,
        });
    }

    if removed_patterns || !dropped.is_empty() {
        Ok(Revision::Reduced)
    } else {
        Ok(Revision::Unchanged)
    }
}

/// Breadth-first constraint relaxation from a set of changed cells
///
/// Every neighbour of a dequeued cell that is not already collapsed is revised
/// against it; neighbours that shrink are queued in turn. Returns once the
/// queue drains, which is a local fixpoint.
///
/// # Errors
///
/// Propagates `Contradiction` and `UnknownModule` from [`revise`]
pub fn propagate(
    wave: &mut Wave,
    catalog: &PatternCatalog,
    seeds: impl IntoIterator<Item = Coord>,
) -> Result<PropagationStats> {
    let mut queue: VecDeque<Coord> = seeds.into_iter().collect();
    let mut stats = PropagationStats::default();

    while let Some(source) = queue.pop_front() {
        stats.dequeued += 1;
        let neighbors: Vec<Coord> = wave
            .cells()
            .neighbors(source)
            .map(|(_, neighbor)| neighbor)
            .collect();

        for neighbor in neighbors {
            if wave.cell(neighbor).is_none_or(|state| state.is_collapsed()) {
                continue;
            }
            stats.revisions += 1;
            if revise(wave, catalog, neighbor, source)? == Revision::Reduced {
                stats.reductions += 1;
                tracing::trace!(?neighbor, ?source, "cell reduced");
                queue.push_back(neighbor);
            }
        }
    }

    Ok(stats)
}

/// Propagate from every cell of the grid
///
/// Useful after bulk edits, and a no-op on a wave that is already quiescent.
///
/// # Errors
///
/// Propagates `Contradiction` and `UnknownModule` from [`revise`]
pub fn propagate_all(wave: &mut Wave, catalog: &PatternCatalog) -> Result<PropagationStats> {
    let seeds: Vec<Coord> = wave.cells().coords().collect();
    propagate(wave, catalog, seeds)
}

/// Check every collapsed cell against all of its neighbours
///
/// Propagation never revises a collapsed cell, so two cells that were forced
/// down to one pattern each are never compared by [`propagate`]. A collapsed
/// cell passes when each observed direction holds a pattern from its module
/// to some module still permissible at the neighbour. Returns the number of
/// pairs checked.
///
/// # Errors
///
/// Returns `Contradiction` at the first collapsed cell with an unsupported
/// neighbour, naming that cell's module
pub fn verify_collapsed(wave: &Wave, catalog: &PatternCatalog) -> Result<usize> {
    let mut checked = 0;

    for (cell, state) in wave.cells().indexed_iter() {
        if !state.is_collapsed() {
            continue;
        }
        for (offset, neighbor) in wave.cells().neighbors(cell) {
            let candidates = catalog.with_offset(offset);
            let Some(other) = wave.cell(neighbor) else {
                continue;
            };
            if candidates.is_empty() {
                continue;
            }

            checked += 1;
            let supported = candidates
                .iter()
                .filter_map(|&index| catalog.pattern(index))
                .any(|pattern| {
                    state.modules.contains(pattern.point_a.index())
                        && other.modules.contains(pattern.point_b.index())
                });
            if !supported {
                tracing::debug!(?cell, ?neighbor, %offset, "collapsed pair unsupported");
                return Err(TilewaveError::Contradiction {
                    position: cell,
                    iteration: 0,
                    module: state.modules.iter().next().map(ModuleId),
                });
            }
        }
    }

    Ok(checked)
}
