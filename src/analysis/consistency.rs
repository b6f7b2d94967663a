//! Local consistency check of a generated grid against its catalog

use crate::algorithm::executor::GeneratedGrid;
use crate::catalog::patterns::{PatternCatalog, PatternKey};
use crate::io::error::{Result, TilewaveError};

/// Summary of a consistency check
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    /// Neighbour pairs that were checked
    pub pairs_checked: usize,
    /// Pairs skipped because one side was unfilled
    pub pairs_skipped: usize,
}

/// Confirm every filled neighbour pair of `grid` is a catalog pattern
///
/// Pairs involving an unfilled cell are skipped and counted.
///
/// # Errors
///
/// Returns `UnknownPattern` for the first pair with no nonzero-frequency
/// pattern, carrying the origin cell
pub fn check_consistency(grid: &GeneratedGrid, catalog: &PatternCatalog) -> Result<ConsistencyReport> {
    let mut report = ConsistencyReport::default();
    let cells = grid.cells();

    for (coord, &point_a) in cells.indexed_iter() {
        for (offset, neighbor) in cells.neighbors(coord) {
            let (Some(point_a), Some(point_b)) = (point_a, grid.get(neighbor)) else {
                report.pairs_skipped += 1;
                continue;
            };

            let key = PatternKey::new(point_a, point_b, offset);
            let frequency = catalog.frequency_of(&key).map_err(|error| match error {
                TilewaveError::UnknownPattern { .. } => TilewaveError::UnknownPattern {
                    point_a,
                    point_b,
                    offset,
                    position: Some(coord),
                },
                other => other,
            })?;
            if frequency == 0 {
                return Err(TilewaveError::UnknownPattern {
                    point_a,
                    point_b,
                    offset,
                    position: Some(coord),
                });
            }
            report.pairs_checked += 1;
        }
    }

    Ok(report)
}
