//! Wave function collapse over 3D tile grids learned from hand-authored templates
//!
//! A template is scanned for directed adjacency patterns between rotated module
//! variants. The solver then fills a new grid by repeatedly collapsing the cell
//! of lowest entropy and propagating the consequences until every cell is
//! resolved or some cell runs out of possibilities.

#![forbid(unsafe_code)]

/// Wave state, constraint propagation, selection and the solver loop
pub mod algorithm;
/// Pattern extraction and consistency checks
pub mod analysis;
/// Module registry and pattern catalog
pub mod catalog;
/// Input/output operations and error handling
pub mod io;
/// Orientation handling about the vertical axis
pub mod math;
/// Three-dimensional grids and the sampled neighbourhood
pub mod spatial;

pub use io::error::{Result, TilewaveError};
