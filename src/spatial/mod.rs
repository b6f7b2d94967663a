//! Spatial data structures shared by extraction and solving
//!
//! This module contains spatial-related functionality including:
//! - A dense 3D grid with generic iteration helpers
//! - The fixed 18-direction neighbourhood and relative offsets

/// Dense 3D grid indexed by `[x, y, z]`
pub mod grid;
/// Relative offsets and the sampled neighbourhood
pub mod neighborhood;

pub use grid::{Coord, Grid3};
pub use neighborhood::{NEIGHBORHOOD, Offset};
