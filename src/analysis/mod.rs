//! Analysis modules for pattern extraction and output verification

/// Local consistency check of generated grids
pub mod consistency;
/// Pattern extraction from template grids
pub mod extraction;
