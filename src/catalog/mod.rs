//! Module and pattern catalogs learned from a template

/// Rotated tile variants with stable identities and symmetry classes
pub mod modules;
/// Directed adjacency facts with observed frequencies
pub mod patterns;

pub use modules::{Module, ModuleId, ModuleRegistry, SymmetryClass};
pub use patterns::{Pattern, PatternCatalog, PatternKey};
