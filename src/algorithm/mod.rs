/// Bitset used for per-cell pattern and module membership
pub mod bitset;
/// Solver orchestration and generation output
pub mod executor;
/// Breadth-first constraint propagation
pub mod propagation;
/// Minimum-entropy selection and weighted pattern choice
pub mod selection;
/// Per-cell wave state
pub mod wave;
