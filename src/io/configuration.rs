//! Algorithm constants and runtime configuration defaults

// Module types every template registry starts with, in id order
/// Empty space, also the value of template cells no block covers
pub const AIR_MODULE: &str = "Air";
/// Placeholder type reported for cells the solver left ambiguous
pub const UNFILLED_MODULE: &str = "Unfilled";
/// Default ground module
pub const BASE_MODULE: &str = "Base";

// Template folder layout
/// Template dimensions and symmetry lists
pub const INFO_FILE: &str = "info.txt";
/// Block placements of the authored template
pub const TEMPLATE_FILE: &str = "template_data.txt";
/// Extracted pattern catalog
pub const PATTERNS_FILE: &str = "patterns.txt";
/// Module registry written alongside the catalog
pub const MODULES_FILE: &str = "modules.txt";
/// Default generation output
pub const OUTPUT_FILE: &str = "level.txt";

// Keys of the info file
/// Comma separated module types with four-way symmetry
pub const FOUR_WAY_KEY: &str = "4 ways symmetric";
/// Comma separated module types with two-way symmetry
pub const TWO_WAY_KEY: &str = "2 ways symmetric";
/// Template extent keys, in the exporter's z-up axis order
pub const TEMPLATE_SIZE_KEYS: [&str; 3] = ["template size x", "template size y", "template size z"];
/// Block edge length keys, in the exporter's z-up axis order
pub const TILE_SIZE_KEYS: [&str; 3] = ["tile size x", "tile size y", "tile size z"];

/// Field separator used by every artifact file
pub const FIELD_SEPARATOR: &str = "||";

// Tolerance for quaternion comparison; exported rotations carry float noise
/// Maximum deviation from an exact quarter turn
pub const ROTATION_TOLERANCE: f64 = 1e-3;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 10_000;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

// Default values for configurable parameters
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;
/// Default output grid size `[x, y, z]`
pub const DEFAULT_GRID_SIZE: [usize; 3] = [10, 4, 10];
