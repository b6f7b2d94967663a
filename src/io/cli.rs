//! Command-line interface for pattern extraction and level generation

use crate::algorithm::executor::{BoundaryMode, GeneratedGrid, SolverConfig, WaveSolver};
use crate::analysis::consistency::check_consistency;
use crate::analysis::extraction::PatternExtractor;
use crate::catalog::modules::ModuleRegistry;
use crate::catalog::patterns::PatternCatalog;
use crate::io::artifacts::{read_modules, read_patterns, write_modules, write_patterns};
use crate::io::configuration::{
    AIR_MODULE, BASE_MODULE, DEFAULT_GRID_SIZE, DEFAULT_SEED, INFO_FILE, MODULES_FILE,
    OUTPUT_FILE, PATTERNS_FILE,
};
use crate::io::error::{Result, TilewaveError};
use crate::io::output::write_level;
use crate::io::progress::ProgressManager;
use crate::io::template::{TemplateData, TemplateInfo};
use clap::{Args, Parser, Subcommand};
use rand::Rng;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "tilewave")]
#[command(
    author,
    version,
    about = "Learn adjacency patterns from a 3D template and generate new levels by wave function collapse"
)]
/// Command-line arguments for the extraction and generation tool
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

/// Available operations
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract patterns and modules from a template folder
    Extract {
        /// Folder holding `info.txt` and `template_data.txt`
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,
    },
    /// Generate a level from previously extracted patterns
    Generate(GenerateArgs),
}

/// Arguments of the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Folder holding `info.txt`, `patterns.txt` and `modules.txt`
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Output grid size as X Y Z, with Y vertical
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], default_values_t = DEFAULT_GRID_SIZE)]
    pub size: Vec<usize>,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// How boundary layers are seeded
    #[arg(short, long, default_value_t = BoundaryMode::Propagate)]
    pub boundary: BoundaryMode,

    /// Module type forced onto the bottom layer
    #[arg(long, default_value = BASE_MODULE)]
    pub ground: String,

    /// Module type forced onto the top layer
    #[arg(long, default_value = AIR_MODULE)]
    pub ceiling: String,

    /// Output file, relative to the folder unless absolute
    #[arg(short, long, default_value = OUTPUT_FILE)]
    pub output: PathBuf,
}

impl GenerateArgs {
    /// Requested grid dimensions
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` unless exactly three sizes were given
    pub fn dims(&self) -> Result<[usize; 3]> {
        <[usize; 3]>::try_from(self.size.as_slice()).map_err(|error| {
            crate::io::error::invalid_parameter(
                "size",
                &format!("{:?}", self.size),
                &format!("expected three values X Y Z ({error})"),
            )
        })
    }
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Runs the selected command with progress reporting
pub struct CommandProcessor {
    cli: Cli,
    progress: ProgressManager,
}

impl CommandProcessor {
    /// Create a processor for parsed arguments
    pub fn new(cli: Cli) -> Self {
        let progress = ProgressManager::new(cli.should_show_progress());
        Self { cli, progress }
    }

    /// Run the selected command
    ///
    /// # Errors
    ///
    /// Returns any error from reading inputs, solving or writing outputs
    pub fn process(&self) -> Result<()> {
        match &self.cli.command {
            Command::Extract { folder } => self.extract(folder).map(|_| ()),
            Command::Generate(args) => self.generate(args).map(|_| ()),
        }
    }

    /// Extract and write the pattern catalog of a template folder
    ///
    /// # Errors
    ///
    /// Returns template parsing errors and `FileSystem` on write failures
    pub fn extract(&self, folder: &Path) -> Result<PatternCatalog> {
        let start = Instant::now();
        self.progress
            .start_spinner(&format!("Extracting patterns from {}", folder.display()));

        let mut template = TemplateData::read(folder)?;
        let catalog = PatternExtractor::new(&mut template.registry).extract(&template.grid)?;

        write_patterns(&folder.join(PATTERNS_FILE), &catalog)?;
        write_modules(&folder.join(MODULES_FILE), &template.registry)?;

        self.progress.finish(&format!(
            "{} patterns over {} modules",
            catalog.len(),
            template.registry.len()
        ));
        tracing::info!(
            patterns = catalog.len(),
            modules = template.registry.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "extraction complete"
        );
        Ok(catalog)
    }

    /// Generate a level and write it next to the catalog
    ///
    /// # Errors
    ///
    /// Returns `Contradiction` when the solve fails, and artifact or file
    /// errors from reading inputs and writing the level
    pub fn generate(&self, args: &GenerateArgs) -> Result<GeneratedGrid> {
        let start = Instant::now();
        let dims = args.dims()?;
        let (registry, catalog) = Self::load_catalog(&args.folder)?;

        let config = SolverConfig {
            ground: Some(registry.base_variant(&args.ground)?),
            ceiling: Some(registry.base_variant(&args.ceiling)?),
            boundary: args.boundary,
        };
        let mut solver = WaveSolver::with_seed(catalog, &registry, dims, config, args.seed)?;

        self.progress.start_cells("seeding", solver.cell_count());
        let grid = self
            .solve_with_progress(&mut solver)
            .inspect_err(|_| self.progress.abandon())?;

        let report = check_consistency(&grid, solver.catalog())?;
        let output = if args.output.is_absolute() {
            args.output.clone()
        } else {
            args.folder.join(&args.output)
        };
        let summary = write_level(&output, &grid, &registry)?;

        self.progress.finish(&format!(
            "{} blocks placed, {} unfilled",
            summary.placed, summary.unfilled
        ));
        tracing::info!(
            iterations = solver.iteration(),
            pairs_checked = report.pairs_checked,
            dequeued = solver.propagation_stats().dequeued,
            elapsed_ms = start.elapsed().as_millis(),
            "generation complete"
        );
        Ok(grid)
    }

    fn solve_with_progress<R: Rng>(&self, solver: &mut WaveSolver<R>) -> Result<GeneratedGrid> {
        while solver.execute_iteration()? {
            if !self.progress.is_hidden() {
                self.progress
                    .update_cells(solver.collapsed_count(), solver.iteration());
            }
        }
        Ok(solver.read_out())
    }

    /// Read the registry and catalog written by a previous extraction
    ///
    /// # Errors
    ///
    /// Returns file and artifact errors, or `InvalidSourceData` when the
    /// catalog is empty
    pub fn load_catalog(folder: &Path) -> Result<(ModuleRegistry, PatternCatalog)> {
        let info = TemplateInfo::read(&folder.join(INFO_FILE))?;
        let registry = read_modules(&folder.join(MODULES_FILE), &info.symmetry_classes())?;
        let catalog = read_patterns(&folder.join(PATTERNS_FILE))?;
        if catalog.is_empty() {
            return Err(TilewaveError::InvalidSourceData {
                reason: format!("{} holds no patterns", folder.join(PATTERNS_FILE).display()),
            });
        }
        catalog.validate_against(&registry)?;
        Ok((registry, catalog))
    }
}
