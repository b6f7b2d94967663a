//! CLI entry point for template extraction and level generation

use clap::Parser;
use tilewave::io::cli::{Cli, CommandProcessor};
use tracing_subscriber::EnvFilter;

fn main() -> tilewave::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over --log-level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let processor = CommandProcessor::new(cli);
    processor.process()
}
