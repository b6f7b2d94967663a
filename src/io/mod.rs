//! Input/output: template and catalog files, level export, CLI and errors

/// Pattern and module catalog files
pub mod artifacts;
/// Command-line interface and command dispatch
pub mod cli;
/// Algorithm constants and runtime configuration defaults
pub mod configuration;
/// Error types and context management
pub mod error;
/// Generated level export
pub mod output;
/// Terminal progress display
pub mod progress;
/// Template folder reader
pub mod template;
