//! Presentation layer for judge-panel
//!
//! This crate contains CLI definitions, output formatters and
//! progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{
    ArtifactArgs, ChooseArgs, Cli, Command, JudgesCommand, OutputMode, RunArgs, ScoreArgs,
};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
