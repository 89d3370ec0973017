//! Command-line interface components
//!
//! This module contains CLI-specific code for the Fooocus launcher,
//! including argument parsing, command handlers and the progress display.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{ArtifactArgs, CleanArgs, Cli, Commands, GlobalArgs, RunArgs};
pub use commands::{handle_clean, handle_fetch, handle_run};
pub use progress::{describe_progress, DownloadProgress, ProgressConfig};
