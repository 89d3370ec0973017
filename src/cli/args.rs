//! Command-line argument parsing for the Fooocus launcher
//!
//! Running without a subcommand is the same as `run`: clean the temp dir,
//! make sure the model is present, then start the application.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ConfigOverrides;

/// Fooocus launcher - fetch the default model and start Fooocus
#[derive(Parser, Debug)]
#[command(
    name = "fooocus_launcher",
    version,
    about = "Fetch the default Fooocus checkpoint and start the application",
    long_about = "Clears the Fooocus temp directory, downloads the default checkpoint if it is missing
(authenticated with HUGGINGFACE_TOKEN when set), then runs launch.py and waits for it.
Ctrl+C and SIGTERM shut the launcher and the application down cleanly."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Clean, fetch the model, then launch the application (default)
    Run(RunArgs),

    /// Only make sure the model file is present
    Fetch(ArtifactArgs),

    /// Only clear the temporary directory
    Clean(CleanArgs),
}

/// Overrides for the model artifact
#[derive(Args, Debug, Clone, Default)]
pub struct ArtifactArgs {
    /// URL to download the model from
    #[arg(long, value_name = "URL")]
    pub model_url: Option<String>,

    /// Where the model file is stored
    #[arg(long, value_name = "FILE")]
    pub model_path: Option<PathBuf>,
}

/// Arguments for the clean command
#[derive(Args, Debug, Clone, Default)]
pub struct CleanArgs {
    /// Temporary directory to delete
    #[arg(long, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,
}

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub artifact: ArtifactArgs,

    #[command(flatten)]
    pub clean: CleanArgs,

    /// Do not delete the temporary directory before launching
    #[arg(long)]
    pub skip_cleanup: bool,

    /// Runtime executable used to start the application
    #[arg(long, value_name = "EXE")]
    pub runtime: Option<String>,

    /// Program passed to the runtime
    #[arg(long, value_name = "FILE")]
    pub program: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The subcommand to execute, `run` when none was given
    pub fn resolved_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }
}

impl From<&ArtifactArgs> for ConfigOverrides {
    fn from(args: &ArtifactArgs) -> Self {
        Self {
            model_url: args.model_url.clone(),
            model_path: args.model_path.clone(),
            ..Default::default()
        }
    }
}

impl From<&CleanArgs> for ConfigOverrides {
    fn from(args: &CleanArgs) -> Self {
        Self {
            temp_dir: args.temp_dir.clone(),
            ..Default::default()
        }
    }
}

impl From<&RunArgs> for ConfigOverrides {
    fn from(args: &RunArgs) -> Self {
        Self {
            model_url: args.artifact.model_url.clone(),
            model_path: args.artifact.model_path.clone(),
            temp_dir: args.clean.temp_dir.clone(),
            runtime: args.runtime.clone(),
            program: args.program.clone(),
            skip_cleanup: args.skip_cleanup,
        }
    }
}
