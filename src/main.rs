//! Fooocus launcher CLI application
//!
//! Clears the temp workspace, fetches the default checkpoint if needed and
//! runs the application. Exit status is 0 on success or graceful shutdown and
//! 1 on any failure.

use std::process;

use tracing::{debug, error, info};
use tracing_subscriber::{fmt, EnvFilter};

use fooocus_launcher::app::{RunOutcome, ShutdownCoordinator};
use fooocus_launcher::cli::{handle_clean, handle_fetch, handle_run, Cli, Commands};
use fooocus_launcher::constants::exit;
use fooocus_launcher::errors::Result;

#[tokio::main]
async fn main() {
    let code = match run().await {
        Ok(RunOutcome::Completed) => exit::SUCCESS,
        Ok(RunOutcome::ShutDown(reason)) => {
            info!("Shutdown complete ({:?})", reason);
            println!("[Fooocus] Shutting down gracefully...");
            exit::SUCCESS
        }
        Err(e) => {
            error!("{} failure: {}", e.category(), e);
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };

    process::exit(code);
}

/// Main application logic
async fn run() -> Result<RunOutcome> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    init_logging(&cli);

    // Signal handlers go in before any long-running step
    let shutdown = ShutdownCoordinator::new();
    shutdown.install()?;

    info!("Fooocus launcher v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.resolved_command() {
        Commands::Run(args) => {
            info!("Executing run command");
            handle_run(&cli.global, &args, &shutdown).await
        }
        Commands::Fetch(args) => {
            info!("Executing fetch command");
            handle_fetch(&cli.global, &args, &shutdown).await
        }
        Commands::Clean(args) => {
            info!("Executing clean command");
            handle_clean(&cli.global, &args, &shutdown).await
        }
    };

    debug!("Shutdown state at exit: {:?}", shutdown.state());
    result
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let log_level = cli.log_level();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("fooocus_launcher={}", log_level).parse() {
        filter = filter.add_directive(directive);
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .with_writer(std::io::stderr)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
