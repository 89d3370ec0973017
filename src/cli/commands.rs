//! Command handlers for the Fooocus launcher CLI
//!
//! Each handler loads the configuration, builds the components it needs and
//! returns a `RunOutcome`. Exit codes are decided by the binary.

use tracing::{debug, info, warn};

use crate::app::{
    ArtifactFetcher, Pipeline, ProcessLauncher, RemoteArtifact, RunOutcome, ShutdownCoordinator,
    WorkspaceCleaner,
};
use crate::auth::{AuthStatus, Credential};
use crate::cli::args::{ArtifactArgs, CleanArgs, GlobalArgs, RunArgs};
use crate::cli::progress::{DownloadProgress, ProgressConfig};
use crate::config::{ConfigOverrides, LauncherConfig};
use crate::constants::launch;
use crate::errors::{AppError, Result};

/// Clean the temp dir, fetch the model, then run the application
pub async fn handle_run(
    global: &GlobalArgs,
    args: &RunArgs,
    shutdown: &ShutdownCoordinator,
) -> Result<RunOutcome> {
    let config = LauncherConfig::load(global.config.as_deref(), &ConfigOverrides::from(args))?;
    show_banner(global);

    let launcher = config.process_launcher();
    show_runtime_version(global, &launcher).await;

    let artifact = config.remote_artifact()?;
    let fetcher = build_fetcher(&config)?;
    let pipeline = Pipeline::new(
        config.workspace_cleaner(),
        fetcher,
        artifact.clone(),
        launcher,
    );

    let progress = DownloadProgress::new(progress_config(global));
    let result = pipeline.run(&progress, &mut shutdown.listener()).await;

    if let Err(e) = &result {
        report_failure(e, &artifact);
    }
    result
}

/// Only make sure the model file is present
pub async fn handle_fetch(
    global: &GlobalArgs,
    args: &ArtifactArgs,
    shutdown: &ShutdownCoordinator,
) -> Result<RunOutcome> {
    let config = LauncherConfig::load(global.config.as_deref(), &ConfigOverrides::from(args))?;
    show_banner(global);

    let artifact = config.remote_artifact()?;
    let fetcher = build_fetcher(&config)?;
    let progress = DownloadProgress::new(progress_config(global));
    let mut listener = shutdown.listener();

    tokio::select! {
        biased;
        reason = listener.wait() => Ok(RunOutcome::ShutDown(reason)),
        fetched = fetcher.ensure(&artifact, &progress) => match fetched {
            Ok(outcome) => {
                debug!("Fetch finished: {:?}", outcome);
                Ok(RunOutcome::Completed)
            }
            Err(e) => {
                let e = AppError::from(e);
                report_failure(&e, &artifact);
                Err(e)
            }
        },
    }
}

/// Only clear the temporary directory
///
/// Always removes `workspace.temp_dir`; `workspace.clean_on_start` only governs `run`.
pub async fn handle_clean(
    global: &GlobalArgs,
    args: &CleanArgs,
    shutdown: &ShutdownCoordinator,
) -> Result<RunOutcome> {
    let config = LauncherConfig::load(global.config.as_deref(), &ConfigOverrides::from(args))?;
    let cleaner = WorkspaceCleaner::new(&config.workspace.temp_dir);
    let mut listener = shutdown.listener();

    tokio::select! {
        biased;
        reason = listener.wait() => Ok(RunOutcome::ShutDown(reason)),
        outcome = cleaner.clean() => {
            debug!("Cleanup finished: {:?}", outcome);
            Ok(RunOutcome::Completed)
        }
    }
}

fn build_fetcher(config: &LauncherConfig) -> Result<ArtifactFetcher> {
    let credential = Credential::from_env();
    info!("Auth status: {}", AuthStatus::of(credential.as_ref()).status_message());
    let fetcher = ArtifactFetcher::from_config(&config.client, credential)?;
    debug!("Bearer token attached to requests: {}", fetcher.is_authenticated());
    Ok(fetcher)
}

fn progress_config(global: &GlobalArgs) -> ProgressConfig {
    if global.quiet {
        ProgressConfig::silent()
    } else {
        ProgressConfig::default()
    }
}

fn show_banner(global: &GlobalArgs) {
    if global.quiet {
        return;
    }
    println!("Fooocus launcher v{}", env!("CARGO_PKG_VERSION"));
    println!("Fooocus version: {}", launch::APP_VERSION);
}

async fn show_runtime_version(global: &GlobalArgs, launcher: &ProcessLauncher) {
    if global.quiet {
        return;
    }
    match launcher.runtime_version().await {
        Some(version) => println!("Runtime version: {}", version),
        None => warn!("Could not determine the version of {}", launcher.runtime()),
    }
}

fn report_failure(error: &AppError, artifact: &RemoteArtifact) {
    match error {
        AppError::Download(e) => println!(
            "[Model Download] Failed to download {}. Error: {}",
            artifact.url(),
            e
        ),
        AppError::Launch(e) => println!("[Fooocus] Failed to launch application: {}", e),
        _ => {}
    }
}
