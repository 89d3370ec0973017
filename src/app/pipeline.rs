//! Run sequencing: clean, fetch, launch
//!
//! Each step is raced against the shutdown listener. Cleanup failures are
//! logged and ignored; fetch and launch failures end the sequence and are
//! returned to the caller, which alone decides the process exit status.

use tracing::{debug, info};

use crate::app::client::{ArtifactFetcher, FetchOutcome, TransferProgress};
use crate::app::launcher::{LaunchOutcome, ProcessLauncher};
use crate::app::models::RemoteArtifact;
use crate::app::shutdown::{ShutdownListener, ShutdownReason};
use crate::app::workspace::WorkspaceCleaner;
use crate::errors::Result;

/// How a run ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every step completed and the application exited with status 0
    Completed,
    /// Shutdown was requested part-way through
    ShutDown(ShutdownReason),
}

/// The launcher's full run: clean → fetch → launch
pub struct Pipeline {
    cleaner: Option<WorkspaceCleaner>,
    fetcher: ArtifactFetcher,
    artifact: RemoteArtifact,
    launcher: ProcessLauncher,
}

impl Pipeline {
    /// Assemble a pipeline; pass `None` as `cleaner` to skip cleanup
    pub fn new(
        cleaner: Option<WorkspaceCleaner>,
        fetcher: ArtifactFetcher,
        artifact: RemoteArtifact,
        launcher: ProcessLauncher,
    ) -> Self {
        Self {
            cleaner,
            fetcher,
            artifact,
            launcher,
        }
    }

    /// Run every step in order
    ///
    /// # Errors
    ///
    /// Returns `AppError::Download` if the artifact cannot be fetched (the
    /// application is then never started) and `AppError::Launch` if the
    /// application fails to start or exits unsuccessfully.
    pub async fn run(
        &self,
        progress: &dyn TransferProgress,
        shutdown: &mut ShutdownListener,
    ) -> Result<RunOutcome> {
        if let Some(cleaner) = &self.cleaner {
            tokio::select! {
                biased;
                reason = shutdown.wait() => return Ok(RunOutcome::ShutDown(reason)),
                outcome = cleaner.clean() => {
                    if !outcome.is_clean() {
                        debug!("Continuing with a partially cleaned temp dir");
                    }
                }
            }
        } else {
            debug!("Temp dir cleanup skipped");
        }

        let fetched = tokio::select! {
            biased;
            reason = shutdown.wait() => return Ok(RunOutcome::ShutDown(reason)),
            fetched = self.fetcher.ensure(&self.artifact, progress) => fetched?,
        };
        if let FetchOutcome::Downloaded { bytes } = fetched {
            info!("Artifact ready after downloading {} bytes", bytes);
        }

        match self.launcher.launch(shutdown).await? {
            LaunchOutcome::Exited => Ok(RunOutcome::Completed),
            LaunchOutcome::Interrupted(reason) => Ok(RunOutcome::ShutDown(reason)),
        }
    }
}
