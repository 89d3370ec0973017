//! Core launcher logic
//!
//! This module contains the launcher components: the artifact fetcher and its
//! HTTP client, the workspace cleaner, the process launcher, the shutdown
//! coordinator and the pipeline that sequences them.
//!
//! # Examples
//!
//! ```rust,no_run
//! use fooocus_launcher::app::{
//!     ArtifactFetcher, ClientConfig, NoProgress, Pipeline, ProcessLauncher, RemoteArtifact,
//!     ShutdownCoordinator, WorkspaceCleaner,
//! };
//! use fooocus_launcher::auth::Credential;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let shutdown = ShutdownCoordinator::new();
//! shutdown.install()?;
//!
//! let pipeline = Pipeline::new(
//!     Some(WorkspaceCleaner::new("/tmp/fooocus")),
//!     ArtifactFetcher::from_config(&ClientConfig::default(), Credential::from_env())?,
//!     RemoteArtifact::new("https://example.com/model.safetensors", "models/model.safetensors")?,
//!     ProcessLauncher::new("python3", "launch.py"),
//! );
//! pipeline.run(&NoProgress, &mut shutdown.listener()).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod launcher;
pub mod models;
pub mod pipeline;
pub mod shutdown;
pub mod workspace;

// Re-export main public API
pub use client::{
    ArtifactFetcher, ClientConfig, FetchOutcome, NoProgress, TransferProgress,
};
pub use launcher::{LaunchOutcome, ProcessLauncher};
pub use models::RemoteArtifact;
pub use pipeline::{Pipeline, RunOutcome};
pub use shutdown::{ShutdownCoordinator, ShutdownListener, ShutdownReason, ShutdownState};
pub use workspace::{CleanupOutcome, WorkspaceCleaner};
