//! HTTP client for fetching the model artifact
//!
//! The module is organized into two components:
//! - `config`: HTTP client configuration and building
//! - `download`: streaming artifact download with progress reporting

pub mod config;
pub mod download;

pub use config::ClientConfig;
pub use download::{ArtifactFetcher, FetchOutcome, NoProgress, TransferProgress};
