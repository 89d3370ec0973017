//! Artifact download with streaming writes and progress reporting
//!
//! The body is streamed to a `.part` file next to the destination in
//! fixed-size chunks and renamed into place once the transfer completes, so
//! an interrupted run never leaves a truncated file at the final path.

use std::path::Path;

use futures::StreamExt;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

use crate::app::client::config::ClientConfig;
use crate::app::models::RemoteArtifact;
use crate::auth::Credential;
use crate::constants::files;
use crate::errors::{DownloadError, DownloadResult};

/// Receives byte counts while an artifact is transferred
///
/// `total` is `None` when the server did not declare a `Content-Length`.
pub trait TransferProgress: Send + Sync {
    /// Called once the response headers are in
    fn start(&self, total: Option<u64>);

    /// Called after every chunk written to disk
    fn advance(&self, bytes: u64);

    /// Called when the whole body has been written
    fn finish(&self);

    /// Called when the transfer fails part-way
    fn abandon(&self) {}
}

/// Progress sink that discards every update
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl TransferProgress for NoProgress {
    fn start(&self, _total: Option<u64>) {}
    fn advance(&self, _bytes: u64) {}
    fn finish(&self) {}
}

/// Result of ensuring an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The destination already held a non-empty file; nothing was requested
    AlreadyPresent,
    /// The artifact was downloaded
    Downloaded { bytes: u64 },
}

/// Makes sure a remote artifact exists on disk
#[derive(Debug, Clone)]
pub struct ArtifactFetcher {
    client: Client,
    credential: Option<Credential>,
}

impl ArtifactFetcher {
    /// Creates a fetcher from an existing HTTP client
    pub fn new(client: Client, credential: Option<Credential>) -> Self {
        Self { client, credential }
    }

    /// Creates a fetcher with a client built from `config`
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::Http` if the HTTP client cannot be built
    pub fn from_config(
        config: &ClientConfig,
        credential: Option<Credential>,
    ) -> DownloadResult<Self> {
        Ok(Self::new(config.build_http_client()?, credential))
    }

    /// Whether requests carry a bearer token
    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// Ensures the artifact exists at its destination, downloading it if absent
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - Parent directories cannot be created
    /// - The HTTP request fails or returns a non-success status
    /// - Writing or renaming the file fails
    /// - Fewer bytes arrive than the server declared
    pub async fn ensure(
        &self,
        artifact: &RemoteArtifact,
        progress: &dyn TransferProgress,
    ) -> DownloadResult<FetchOutcome> {
        let destination = artifact.destination();

        if artifact.is_present().await {
            println!(
                "[Model Download] Model already exists at {}",
                destination.display()
            );
            info!("Skipping download, {} is present", destination.display());
            return Ok(FetchOutcome::AlreadyPresent);
        }

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        println!(
            "[Model Download] Downloading: \"{}\" to {}",
            artifact.url(),
            destination.display()
        );

        let partial_path = artifact.partial_path();
        match self.download_to(artifact, &partial_path, progress).await {
            Ok(bytes) => {
                tokio::fs::rename(&partial_path, destination)
                    .await
                    .map_err(|source| DownloadError::AtomicOperationFailed {
                        temp_path: partial_path.clone(),
                        final_path: destination.to_path_buf(),
                        source,
                    })?;

                println!(
                    "[Model Download] Successfully downloaded model to {}",
                    destination.display()
                );
                info!("Downloaded {} bytes to {}", bytes, destination.display());
                Ok(FetchOutcome::Downloaded { bytes })
            }
            Err(e) => {
                progress.abandon();
                if let Err(remove_err) = tokio::fs::remove_file(&partial_path).await {
                    if remove_err.kind() != std::io::ErrorKind::NotFound {
                        warn!(
                            "Could not remove partial download {}: {}",
                            partial_path.display(),
                            remove_err
                        );
                    }
                }
                Err(e)
            }
        }
    }

    /// Streams the response body into `partial_path`, returning the byte count
    async fn download_to(
        &self,
        artifact: &RemoteArtifact,
        partial_path: &Path,
        progress: &dyn TransferProgress,
    ) -> DownloadResult<u64> {
        let mut request = self.client.get(artifact.url().clone());
        if let Some(credential) = &self.credential {
            request = request.header(AUTHORIZATION, credential.authorization_header());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::ServerError {
                status: status.as_u16(),
            });
        }

        let total = response.content_length();
        debug!("Response {} with content length {:?}", status, total);
        progress.start(total);

        let file = File::create(partial_path).await?;
        let mut writer = BufWriter::with_capacity(files::CHUNK_SIZE, file);
        let mut stream = response.bytes_stream();
        let mut received: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            for piece in chunk.chunks(files::CHUNK_SIZE) {
                writer.write_all(piece).await?;
                received += piece.len() as u64;
                progress.advance(piece.len() as u64);
            }
        }

        writer.flush().await?;
        writer.get_ref().sync_all().await?;

        if let Some(expected) = total {
            if received != expected {
                return Err(DownloadError::IncompleteDownload { received, expected });
            }
        }

        progress.finish();
        Ok(received)
    }
}
