//! Data model for the launcher
//!
//! The only domain entity is the remote artifact: a URL paired with the
//! local path it must be materialized at.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::constants::files;
use crate::errors::{DownloadError, DownloadResult};

/// A remote file that must exist locally before launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteArtifact {
    url: Url,
    destination: PathBuf,
}

impl RemoteArtifact {
    /// Create an artifact from a URL string and a destination path
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::InvalidUrl` if the URL cannot be parsed or is
    /// not HTTP(S), and `DownloadError::InvalidDestination` if the path has
    /// no file name.
    pub fn new(url: &str, destination: impl Into<PathBuf>) -> DownloadResult<Self> {
        let parsed = Url::parse(url).map_err(|e| DownloadError::InvalidUrl {
            url: url.to_string(),
            error: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DownloadError::InvalidUrl {
                url: url.to_string(),
                error: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let destination = destination.into();
        if destination.file_name().is_none() {
            return Err(DownloadError::InvalidDestination { path: destination });
        }

        Ok(Self {
            url: parsed,
            destination,
        })
    }

    /// Source URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Local destination path
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Path the body is streamed to before it is renamed into place
    pub fn partial_path(&self) -> PathBuf {
        let mut name = self
            .destination
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(files::PARTIAL_FILE_SUFFIX);
        self.destination.with_file_name(name)
    }

    /// Whether a non-empty file is already present at the destination
    pub async fn is_present(&self) -> bool {
        match tokio::fs::metadata(&self.destination).await {
            Ok(metadata) => metadata.is_file() && metadata.len() > 0,
            Err(_) => false,
        }
    }
}

impl fmt::Display for RemoteArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.url, self.destination.display())
    }
}
