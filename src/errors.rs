//! Error types for the Fooocus launcher
//!
//! Each launcher component has its own error enum. Cleanup errors are only
//! ever logged; download, launch and configuration errors travel up to the
//! binary, which turns them into an exit status.

use std::path::PathBuf;
use thiserror::Error;

use crate::constants::exit;

/// Download and HTTP client errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error during file operations
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid URL provided
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Server returned error status
    #[error("Server error: HTTP {status}")]
    ServerError { status: u16 },

    /// Destination path cannot hold a file
    #[error("Invalid destination path: {path}")]
    InvalidDestination { path: PathBuf },

    /// Incomplete download
    #[error("Incomplete download: received {received} bytes, expected {expected} bytes")]
    IncompleteDownload { received: u64, expected: u64 },

    /// Moving the finished download into place failed
    #[error("Could not rename {temp_path} to {final_path}: {source}")]
    AtomicOperationFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
        source: std::io::Error,
    },
}

/// Downstream process errors
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The child could not be started
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// Waiting on the child failed
    #[error("Failed to wait for {program}: {source}")]
    Wait {
        program: String,
        source: std::io::Error,
    },

    /// The child exited with a non-zero status
    #[error("{program} exited with status {code}")]
    NonZeroExit { program: String, code: i32 },

    /// The child was terminated by a signal
    #[error("{program} was terminated by a signal")]
    Terminated { program: String },
}

/// Temporary workspace errors
#[derive(Error, Debug)]
pub enum CleanupError {
    /// Removing the directory failed
    #[error("Failed to delete {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Launch error
    #[error(transparent)]
    Launch(#[from] LaunchError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Download(_) => "download",
            AppError::Launch(_) => "launch",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        exit::FAILURE
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Download result type alias
pub type DownloadResult<T> = std::result::Result<T, DownloadError>;

/// Launch result type alias
pub type LaunchResult<T> = std::result::Result<T, LaunchError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
