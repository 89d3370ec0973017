//! Application constants for the Fooocus launcher
//!
//! This module centralizes the fixed values of the launcher, organized by
//! functional domain. Most of them are defaults that can be overridden via
//! the configuration file or CLI flags.

use std::time::Duration;

/// Environment variable names
pub mod env {
    /// Bearer token used for gated HuggingFace downloads
    pub const TOKEN: &str = "HUGGINGFACE_TOKEN";

    /// Overrides the runtime executable used to start the application
    pub const RUNTIME: &str = "FOOOCUS_PYTHON";
}

/// The default model artifact
pub mod artifact {
    /// Download URL of the default checkpoint
    pub const MODEL_URL: &str = "https://huggingface.co/oieieio/juggernautXL_v8Rundiffusion/resolve/main/juggernautXL_v8Rundiffusion.safetensors";

    /// Destination of the default checkpoint, relative to the working directory
    pub const MODEL_PATH: &str = "models/checkpoints/juggernautXL_v8Rundiffusion.safetensors";
}

/// Temporary workspace
pub mod workspace {
    /// Directory cleared before each run
    pub const TEMP_DIR: &str = "/tmp/fooocus";
}

/// Downstream application
pub mod launch {
    use super::Duration;

    /// Default runtime used to start the application
    #[cfg(windows)]
    pub const DEFAULT_RUNTIME: &str = "python";

    /// Default runtime used to start the application
    #[cfg(not(windows))]
    pub const DEFAULT_RUNTIME: &str = "python3";

    /// Entry script of the application
    pub const PROGRAM: &str = "launch.py";

    /// Version of the application this launcher ships with
    pub const APP_VERSION: &str = "2.5.5";

    /// How long a failed application exit waits for a pending signal to be recorded
    pub const SIGNAL_GRACE: Duration = Duration::from_millis(500);

    /// Upper bound for `<runtime> --version` at startup
    pub const VERSION_TIMEOUT: Duration = Duration::from_secs(5);
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("fooocus-launcher/", env!("CARGO_PKG_VERSION"));

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// TCP keep-alive interval
    pub const TCP_KEEPALIVE: Duration = Duration::from_secs(30);

    /// Maximum number of redirects to follow
    pub const MAX_REDIRECTS: usize = 10;
}

/// File handling constants
pub mod files {
    /// Size of the chunks written to disk while streaming a download
    pub const CHUNK_SIZE: usize = 8 * 1024;

    /// Suffix of the in-progress download file
    pub const PARTIAL_FILE_SUFFIX: &str = ".part";
}

/// Progress reporting constants
pub mod progress {
    use super::Duration;

    /// Spinner/bar redraw interval
    pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

    /// Interval between plain-text progress lines when not on a terminal
    pub const TEXT_REPORT_INTERVAL: Duration = Duration::from_secs(10);
}

/// Configuration file discovery
pub mod config {
    /// Directory name under the platform config dir
    pub const APP_DIR: &str = "fooocus-launcher";

    /// Configuration file name
    pub const FILE_NAME: &str = "config.toml";
}

/// Process exit codes
pub mod exit {
    /// Normal completion or graceful shutdown
    pub const SUCCESS: i32 = 0;

    /// Any fatal error
    pub const FAILURE: i32 = 1;
}
