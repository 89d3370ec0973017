//! Configuration management for the Fooocus launcher
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables, then CLI flags. Every field has a default, so the
//! launcher runs with zero configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::{ClientConfig, ProcessLauncher, RemoteArtifact, WorkspaceCleaner};
use crate::constants::{artifact, config as config_constants, env, launch, workspace};
use crate::errors::{ConfigError, ConfigResult};

/// Unified launcher configuration for TOML serialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LauncherConfig {
    /// Model artifact settings
    pub artifact: ArtifactConfig,
    /// Temporary workspace settings
    pub workspace: WorkspaceConfig,
    /// Downstream application settings
    pub launch: LaunchConfig,
    /// HTTP client settings
    pub client: ClientConfig,
}

/// Which artifact to fetch and where to put it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Download URL
    pub url: String,
    /// Local destination
    pub path: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            url: artifact::MODEL_URL.to_string(),
            path: PathBuf::from(artifact::MODEL_PATH),
        }
    }
}

/// Temporary workspace cleared before each run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Directory to delete
    pub temp_dir: PathBuf,
    /// Whether to delete it at all
    pub clean_on_start: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            temp_dir: PathBuf::from(workspace::TEMP_DIR),
            clean_on_start: true,
        }
    }
}

/// How to start the downstream application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Runtime executable
    pub runtime: String,
    /// Program handed to the runtime
    pub program: PathBuf,
    /// Extra arguments after the program
    pub args: Vec<String>,
    /// Working directory of the application (None = current directory)
    pub working_dir: Option<PathBuf>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            runtime: launch::DEFAULT_RUNTIME.to_string(),
            program: PathBuf::from(launch::PROGRAM),
            args: Vec::new(),
            working_dir: None,
        }
    }
}

/// Values supplied on the command line; `None` leaves the setting alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub model_url: Option<String>,
    pub model_path: Option<PathBuf>,
    pub temp_dir: Option<PathBuf>,
    pub runtime: Option<String>,
    pub program: Option<PathBuf>,
    pub skip_cleanup: bool,
}

impl LauncherConfig {
    /// Load configuration from defaults, file, environment and overrides
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used only if a file is present there.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable or malformed,
    /// or if the resulting configuration is invalid.
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    debug!("No configuration file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env();
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound`, `ConfigError::Read` or
    /// `ConfigError::InvalidFormat`
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&contents)?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Default configuration file location, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| {
            dir.join(config_constants::APP_DIR)
                .join(config_constants::FILE_NAME)
        })
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) {
        if let Ok(runtime) = std::env::var(env::RUNTIME) {
            if !runtime.trim().is_empty() {
                debug!("Runtime overridden by {}", env::RUNTIME);
                self.launch.runtime = runtime.trim().to_string();
            }
        }
    }

    /// Apply command-line overrides
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(url) = &overrides.model_url {
            self.artifact.url = url.clone();
        }
        if let Some(path) = &overrides.model_path {
            self.artifact.path = path.clone();
        }
        if let Some(dir) = &overrides.temp_dir {
            self.workspace.temp_dir = dir.clone();
        }
        if let Some(runtime) = &overrides.runtime {
            self.launch.runtime = runtime.clone();
        }
        if let Some(program) = &overrides.program {
            self.launch.program = program.clone();
        }
        if overrides.skip_cleanup {
            self.workspace.clean_on_start = false;
        }
    }

    /// Check that the configuration describes a runnable launch
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first bad field
    pub fn validate(&self) -> ConfigResult<()> {
        self.remote_artifact()?;

        if self.launch.runtime.trim().is_empty() {
            return Err(invalid("launch.runtime", "", "Runtime cannot be empty"));
        }
        if self.launch.program.as_os_str().is_empty() {
            return Err(invalid("launch.program", "", "Program cannot be empty"));
        }
        if self.workspace.clean_on_start && self.workspace.temp_dir.as_os_str().is_empty() {
            return Err(invalid(
                "workspace.temp_dir",
                "",
                "Temp dir cannot be empty when cleanup is enabled",
            ));
        }
        Ok(())
    }

    /// The artifact described by `[artifact]`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the URL or path is unusable
    pub fn remote_artifact(&self) -> ConfigResult<RemoteArtifact> {
        RemoteArtifact::new(&self.artifact.url, &self.artifact.path).map_err(|e| {
            invalid(
                "artifact",
                &format!("{} -> {}", self.artifact.url, self.artifact.path.display()),
                &e.to_string(),
            )
        })
    }

    /// The cleaner described by `[workspace]`, or `None` if cleanup is off
    pub fn workspace_cleaner(&self) -> Option<WorkspaceCleaner> {
        self.workspace
            .clean_on_start
            .then(|| WorkspaceCleaner::new(&self.workspace.temp_dir))
    }

    /// The launcher described by `[launch]`
    pub fn process_launcher(&self) -> ProcessLauncher {
        let launcher = ProcessLauncher::new(&self.launch.runtime, &self.launch.program)
            .with_args(self.launch.args.clone());
        match &self.launch.working_dir {
            Some(dir) => launcher.with_working_dir(dir),
            None => launcher,
        }
    }
}

fn invalid(field: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
