//! Downstream application launcher
//!
//! Starts the application as a child process with inherited environment and
//! standard streams, then waits for it. If shutdown is requested while the
//! child runs, the child is killed and reaped before returning so it is never
//! left orphaned.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::app::shutdown::{ShutdownListener, ShutdownReason};
use crate::constants::launch;
use crate::errors::{LaunchError, LaunchResult};

/// How a launch ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The application exited with status 0
    Exited,
    /// Shutdown was requested; the application was stopped or never started
    Interrupted(ShutdownReason),
}

/// Runs `<runtime> <program> [args...]` and waits for it
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    runtime: String,
    program: PathBuf,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ProcessLauncher {
    /// Create a launcher for `program`, started through `runtime`
    pub fn new(runtime: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        Self {
            runtime: runtime.into(),
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    /// Extra arguments passed after the program
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Directory the child is started in (defaults to the current one)
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Runtime executable
    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    /// Program handed to the runtime
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// First line of `<runtime> --version`, or `None` if the runtime cannot report one
    pub async fn runtime_version(&self) -> Option<String> {
        let mut command = Command::new(&self.runtime);
        command
            .arg("--version")
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match timeout(launch::VERSION_TIMEOUT, command.output()).await {
            Ok(Ok(output)) if output.status.success() => output,
            Ok(Ok(output)) => {
                debug!("{} --version exited with {}", self.runtime, output.status);
                return None;
            }
            Ok(Err(e)) => {
                debug!("Could not run {} --version: {}", self.runtime, e);
                return None;
            }
            Err(_) => {
                debug!("{} --version timed out", self.runtime);
                return None;
            }
        };

        // Older interpreters print their version on stderr
        [output.stdout, output.stderr]
            .iter()
            .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
            .find(|text| !text.is_empty())
            .and_then(|text| text.lines().next().map(str::to_string))
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    fn build_command(&self) -> Command {
        let mut command = Command::new(&self.runtime);
        command
            .arg(&self.program)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        command
    }

    /// Start the application and wait for it to finish
    ///
    /// # Errors
    ///
    /// Returns `LaunchError` if the child cannot be spawned or awaited, or if
    /// it exits unsuccessfully while no shutdown is in progress.
    pub async fn launch(&self, shutdown: &mut ShutdownListener) -> LaunchResult<LaunchOutcome> {
        if shutdown.is_shutting_down() {
            let reason = shutdown.wait().await;
            debug!("Shutdown requested before launch, not starting the application");
            return Ok(LaunchOutcome::Interrupted(reason));
        }

        println!("[Fooocus] Launching application...");
        let program = self.program_name();

        let mut child = self
            .build_command()
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: program.clone(),
                source,
            })?;

        info!(
            "Started {} {} (pid {:?})",
            self.runtime,
            program,
            child.id()
        );

        tokio::select! {
            status = child.wait() => {
                let status = status.map_err(|source| LaunchError::Wait {
                    program: program.clone(),
                    source,
                })?;

                if !status.success() {
                    // A terminal Ctrl+C reaches the child too and may kill it
                    // before the signal task has recorded the shutdown.
                    if let Ok(reason) = timeout(launch::SIGNAL_GRACE, shutdown.wait()).await {
                        debug!("Application stopped during shutdown with {}", status);
                        return Ok(LaunchOutcome::Interrupted(reason));
                    }
                }

                self.check_status(status)?;
                info!("{} exited successfully", program);
                Ok(LaunchOutcome::Exited)
            }
            reason = shutdown.wait() => {
                warn!("Stopping {} for shutdown", program);
                if let Err(e) = child.start_kill() {
                    debug!("Kill failed, child probably already exited: {}", e);
                }
                match child.wait().await {
                    Ok(status) => debug!("Application reaped with {}", status),
                    Err(e) => warn!("Could not reap application: {}", e),
                }
                Ok(LaunchOutcome::Interrupted(reason))
            }
        }
    }

    fn check_status(&self, status: ExitStatus) -> LaunchResult<()> {
        if status.success() {
            return Ok(());
        }

        match status.code() {
            Some(code) => Err(LaunchError::NonZeroExit {
                program: self.program_name(),
                code,
            }),
            None => Err(LaunchError::Terminated {
                program: self.program_name(),
            }),
        }
    }
}
