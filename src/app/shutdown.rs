//! Signal handling for graceful shutdown
//!
//! The coordinator owns a two-state machine, `Running -> ShuttingDown`.
//! SIGINT (Ctrl+C) and SIGTERM move it to `ShuttingDown`; nothing moves it
//! back. Long-running steps race their work against a `ShutdownListener`.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Why shutdown was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT / Ctrl+C
    Interrupt,
    /// SIGTERM
    Terminate,
    /// Requested programmatically
    Requested,
}

/// State of the shutdown machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownState {
    Running,
    ShuttingDown(ShutdownReason),
}

/// Owns the shutdown state and the signal listener task
#[derive(Debug, Clone)]
pub struct ShutdownCoordinator {
    state_tx: Arc<watch::Sender<ShutdownState>>,
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownCoordinator {
    /// Create a coordinator in the `Running` state
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(ShutdownState::Running);
        Self {
            state_tx: Arc::new(state_tx),
        }
    }

    /// Register the SIGINT/SIGTERM handlers and spawn the listener task
    ///
    /// Signal streams are registered before this returns, so a signal that
    /// arrives at any later point is intercepted instead of killing the
    /// process with the default disposition.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the OS refuses to install a handler
    #[cfg(unix)]
    pub fn install(&self) -> std::io::Result<JoinHandle<()>> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;
        let state_tx = Arc::clone(&self.state_tx);

        debug!("Installed SIGINT and SIGTERM handlers");

        Ok(tokio::spawn(async move {
            let reason = tokio::select! {
                _ = interrupt.recv() => {
                    info!("Ctrl+C signal received");
                    ShutdownReason::Interrupt
                },
                _ = terminate.recv() => {
                    info!("SIGTERM signal received");
                    ShutdownReason::Terminate
                },
            };

            transition(&state_tx, reason);
        }))
    }

    /// Register the Ctrl+C handler and spawn the listener task
    #[cfg(not(unix))]
    pub fn install(&self) -> std::io::Result<JoinHandle<()>> {
        let state_tx = Arc::clone(&self.state_tx);

        Ok(tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl+C signal received");
                transition(&state_tx, ShutdownReason::Interrupt);
            }
        }))
    }

    /// Request shutdown without a signal
    ///
    /// Returns `true` if this call moved the machine out of `Running`.
    pub fn trigger(&self, reason: ShutdownReason) -> bool {
        transition(&self.state_tx, reason)
    }

    /// Current state
    pub fn state(&self) -> ShutdownState {
        *self.state_tx.borrow()
    }

    /// Subscribe to the shutdown state
    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener {
            state_rx: self.state_tx.subscribe(),
        }
    }
}

fn transition(state_tx: &watch::Sender<ShutdownState>, reason: ShutdownReason) -> bool {
    let changed = state_tx.send_if_modified(|state| match state {
        ShutdownState::Running => {
            *state = ShutdownState::ShuttingDown(reason);
            true
        }
        ShutdownState::ShuttingDown(_) => false,
    });

    if changed {
        info!("Received {:?}, initiating shutdown", reason);
    }
    changed
}

/// Read side of the shutdown state
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    state_rx: watch::Receiver<ShutdownState>,
}

impl ShutdownListener {
    /// Whether shutdown has been requested
    pub fn is_shutting_down(&self) -> bool {
        matches!(*self.state_rx.borrow(), ShutdownState::ShuttingDown(_))
    }

    /// Wait until shutdown is requested and return the reason
    ///
    /// Resolves immediately if shutdown was already requested. Never
    /// resolves if the coordinator is dropped while still running.
    pub async fn wait(&mut self) -> ShutdownReason {
        let result = self
            .state_rx
            .wait_for(|state| matches!(state, ShutdownState::ShuttingDown(_)))
            .await
            .map(|state| *state);

        match result {
            Ok(ShutdownState::ShuttingDown(reason)) => reason,
            _ => std::future::pending().await,
        }
    }
}
