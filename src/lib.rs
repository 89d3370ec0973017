//! Fooocus launcher library
//!
//! Makes sure the default Fooocus checkpoint is on disk, clears the temporary
//! workspace and runs the application, shutting down cleanly on SIGINT or
//! SIGTERM.

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
