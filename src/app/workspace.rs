//! Temporary workspace cleanup
//!
//! The application writes scratch files to a fixed directory. It is removed
//! before every run; failures are reported but never stop the launch.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::CleanupError;

/// What happened to the temporary directory
#[derive(Debug)]
pub enum CleanupOutcome {
    /// The directory existed and was removed
    Removed,
    /// There was nothing to remove
    NotPresent,
    /// Removal failed; the directory may be partially deleted
    Failed(CleanupError),
}

impl CleanupOutcome {
    /// Whether the directory is known to be gone
    pub fn is_clean(&self) -> bool {
        !matches!(self, CleanupOutcome::Failed(_))
    }
}

/// Best-effort remover for the temporary workspace
#[derive(Debug, Clone)]
pub struct WorkspaceCleaner {
    path: PathBuf,
}

impl WorkspaceCleaner {
    /// Create a cleaner for `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Directory this cleaner removes
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Recursively delete the workspace, logging instead of failing
    pub async fn clean(&self) -> CleanupOutcome {
        println!(
            "[Cleanup] Attempting to delete content of temp dir {}",
            self.path.display()
        );

        let outcome = match tokio::fs::remove_dir_all(&self.path).await {
            Ok(()) => CleanupOutcome::Removed,
            Err(e) if e.kind() == ErrorKind::NotFound => CleanupOutcome::NotPresent,
            Err(source) => CleanupOutcome::Failed(CleanupError::Remove {
                path: self.path.clone(),
                source,
            }),
        };

        match &outcome {
            CleanupOutcome::Removed | CleanupOutcome::NotPresent => {
                debug!("Temp dir cleanup result: {:?}", outcome);
                println!("[Cleanup] Cleanup successful");
            }
            CleanupOutcome::Failed(e) => {
                warn!("Temp dir cleanup failed: {}", e);
                println!("[Cleanup] Failed to delete content of temp dir: {}", e);
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_directory() {
        let temp_dir = tempdir().unwrap();
        let cleaner = WorkspaceCleaner::new(temp_dir.path().join("fooocus"));

        let outcome = cleaner.clean().await;
        assert!(matches!(outcome, CleanupOutcome::NotPresent));
        assert!(outcome.is_clean());
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let temp_dir = tempdir().unwrap();
        let target = temp_dir.path().join("fooocus");
        std::fs::create_dir(&target).unwrap();

        let outcome = WorkspaceCleaner::new(&target).clean().await;
        assert!(matches!(outcome, CleanupOutcome::Removed));
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_non_empty_directory() {
        let temp_dir = tempdir().unwrap();
        let target = temp_dir.path().join("fooocus");
        std::fs::create_dir_all(target.join("gradio/cache")).unwrap();
        std::fs::write(target.join("gradio/cache/image.png"), b"png").unwrap();
        std::fs::write(target.join("log.txt"), b"log").unwrap();

        let outcome = WorkspaceCleaner::new(&target).clean().await;
        assert!(matches!(outcome, CleanupOutcome::Removed));
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_removal_failure_is_reported_not_raised() {
        let temp_dir = tempdir().unwrap();
        // A regular file where the directory should be cannot be removed as a
        // directory, whatever the caller's privileges
        let target = temp_dir.path().join("fooocus");
        std::fs::write(&target, b"not a directory").unwrap();

        let outcome = WorkspaceCleaner::new(&target).clean().await;

        match &outcome {
            CleanupOutcome::Failed(e) => {
                assert!(e.to_string().contains("Failed to delete"));
                assert!(e.to_string().contains("fooocus"));
            }
            other => panic!("Expected CleanupOutcome::Failed, got {:?}", other),
        }
        assert!(!outcome.is_clean());
        assert!(target.is_file());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_permission_denied_never_panics() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir().unwrap();
        let target = temp_dir.path().join("fooocus");
        let locked = target.join("locked");
        std::fs::create_dir_all(&locked).unwrap();
        std::fs::write(locked.join("file.bin"), b"data").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

        let outcome = WorkspaceCleaner::new(&target).clean().await;

        // Root ignores directory permissions and removes everything
        match &outcome {
            CleanupOutcome::Failed(_) => assert!(target.exists()),
            CleanupOutcome::Removed => assert!(!target.exists()),
            CleanupOutcome::NotPresent => panic!("Directory existed before cleanup"),
        }

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).ok();
    }
}
