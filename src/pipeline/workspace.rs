//! Per-run scratch area holding one git worktree per documented version.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;
use tracing::{debug, warn};

use crate::errors::BuildError;
use crate::git::Git;

/// Temporary root for the version checkouts.
///
/// Dropping it removes the directory and prunes the worktree registry of the source repository.
/// Cleanup failures are logged and never replace the error that ended the run.
pub struct Workspace<'a> {
    dir: Option<TempDir>,
    git: &'a Git<'a>,
}

impl<'a> Workspace<'a> {
    pub fn create(git: &'a Git<'a>) -> Result<Self, BuildError> {
        let dir = tempfile::Builder::new()
            .prefix("multidoc")
            .tempdir()
            .map_err(|e| BuildError::io(std::env::temp_dir(), e))?;
        debug!("workspace: {}", dir.path().display());
        Ok(Self {
            dir: Some(dir),
            git,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir
            .as_ref()
            .map(TempDir::path)
            .unwrap_or_else(|| Path::new(""))
    }

    /// Deterministic checkout location of `label`.
    pub fn version_dir(&self, label: &str) -> PathBuf {
        self.path().join(label)
    }

    /// Create a detached worktree of `branch_ref` at [`Workspace::version_dir`].
    pub fn checkout(&self, label: &str, branch_ref: &str) -> Result<PathBuf> {
        let dir = self.version_dir(label);
        self.git.worktree_add(&dir, branch_ref)?;
        Ok(dir)
    }
}

impl Drop for Workspace<'_> {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                warn!("failed to remove workspace {}: {e}", path.display());
            }
        }
        if let Err(e) = self.git.worktree_prune() {
            warn!("{e:#}");
        }
    }
}
