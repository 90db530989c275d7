//! Thin wrapper over the `git` CLI: remote branch listing and worktree management.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::{CommandRunner, ExecOutput, ExecRequest};

/// Remote every version branch is read from.
pub const BASE_REMOTE: &str = "origin/";

/// Glob passed to `git branch --list` to select version branches.
pub const VERSION_BRANCH_PATTERN: &str = "origin/v*";

pub struct Git<'a> {
    runner: &'a dyn CommandRunner,
    repo: Option<PathBuf>,
}

impl<'a> Git<'a> {
    /// Operate on the repository containing the current working directory.
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner, repo: None }
    }

    /// Operate on the repository at `repo` (`git -C <repo>`).
    pub fn in_repo(runner: &'a dyn CommandRunner, repo: &Path) -> Self {
        Self {
            runner,
            repo: Some(repo.to_path_buf()),
        }
    }

    /// Run a git command with optional -C <repo>; non-zero exit is an error.
    pub fn git(&self, args: &[&str]) -> Result<ExecOutput> {
        let mut req = ExecRequest::new("git");
        if let Some(ref r) = self.repo {
            req = req.arg("-C").arg(r);
        }
        req = req.args(args.iter().copied());
        let out = self.runner.run(req)?;
        Ok(out.into_checked()?)
    }

    /// Remote-tracking branches matching `pattern`, trimmed, in descending lexical order.
    pub fn list_remote_branches(&self, pattern: &str) -> Result<Vec<String>> {
        let out = self
            .git(&["branch", "--remotes", "--list", pattern])
            .context("failed to retrieve branches")?;
        let mut branches: Vec<String> = out
            .stdout
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(|l| l.to_string())
            .collect();
        branches.sort_unstable_by(|a, b| b.cmp(a));
        Ok(branches)
    }

    /// `git worktree add <path> <branch_ref>` (detached checkout of a remote ref).
    pub fn worktree_add(&self, path: &Path, branch_ref: &str) -> Result<()> {
        let path_str = path.to_string_lossy();
        self.git(&["worktree", "add", "--detach", &path_str, branch_ref])
            .with_context(|| {
                format!(
                    "failed to add worktree on path {} for version {}",
                    path.display(),
                    branch_ref
                )
            })?;
        Ok(())
    }

    /// `git worktree prune`: forget worktrees whose directories are gone.
    pub fn worktree_prune(&self) -> Result<()> {
        self.git(&["worktree", "prune"])
            .context("failed to prune worktrees")?;
        Ok(())
    }
}

/// Strip the remote prefix from a branch reference (`origin/v1.4` -> `v1.4`).
pub fn short_name(branch_ref: &str) -> &str {
    branch_ref.strip_prefix(BASE_REMOTE).unwrap_or(branch_ref)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("origin/v1.4"), "v1.4");
        assert_eq!(short_name("v1.4.6"), "v1.4.6");
        assert_eq!(short_name("origin/feature/x"), "feature/x");
    }
}
