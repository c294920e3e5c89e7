//! Git backend abstraction
//!
//! Repository handlers talk to git through the [`GitBackend`] trait rather
//! than shelling out directly, so the subprocess implementation can be
//! swapped for a library-based one without touching tool logic.

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;

pub mod cli;
pub mod error;

pub use cli::GitCli;
pub use error::{GitError, GitResult};

/// What to commit and where to push it
#[derive(Debug, Clone)]
pub struct CommitRequest {
    /// Commit message
    pub message: String,
    /// Paths to stage, relative to the working directory. Empty stages
    /// everything, including deletions.
    pub paths: Vec<String>,
    /// Remote URL to push to, without credentials
    pub remote_url: String,
    /// Branch to push to
    pub branch: String,
}

/// Result of merging a template into a working tree
#[derive(Debug, Clone, Serialize)]
pub struct MergeOutcome {
    /// Number of files copied from the template
    pub files_copied: usize,
    /// Files that already existed and were overwritten (force mode only)
    pub overwritten: Vec<String>,
}

/// Narrow interface over the git operations the repository tools need
#[async_trait]
pub trait GitBackend: Send + Sync {
    /// Clone `remote_url` into `dest`. `branch` selects a branch other than
    /// the remote default. `dest` must not already contain a repository.
    async fn clone_repo(&self, remote_url: &str, branch: Option<&str>, dest: &Path)
        -> GitResult<()>;

    /// Stage, commit, and push in one step. Returns the new commit hash.
    ///
    /// Fails with [`GitError::NothingToCommit`] when staging produces no
    /// changes, before any commit or push happens.
    async fn commit_and_push(&self, workdir: &Path, request: &CommitRequest) -> GitResult<String>;

    /// Copy the contents of a template repository into `workdir`, skipping
    /// git metadata. Without `force`, any collision with an existing file
    /// aborts the merge with [`GitError::MergeConflict`] before copying.
    async fn merge_template(
        &self,
        template_url: &str,
        workdir: &Path,
        force: bool,
    ) -> GitResult<MergeOutcome>;
}
