//! Error types for git operations
//!
//! Covers subprocess failures, timeouts, and the domain errors surfaced by
//! the repository tools (clone failures, empty commits, template conflicts).

use thiserror::Error;

/// Errors that can occur when running git operations
#[derive(Error, Debug)]
pub enum GitError {
    /// git is not installed or not in PATH
    #[error("git not found - ensure git is installed and in PATH")]
    GitNotFound,

    /// Failed to spawn the git process
    #[error("failed to spawn git: {0}")]
    Spawn(std::io::Error),

    /// The operation exceeded the configured timeout
    #[error("git {op} timed out after {secs}s")]
    Timeout {
        /// Which git operation timed out
        op: &'static str,
        secs: u64,
    },

    /// git exited with a non-zero status
    #[error("git {op} failed (exit code {code}): {stderr}")]
    Command {
        /// Which git operation failed
        op: &'static str,
        /// Exit code from the git process
        code: i32,
        /// Standard error output, with credentials redacted
        stderr: String,
    },

    /// Cloning the repository failed
    #[error("clone failed: {stderr}")]
    CloneFailed { stderr: String },

    /// There are no staged changes to commit
    #[error("nothing to commit - working tree matches the last commit")]
    NothingToCommit,

    /// Template files collide with existing project files
    #[error(
        "template merge would overwrite {} existing file(s): {}",
        .paths.len(),
        .paths.join(", ")
    )]
    MergeConflict { paths: Vec<String> },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for git operations
pub type GitResult<T> = Result<T, GitError>;
