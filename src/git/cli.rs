//! Subprocess-based git backend
//!
//! Every invocation runs `git` with piped output, a hard timeout, and
//! prompts disabled, so a stalled network or credential helper can never
//! hang the server. Credentials are injected into remote URLs just before
//! use and scrubbed from anything that leaves this module.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;
use walkdir::WalkDir;

use super::error::{GitError, GitResult};
use super::{CommitRequest, GitBackend, MergeOutcome};
use crate::config::Config;

/// Git backend that shells out to the `git` CLI
pub struct GitCli {
    timeout: Duration,
    token: Option<String>,
}

impl GitCli {
    pub fn new(timeout_secs: u64, token: Option<String>) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.git.timeout_secs, config.token.clone())
    }

    /// Replace the token with `***` wherever it appears
    fn redact(&self, text: &str) -> String {
        match &self.token {
            Some(token) => text.replace(token, "***"),
            None => text.to_string(),
        }
    }

    /// Embed the token as userinfo in an https remote URL.
    ///
    /// Non-https URLs (ssh remotes, local paths) pass through unchanged.
    fn authenticated(&self, remote_url: &str) -> String {
        let Some(token) = &self.token else {
            return remote_url.to_string();
        };

        match url::Url::parse(remote_url) {
            Ok(mut parsed)
                if matches!(parsed.scheme(), "http" | "https")
                    && parsed.username().is_empty() =>
            {
                if parsed.set_username(token).is_ok() {
                    parsed.to_string()
                } else {
                    remote_url.to_string()
                }
            }
            _ => remote_url.to_string(),
        }
    }

    /// Run git and collect its output, without checking the exit status
    async fn output(
        &self,
        op: &'static str,
        args: &[&str],
        cwd: &Path,
    ) -> GitResult<std::process::Output> {
        debug!("executing: git {}", self.redact(&args.join(" ")));

        let mut cmd = Command::new("git");
        cmd.args(args)
            .current_dir(cwd)
            // Fail instead of prompting for credentials on stdin
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let result = tokio::time::timeout(self.timeout, cmd.output()).await;

        match result {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => Err(GitError::GitNotFound),
            Ok(Err(e)) => Err(GitError::Spawn(e)),
            Err(_elapsed) => Err(GitError::Timeout {
                op,
                secs: self.timeout.as_secs(),
            }),
        }
    }

    /// Run git and return trimmed stdout, failing on non-zero exit
    async fn run(&self, op: &'static str, args: &[&str], cwd: &Path) -> GitResult<String> {
        let output = self.output(op, args, cwd).await?;

        if !output.status.success() {
            let stderr = self.redact(&String::from_utf8_lossy(&output.stderr));
            let code = output.status.code().unwrap_or(-1);
            return Err(GitError::Command { op, code, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl GitBackend for GitCli {
    async fn clone_repo(
        &self,
        remote_url: &str,
        branch: Option<&str>,
        dest: &Path,
    ) -> GitResult<()> {
        let auth_url = self.authenticated(remote_url);
        // The child runs from dest's parent, so a relative dest would
        // resolve against that parent and land one level too deep.
        let dest = absolute_dest(dest)?;
        let dest_str = dest.display().to_string();

        let mut args = vec!["clone"];
        if let Some(branch) = branch {
            args.extend(["--branch", branch]);
        }
        args.push(&auth_url);
        args.push(&dest_str);

        let cwd = dest.parent().unwrap_or_else(|| Path::new("/"));
        tokio::fs::create_dir_all(cwd).await?;

        let output = self.output("clone", &args, cwd).await?;
        if !output.status.success() {
            let stderr = self.redact(&String::from_utf8_lossy(&output.stderr));
            return Err(GitError::CloneFailed { stderr });
        }

        Ok(())
    }

    async fn commit_and_push(&self, workdir: &Path, request: &CommitRequest) -> GitResult<String> {
        // Stage requested paths, or everything
        if request.paths.is_empty() {
            self.run("add", &["add", "-A"], workdir).await?;
        } else {
            let mut args = vec!["add", "--"];
            args.extend(request.paths.iter().map(String::as_str));
            self.run("add", &args, workdir).await?;
        }

        // `diff --cached --quiet` exits 0 when the index matches HEAD
        let staged = self
            .output("diff", &["diff", "--cached", "--quiet"], workdir)
            .await?;
        match staged.status.code() {
            Some(0) => return Err(GitError::NothingToCommit),
            Some(1) => {}
            code => {
                let stderr = self.redact(&String::from_utf8_lossy(&staged.stderr));
                return Err(GitError::Command {
                    op: "diff",
                    code: code.unwrap_or(-1),
                    stderr,
                });
            }
        }

        self.run("commit", &["commit", "-m", &request.message], workdir)
            .await?;

        // Push to the URL directly so the token never lands in .git/config
        let auth_url = self.authenticated(&request.remote_url);
        let refspec = format!("HEAD:{}", request.branch);
        self.run("push", &["push", &auth_url, &refspec], workdir)
            .await?;

        self.run("rev-parse", &["rev-parse", "HEAD"], workdir).await
    }

    async fn merge_template(
        &self,
        template_url: &str,
        workdir: &Path,
        force: bool,
    ) -> GitResult<MergeOutcome> {
        // Clone into a scratch directory that is removed on drop
        let staging = tempfile::tempdir()?;
        let checkout = staging.path().join("template");

        self.clone_repo(template_url, None, &checkout).await?;

        copy_tree(&checkout, workdir, force)
    }
}

/// Pin a clone destination to the server's working directory
fn absolute_dest(dest: &Path) -> std::io::Result<PathBuf> {
    if dest.is_absolute() {
        Ok(dest.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(dest))
    }
}

/// Copy every regular file under `src` into `dst`, skipping `.git`.
///
/// Collisions with existing files abort before any copy unless `force` is
/// set, in which case they are overwritten and reported.
pub(crate) fn copy_tree(src: &Path, dst: &Path, force: bool) -> GitResult<MergeOutcome> {
    let mut files = Vec::new();

    let walker = WalkDir::new(src)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");

    for entry in walker {
        let entry = entry.map_err(walk_error)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|_| GitError::Io(std::io::Error::other("path outside template root")))?
            .to_path_buf();
        files.push((entry.into_path(), rel));
    }

    let mut conflicts: Vec<String> = files
        .iter()
        .filter(|(_, rel)| dst.join(rel).exists())
        .map(|(_, rel)| rel.display().to_string())
        .collect();
    conflicts.sort();

    if !conflicts.is_empty() && !force {
        return Err(GitError::MergeConflict { paths: conflicts });
    }

    for (abs, rel) in &files {
        let target = dst.join(rel);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(abs, &target)?;
    }

    Ok(MergeOutcome {
        files_copied: files.len(),
        overwritten: conflicts,
    })
}

fn walk_error(e: walkdir::Error) -> GitError {
    let msg = e.to_string();
    GitError::Io(
        e.into_io_error()
            .unwrap_or_else(|| std::io::Error::other(msg)),
    )
}
