//! Repository lifecycle handlers
//!
//! create_repository talks to the hosting API only; clone_repository and
//! commit_and_push bridge the remote repository and the local working tree;
//! merge_template_repository layers a starter template into the checkout.

use rmcp::model::{CallToolResult, Content};
use rmcp::ErrorData as McpError;
use tracing::{info, warn};

use super::{
    api_error_to_mcp, context_error_to_mcp, err_data, git_error_to_mcp, workspace_error_to_mcp,
    ErrorKind,
};
use crate::config::Config;
use crate::context::{validate_project_name, ProjectContext, ProjectRegistry};
use crate::git::{CommitRequest, GitBackend};
use crate::github::{GitHubClient, NewRepository, Repository};
use crate::params::{CloneRepositoryParams, CommitAndPushParams, MergeTemplateRepositoryParams};
use crate::types::{CloneResponse, CommitResponse, MergeTemplateResponse, RepositoryResponse};
use crate::workspace;

/// Create a remote repository for the authenticated user.
///
/// The name defaults to the active project; when they match, the new
/// remote's URLs are cached on the context for later clone/push calls.
pub async fn create_repository(
    github: &GitHubClient,
    registry: &ProjectRegistry,
    params: crate::params::CreateRepositoryParams,
) -> Result<CallToolResult, McpError> {
    let name = match params.name {
        Some(name) => name,
        None => registry.current().map_err(context_error_to_mcp)?.name,
    };
    validate_project_name(&name).map_err(context_error_to_mcp)?;

    let new_repo = NewRepository {
        description: Some(
            params
                .description
                .unwrap_or_else(|| format!("Repository for {}", name)),
        ),
        private: params.private == Some(true),
        auto_init: true,
        name,
    };

    let repo = github
        .create_repository(&new_repo)
        .await
        .map_err(api_error_to_mcp)?;
    info!("created repository {}", repo.full_name);

    cache_remote(registry, &repo);

    Ok(CallToolResult::success(vec![Content::json(
        &RepositoryResponse {
            name: repo.name,
            full_name: repo.full_name,
            private: repo.private,
            html_url: repo.html_url,
            clone_url: repo.clone_url,
            description: repo.description,
            default_branch: repo.default_branch,
        },
    )?]))
}

/// Clone the active project's repository into its working directory
pub async fn clone_repository(
    config: &Config,
    github: &GitHubClient,
    git: &dyn GitBackend,
    registry: &ProjectRegistry,
    params: CloneRepositoryParams,
) -> Result<CallToolResult, McpError> {
    let ctx = registry.current().map_err(context_error_to_mcp)?;

    let (clone_url, default_branch) =
        resolve_remote(github, registry, &ctx).await.map_err(api_error_to_mcp)?;
    let branch = params
        .branch
        .or(default_branch)
        .unwrap_or_else(|| config.git.branch.clone());

    // Replace whatever is at the destination; a failure here surfaces
    // through the clone itself if the directory is non-empty
    if ctx.local_path.exists() {
        if let Err(e) = tokio::fs::remove_dir_all(&ctx.local_path).await {
            warn!("could not clear {}: {}", ctx.local_path.display(), e);
        }
    }

    git.clone_repo(&clone_url, Some(&branch), &ctx.local_path)
        .await
        .map_err(git_error_to_mcp)?;
    info!("cloned {} ({}) into {}", ctx.name, branch, ctx.local_path.display());

    Ok(CallToolResult::success(vec![Content::json(
        &CloneResponse {
            name: ctx.name,
            local_path: ctx.local_path.display().to_string(),
            remote_url: clone_url,
            branch,
        },
    )?]))
}

/// Copy a template repository's files into the active project's checkout
pub async fn merge_template_repository(
    config: &Config,
    git: &dyn GitBackend,
    registry: &ProjectRegistry,
    params: MergeTemplateRepositoryParams,
) -> Result<CallToolResult, McpError> {
    let ctx = registry.current().map_err(context_error_to_mcp)?;
    require_worktree(&ctx)?;

    let template_url = params
        .template_url
        .unwrap_or_else(|| config.template.url.clone());
    let force = params.force == Some(true);

    let outcome = git
        .merge_template(&template_url, &ctx.local_path, force)
        .await
        .map_err(git_error_to_mcp)?;
    info!(
        "merged {} files from {} into {}",
        outcome.files_copied,
        template_url,
        ctx.local_path.display()
    );

    Ok(CallToolResult::success(vec![Content::json(
        &MergeTemplateResponse::new(template_url, outcome),
    )?]))
}

/// Stage, commit, and push the active project's changes
pub async fn commit_and_push(
    config: &Config,
    github: &GitHubClient,
    git: &dyn GitBackend,
    registry: &ProjectRegistry,
    params: CommitAndPushParams,
) -> Result<CallToolResult, McpError> {
    let ctx = registry.current().map_err(context_error_to_mcp)?;
    require_worktree(&ctx)?;

    // Catch escaping paths before git sees them
    let paths = params.paths.unwrap_or_default();
    for path in &paths {
        workspace::resolve_rel_path(&ctx.local_path, path).map_err(workspace_error_to_mcp)?;
    }

    let (remote_url, default_branch) =
        resolve_remote(github, registry, &ctx).await.map_err(api_error_to_mcp)?;
    let branch = default_branch.unwrap_or_else(|| config.git.branch.clone());

    let request = CommitRequest {
        message: params.commit_message,
        paths,
        remote_url: remote_url.clone(),
        branch: branch.clone(),
    };

    let commit = git
        .commit_and_push(&ctx.local_path, &request)
        .await
        .map_err(git_error_to_mcp)?;
    info!("pushed {} to {} ({})", &commit[..commit.len().min(12)], ctx.name, branch);

    Ok(CallToolResult::success(vec![Content::json(
        &CommitResponse {
            commit,
            message: request.message,
            branch,
            remote_url,
        },
    )?]))
}

/// The working tree must exist before template merges and pushes
fn require_worktree(ctx: &ProjectContext) -> Result<(), McpError> {
    if ctx.local_path.join(".git").is_dir() {
        Ok(())
    } else {
        Err(McpError::invalid_request(
            format!(
                "no repository checked out at {} - run clone_repository or setup_existing_repository first",
                ctx.local_path.display()
            ),
            err_data(ErrorKind::Git),
        ))
    }
}

/// The remote clone URL and default branch for the active project, from the
/// context cache or the hosting API
async fn resolve_remote(
    github: &GitHubClient,
    registry: &ProjectRegistry,
    ctx: &ProjectContext,
) -> Result<(String, Option<String>), crate::github::ApiError> {
    if let Some(url) = &ctx.clone_url {
        return Ok((url.clone(), ctx.default_branch.clone()));
    }

    let repo = github.get_repository(&ctx.name).await?;
    cache_remote(registry, &repo);
    Ok((repo.clone_url, repo.default_branch))
}

/// Remember a repository's URLs on the active context when names match
fn cache_remote(registry: &ProjectRegistry, repo: &Repository) {
    let matches = registry
        .current()
        .map(|ctx| ctx.name == repo.name)
        .unwrap_or(false);
    if matches {
        let _ = registry.update(|ctx| {
            ctx.clone_url = Some(repo.clone_url.clone());
            ctx.html_url = Some(repo.html_url.clone());
            ctx.default_branch = repo.default_branch.clone();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use crate::git::{GitResult, MergeOutcome};

    /// Records calls instead of running git
    #[derive(Default)]
    struct StubGit {
        cloned: Mutex<Vec<(String, Option<String>, PathBuf)>>,
        committed: Mutex<Vec<CommitRequest>>,
    }

    #[async_trait]
    impl GitBackend for StubGit {
        async fn clone_repo(
            &self,
            remote_url: &str,
            branch: Option<&str>,
            dest: &Path,
        ) -> GitResult<()> {
            std::fs::create_dir_all(dest.join(".git")).unwrap();
            self.cloned.lock().unwrap().push((
                remote_url.to_string(),
                branch.map(str::to_string),
                dest.to_path_buf(),
            ));
            Ok(())
        }

        async fn commit_and_push(
            &self,
            _workdir: &Path,
            request: &CommitRequest,
        ) -> GitResult<String> {
            self.committed.lock().unwrap().push(request.clone());
            Ok("0123456789abcdef0123456789abcdef01234567".to_string())
        }

        async fn merge_template(
            &self,
            _template_url: &str,
            _workdir: &Path,
            _force: bool,
        ) -> GitResult<MergeOutcome> {
            Ok(MergeOutcome {
                files_copied: 3,
                overwritten: Vec::new(),
            })
        }
    }

    fn offline_github() -> GitHubClient {
        // Token left unset; these tests never reach the network
        let mut config = Config::default();
        config.github.api_url = "http://127.0.0.1:1".to_string();
        GitHubClient::new(&config).unwrap()
    }

    fn context_with_remote(dir: &Path) -> (ProjectRegistry, ProjectContext) {
        let registry = ProjectRegistry::new();
        let mut ctx = ProjectContext::new("demo", dir.join("demo"));
        ctx.clone_url = Some("https://github.com/user/demo.git".to_string());
        registry.set(ctx.clone());
        (registry, ctx)
    }

    fn kind_of(err: &McpError) -> String {
        err.data
            .as_ref()
            .and_then(|d| d.get("kind"))
            .and_then(|k| k.as_str())
            .unwrap_or_default()
            .to_string()
    }

    #[tokio::test]
    async fn test_clone_requires_active_project() {
        let config = Config::default();
        let github = offline_github();
        let git = StubGit::default();
        let registry = ProjectRegistry::new();

        let err = clone_repository(
            &config,
            &github,
            &git,
            &registry,
            CloneRepositoryParams { branch: None },
        )
        .await
        .unwrap_err();

        assert_eq!(kind_of(&err), "not_set");
        assert!(git.cloned.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clone_uses_cached_url_and_configured_branch() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        let github = offline_github();
        let git = StubGit::default();
        let (registry, ctx) = context_with_remote(dir.path());

        clone_repository(
            &config,
            &github,
            &git,
            &registry,
            CloneRepositoryParams { branch: None },
        )
        .await
        .unwrap();

        let cloned = git.cloned.lock().unwrap();
        assert_eq!(cloned.len(), 1);
        assert_eq!(cloned[0].0, "https://github.com/user/demo.git");
        // No default branch cached, so the configured branch is used
        assert_eq!(cloned[0].1.as_deref(), Some("main"));
        assert_eq!(cloned[0].2, ctx.local_path);
    }

    #[tokio::test]
    async fn test_clone_branch_param_wins() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        let github = offline_github();
        let git = StubGit::default();
        let (registry, _) = context_with_remote(dir.path());

        clone_repository(
            &config,
            &github,
            &git,
            &registry,
            CloneRepositoryParams {
                branch: Some("develop".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(
            git.cloned.lock().unwrap()[0].1.as_deref(),
            Some("develop")
        );
    }

    #[tokio::test]
    async fn test_commit_requires_checkout() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        let github = offline_github();
        let git = StubGit::default();
        let (registry, _) = context_with_remote(dir.path());
        // Context exists but nothing was cloned

        let err = commit_and_push(
            &config,
            &github,
            &git,
            &registry,
            CommitAndPushParams {
                commit_message: "update".to_string(),
                paths: None,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(kind_of(&err), "git");
        assert!(git.committed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_builds_request_from_context() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        let github = offline_github();
        let git = StubGit::default();
        let (registry, ctx) = context_with_remote(dir.path());
        std::fs::create_dir_all(ctx.local_path.join(".git")).unwrap();

        commit_and_push(
            &config,
            &github,
            &git,
            &registry,
            CommitAndPushParams {
                commit_message: "add feature".to_string(),
                paths: Some(vec!["src/lib.rs".to_string()]),
            },
        )
        .await
        .unwrap();

        let committed = git.committed.lock().unwrap();
        assert_eq!(committed.len(), 1);
        assert_eq!(committed[0].message, "add feature");
        assert_eq!(committed[0].paths, vec!["src/lib.rs".to_string()]);
        assert_eq!(committed[0].remote_url, "https://github.com/user/demo.git");
        assert_eq!(committed[0].branch, "main");
    }

    #[tokio::test]
    async fn test_commit_rejects_escaping_paths_before_git_runs() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        let github = offline_github();
        let git = StubGit::default();
        let (registry, ctx) = context_with_remote(dir.path());
        std::fs::create_dir_all(ctx.local_path.join(".git")).unwrap();

        let err = commit_and_push(
            &config,
            &github,
            &git,
            &registry,
            CommitAndPushParams {
                commit_message: "sneaky".to_string(),
                paths: Some(vec!["../../etc/passwd".to_string()]),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(kind_of(&err), "path_escape");
        assert!(git.committed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_merge_template_requires_checkout() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        let git = StubGit::default();
        let (registry, _) = context_with_remote(dir.path());

        let err = merge_template_repository(
            &config,
            &git,
            &registry,
            MergeTemplateRepositoryParams {
                template_url: None,
                force: None,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(kind_of(&err), "git");
    }

    #[tokio::test]
    async fn test_merge_template_defaults_to_configured_url() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.template.url = "https://github.com/acme/starter".to_string();
        let git = StubGit::default();
        let (registry, ctx) = context_with_remote(dir.path());
        std::fs::create_dir_all(ctx.local_path.join(".git")).unwrap();

        let result = merge_template_repository(
            &config,
            &git,
            &registry,
            MergeTemplateRepositoryParams {
                template_url: None,
                force: None,
            },
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_repository_without_context_or_name() {
        let github = offline_github();
        let registry = ProjectRegistry::new();

        let err = create_repository(
            &github,
            &registry,
            crate::params::CreateRepositoryParams {
                name: None,
                description: None,
                private: None,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(kind_of(&err), "not_set");
    }

    #[tokio::test]
    async fn test_create_repository_requires_token_before_network() {
        let github = offline_github();
        let registry = ProjectRegistry::new();

        // Explicit name, no token: fails with auth, not a connection error
        let err = create_repository(
            &github,
            &registry,
            crate::params::CreateRepositoryParams {
                name: Some("demo".to_string()),
                description: None,
                private: None,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(kind_of(&err), "auth");
    }
}
