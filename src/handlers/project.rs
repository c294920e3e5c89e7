//! Project selection handlers
//!
//! set_project_name establishes the active project from nothing but a name;
//! setup_existing_repository does the same for a repository that already
//! exists remotely, leaving a ready-to-use working tree behind.

use std::path::PathBuf;

use rmcp::model::{CallToolResult, Content};
use rmcp::ErrorData as McpError;
use tracing::info;

use super::{api_error_to_mcp, context_error_to_mcp, git_error_to_mcp, workspace_error_to_mcp};
use crate::config::Config;
use crate::context::{validate_project_name, ProjectContext, ProjectRegistry};
use crate::git::GitBackend;
use crate::github::GitHubClient;
use crate::params::{SetProjectNameParams, SetupExistingRepositoryParams};
use crate::types::ProjectResponse;
use crate::workspace::WorkspaceError;

/// Select the active project and create its working directory
pub async fn set_project_name(
    config: &Config,
    registry: &ProjectRegistry,
    params: SetProjectNameParams,
) -> Result<CallToolResult, McpError> {
    validate_project_name(&params.name).map_err(context_error_to_mcp)?;

    let local_path = match params.path {
        Some(path) => PathBuf::from(path),
        None => config.projects.root.join(&params.name),
    };

    tokio::fs::create_dir_all(&local_path)
        .await
        .map_err(|e| workspace_error_to_mcp(WorkspaceError::Io(e)))?;

    info!("project set: {} -> {}", params.name, local_path.display());

    let ctx = ProjectContext::new(params.name, local_path);
    registry.set(ctx.clone());

    Ok(CallToolResult::success(vec![Content::json(
        &ProjectResponse::from(ctx),
    )?]))
}

/// Attach to a repository that already exists remotely: resolve its clone
/// URL, materialize a working tree under the projects root, and make it the
/// active project.
pub async fn setup_existing_repository(
    config: &Config,
    github: &GitHubClient,
    git: &dyn GitBackend,
    registry: &ProjectRegistry,
    params: SetupExistingRepositoryParams,
) -> Result<CallToolResult, McpError> {
    validate_project_name(&params.repo_name).map_err(context_error_to_mcp)?;

    // Resolve the remote, via the API unless the caller supplied a URL
    let (clone_url, html_url, default_branch) = match params.remote_url {
        Some(url) => (url, None, None),
        None => {
            let repo = github
                .get_repository(&params.repo_name)
                .await
                .map_err(api_error_to_mcp)?;
            (repo.clone_url, Some(repo.html_url), repo.default_branch)
        }
    };

    let local_path = config.projects.root.join(&params.repo_name);

    if local_path.join(".git").is_dir() {
        info!("reusing existing checkout at {}", local_path.display());
    } else {
        // A leftover non-repository directory gets replaced by the clone
        if local_path.exists() {
            tokio::fs::remove_dir_all(&local_path)
                .await
                .map_err(|e| workspace_error_to_mcp(WorkspaceError::Io(e)))?;
        }
        git.clone_repo(&clone_url, default_branch.as_deref(), &local_path)
            .await
            .map_err(git_error_to_mcp)?;
        info!("cloned {} into {}", params.repo_name, local_path.display());
    }

    let mut ctx = ProjectContext::new(params.repo_name, local_path);
    ctx.clone_url = Some(clone_url);
    ctx.html_url = html_url;
    ctx.default_branch = default_branch;
    registry.set(ctx.clone());

    Ok(CallToolResult::success(vec![Content::json(
        &ProjectResponse::from(ctx),
    )?]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(root: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.projects.root = root.to_path_buf();
        config
    }

    #[tokio::test]
    async fn test_set_project_creates_directory_and_context() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let registry = ProjectRegistry::new();

        let result = set_project_name(
            &config,
            &registry,
            SetProjectNameParams {
                name: "demo".to_string(),
                path: None,
            },
        )
        .await;
        assert!(result.is_ok());

        assert!(dir.path().join("demo").is_dir());
        let ctx = registry.current().unwrap();
        assert_eq!(ctx.name, "demo");
        assert_eq!(ctx.local_path, dir.path().join("demo"));
        assert!(ctx.clone_url.is_none());
    }

    #[tokio::test]
    async fn test_set_project_with_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let registry = ProjectRegistry::new();
        let custom = dir.path().join("elsewhere");

        set_project_name(
            &config,
            &registry,
            SetProjectNameParams {
                name: "demo".to_string(),
                path: Some(custom.display().to_string()),
            },
        )
        .await
        .unwrap();

        assert!(custom.is_dir());
        assert_eq!(registry.current().unwrap().local_path, custom);
    }

    #[tokio::test]
    async fn test_set_project_rejects_traversal_names() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let registry = ProjectRegistry::new();

        let err = set_project_name(
            &config,
            &registry,
            SetProjectNameParams {
                name: "../evil".to_string(),
                path: None,
            },
        )
        .await
        .unwrap_err();

        let kind = err.data.as_ref().and_then(|d| d.get("kind")).cloned();
        assert_eq!(kind, Some(serde_json::json!("path_escape")));
        assert!(!registry.is_set());
    }

    #[tokio::test]
    async fn test_set_project_overwrites_previous() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let registry = ProjectRegistry::new();

        for name in ["first", "second"] {
            set_project_name(
                &config,
                &registry,
                SetProjectNameParams {
                    name: name.to_string(),
                    path: None,
                },
            )
            .await
            .unwrap();
        }

        assert_eq!(registry.current().unwrap().name, "second");
    }
}
