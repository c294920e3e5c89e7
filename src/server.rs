//! MCP server for GitHub repository management
//!
//! Tools share one process-wide active project. set_project_name or
//! setup_existing_repository establish it; every other tool reads it.
//! Alias tools route to the same handlers as their canonical names.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError,
};

use crate::config::Config;
use crate::context::ProjectRegistry;
use crate::git::{GitBackend, GitCli};
use crate::github::{ApiError, GitHubClient};
use crate::handlers;
use crate::params::{
    CloneRepositoryParams, CommitAndPushParams, CreateFileParams, CreateRepositoryParams,
    MergeTemplateRepositoryParams, ReadFileContentParams, SetProjectNameParams,
    SetupExistingRepositoryParams,
};

/// The GitHub repository management MCP server
#[derive(Clone)]
pub struct GitHubRepoMcpServer {
    config: Config,
    projects: ProjectRegistry,
    github: Arc<GitHubClient>,
    git: Arc<dyn GitBackend>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl GitHubRepoMcpServer {
    pub fn new() -> Self {
        Self::with_config(Config::load()).expect("Failed to create GitHubRepoMcpServer")
    }

    /// Build a server from an explicit config, running git through the CLI
    pub fn with_config(config: Config) -> Result<Self, ApiError> {
        let git = Arc::new(GitCli::from_config(&config));
        Self::with_git_backend(config, git)
    }

    /// Build a server with a caller-supplied git backend
    pub fn with_git_backend(
        config: Config,
        git: Arc<dyn GitBackend>,
    ) -> Result<Self, ApiError> {
        let github = Arc::new(GitHubClient::new(&config)?);
        Ok(Self {
            config,
            projects: ProjectRegistry::new(),
            github,
            git,
            tool_router: Self::tool_router(),
        })
    }

    // ========================================================================
    // Project Context Tools
    // ========================================================================

    #[tool(
        description = "Set the active project by name, creating its local working directory and remembering it for all subsequent tools"
    )]
    async fn set_project_name(
        &self,
        Parameters(params): Parameters<SetProjectNameParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::set_project_name(&self.config, &self.projects, params).await
    }

    #[tool(
        description = "Alias for set_project_name - despite the name, this sets the active project and returns its details"
    )]
    async fn get_project_name(
        &self,
        Parameters(params): Parameters<SetProjectNameParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::set_project_name(&self.config, &self.projects, params).await
    }

    #[tool(
        description = "Make an existing GitHub repository the active project, cloning it locally unless a checkout is already present"
    )]
    async fn setup_existing_repository(
        &self,
        Parameters(params): Parameters<SetupExistingRepositoryParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::setup_existing_repository(
            &self.config,
            &self.github,
            self.git.as_ref(),
            &self.projects,
            params,
        )
        .await
    }

    // ========================================================================
    // Repository Tools
    // ========================================================================

    #[tool(
        description = "Create a GitHub repository for the authenticated user, defaulting to the active project's name"
    )]
    async fn create_repository(
        &self,
        Parameters(params): Parameters<CreateRepositoryParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::create_repository(&self.github, &self.projects, params).await
    }

    #[tool(
        description = "Alias for create_repository - creates a GitHub repository for the authenticated user"
    )]
    async fn make_repo(
        &self,
        Parameters(params): Parameters<CreateRepositoryParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::create_repository(&self.github, &self.projects, params).await
    }

    #[tool(
        description = "Clone the active project's GitHub repository into its local working directory"
    )]
    async fn clone_repository(
        &self,
        Parameters(params): Parameters<CloneRepositoryParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::clone_repository(
            &self.config,
            &self.github,
            self.git.as_ref(),
            &self.projects,
            params,
        )
        .await
    }

    #[tool(
        description = "Copy a template repository's files into the active project's checkout, refusing to overwrite existing files unless forced"
    )]
    async fn merge_template_repository(
        &self,
        Parameters(params): Parameters<MergeTemplateRepositoryParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::merge_template_repository(&self.config, self.git.as_ref(), &self.projects, params)
            .await
    }

    // ========================================================================
    // File Tools
    // ========================================================================

    #[tool(
        description = "Create or overwrite a file inside the active project's directory, creating parent directories as needed"
    )]
    async fn create_file(
        &self,
        Parameters(params): Parameters<CreateFileParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::create_file(&self.projects, params).await
    }

    #[tool(description = "Read a file from the active project's directory")]
    async fn read_file_content(
        &self,
        Parameters(params): Parameters<ReadFileContentParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::read_file_content(&self.projects, params).await
    }

    #[tool(
        description = "Alias for read_file_content - reads a file from the active project's directory"
    )]
    async fn check_file(
        &self,
        Parameters(params): Parameters<ReadFileContentParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::read_file_content(&self.projects, params).await
    }

    // ========================================================================
    // Git Tools
    // ========================================================================

    #[tool(
        description = "Stage, commit, and push the active project's changes to its GitHub repository"
    )]
    async fn commit_and_push(
        &self,
        Parameters(params): Parameters<CommitAndPushParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::commit_and_push(
            &self.config,
            &self.github,
            self.git.as_ref(),
            &self.projects,
            params,
        )
        .await
    }

    #[tool(
        description = "Alias for commit_and_push - stages, commits, and pushes the active project's changes"
    )]
    async fn push_code(
        &self,
        Parameters(params): Parameters<CommitAndPushParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::commit_and_push(
            &self.config,
            &self.github,
            self.git.as_ref(),
            &self.projects,
            params,
        )
        .await
    }
}

#[tool_handler]
impl rmcp::ServerHandler for GitHubRepoMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "GitHub Repository Management MCP Server - set an active project, then \
                 create, clone, or set up its GitHub repository, merge in a starter \
                 template, write and read files, and commit and push changes. \
                 Repository operations require the GITHUB_TOKEN environment variable."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

impl Default for GitHubRepoMcpServer {
    fn default() -> Self {
        Self::new()
    }
}
