//! Parameter types for repository MCP tools
//!
//! Alias tools reuse the canonical tool's parameter struct, so canonical
//! and alias calls accept identical argument schemas.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SetProjectNameParams {
    #[schemars(description = "Project name, also used as the repository name")]
    pub name: String,

    #[schemars(
        description = "Override for the local working directory (default: <projects root>/<name>)"
    )]
    pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SetupExistingRepositoryParams {
    #[schemars(description = "Name of an existing repository owned by the authenticated user")]
    pub repo_name: String,

    #[schemars(
        description = "Clone URL override; when omitted the URL is resolved via the GitHub API"
    )]
    pub remote_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateRepositoryParams {
    #[schemars(description = "Repository name (default: the active project name)")]
    pub name: Option<String>,

    #[schemars(description = "Repository description (default: 'Repository for <name>')")]
    pub description: Option<String>,

    #[schemars(description = "Create as a private repository (default: false)")]
    pub private: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CloneRepositoryParams {
    #[schemars(
        description = "Branch to clone (default: the remote's default branch, or the configured branch)"
    )]
    pub branch: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MergeTemplateRepositoryParams {
    #[schemars(description = "Template repository URL (default: the configured template)")]
    pub template_url: Option<String>,

    #[schemars(
        description = "Overwrite existing files on conflict instead of failing (default: false)"
    )]
    pub force: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateFileParams {
    #[schemars(description = "File path relative to the project directory")]
    pub file_path: String,

    #[schemars(description = "Content to write to the file")]
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ReadFileContentParams {
    #[schemars(description = "File path relative to the project directory")]
    pub file_path: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CommitAndPushParams {
    #[schemars(description = "Commit message")]
    pub commit_message: String,

    #[schemars(
        description = "Paths to stage, relative to the project directory (default: all changes)"
    )]
    pub paths: Option<Vec<String>>,
}
