//! Response types for repository MCP tools

use serde::{Deserialize, Serialize};

use crate::context::ProjectContext;
use crate::git::MergeOutcome;

// ============================================================================
// Response Types
// ============================================================================

/// Response for set_project_name and setup_existing_repository
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub name: String,
    pub local_path: String,
    pub clone_url: Option<String>,
    pub html_url: Option<String>,
    pub default_branch: Option<String>,
}

impl From<ProjectContext> for ProjectResponse {
    fn from(ctx: ProjectContext) -> Self {
        Self {
            name: ctx.name,
            local_path: ctx.local_path.display().to_string(),
            clone_url: ctx.clone_url,
            html_url: ctx.html_url,
            default_branch: ctx.default_branch,
        }
    }
}

/// Response for create_repository
#[derive(Debug, Serialize, Deserialize)]
pub struct RepositoryResponse {
    pub name: String,
    pub full_name: String,
    pub private: bool,
    pub html_url: String,
    pub clone_url: String,
    pub description: Option<String>,
    pub default_branch: Option<String>,
}

/// Response for clone_repository
#[derive(Debug, Serialize, Deserialize)]
pub struct CloneResponse {
    pub name: String,
    pub local_path: String,
    pub remote_url: String,
    pub branch: String,
}

/// Response for merge_template_repository
#[derive(Debug, Serialize, Deserialize)]
pub struct MergeTemplateResponse {
    pub template_url: String,
    pub files_copied: usize,
    pub overwritten: Vec<String>,
}

impl MergeTemplateResponse {
    pub fn new(template_url: String, outcome: MergeOutcome) -> Self {
        Self {
            template_url,
            files_copied: outcome.files_copied,
            overwritten: outcome.overwritten,
        }
    }
}

/// Response for create_file
#[derive(Debug, Serialize, Deserialize)]
pub struct WriteFileResponse {
    pub path: String,
    pub bytes_written: usize,
}

/// Response for read_file_content
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadFileResponse {
    pub path: String,
    pub content: String,
    pub size: usize,
}

/// Response for commit_and_push
#[derive(Debug, Serialize, Deserialize)]
pub struct CommitResponse {
    pub commit: String,
    pub message: String,
    pub branch: String,
    pub remote_url: String,
}
