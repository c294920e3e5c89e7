//! Handler implementations for repository MCP tools
//!
//! Organized by domain: project selection, repository lifecycle, file access.
//! Tool methods in the server delegate here; alias tools call the same
//! handler as their canonical tool, so behavior can never diverge.

mod files;
mod project;
mod repository;

pub use files::*;
pub use project::*;
pub use repository::*;

use rmcp::ErrorData as McpError;
use serde_json::{json, Value};

use crate::context::ContextError;
use crate::git::GitError;
use crate::github::ApiError;
use crate::workspace::WorkspaceError;

/// Machine-readable failure category, carried in the MCP error data so
/// callers can branch without parsing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotSet,
    PathEscape,
    NotFound,
    Auth,
    Duplicate,
    RateLimit,
    Clone,
    Git,
    MergeConflict,
    Timeout,
    Io,
    Api,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotSet => "not_set",
            ErrorKind::PathEscape => "path_escape",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Auth => "auth",
            ErrorKind::Duplicate => "duplicate",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::Clone => "clone",
            ErrorKind::Git => "git",
            ErrorKind::MergeConflict => "merge_conflict",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Io => "io",
            ErrorKind::Api => "api",
        }
    }
}

pub(crate) fn err_data(kind: ErrorKind) -> Option<Value> {
    Some(json!({ "kind": kind.as_str() }))
}

/// Convert a ContextError to an MCP error
pub fn context_error_to_mcp(e: ContextError) -> McpError {
    match &e {
        ContextError::NotSet => McpError::invalid_request(e.to_string(), err_data(ErrorKind::NotSet)),
        ContextError::InvalidName(_) => {
            McpError::invalid_params(e.to_string(), err_data(ErrorKind::PathEscape))
        }
    }
}

/// Convert a WorkspaceError to an MCP error
pub fn workspace_error_to_mcp(e: WorkspaceError) -> McpError {
    match &e {
        WorkspaceError::PathEscape(_) => {
            McpError::invalid_request(e.to_string(), err_data(ErrorKind::PathEscape))
        }
        WorkspaceError::NotFound(_) => {
            McpError::invalid_params(e.to_string(), err_data(ErrorKind::NotFound))
        }
        WorkspaceError::Io(_) => McpError::internal_error(e.to_string(), err_data(ErrorKind::Io)),
    }
}

/// Convert a GitError to an MCP error
pub fn git_error_to_mcp(e: GitError) -> McpError {
    match &e {
        GitError::NothingToCommit => {
            McpError::invalid_request(e.to_string(), err_data(ErrorKind::Git))
        }
        GitError::MergeConflict { .. } => {
            McpError::invalid_request(e.to_string(), err_data(ErrorKind::MergeConflict))
        }
        GitError::Timeout { .. } => {
            McpError::internal_error(e.to_string(), err_data(ErrorKind::Timeout))
        }
        GitError::CloneFailed { .. } => {
            McpError::internal_error(e.to_string(), err_data(ErrorKind::Clone))
        }
        GitError::Io(_) => McpError::internal_error(e.to_string(), err_data(ErrorKind::Io)),
        GitError::GitNotFound | GitError::Spawn(_) | GitError::Command { .. } => {
            McpError::internal_error(e.to_string(), err_data(ErrorKind::Git))
        }
    }
}

/// Convert an ApiError to an MCP error
pub fn api_error_to_mcp(e: ApiError) -> McpError {
    match &e {
        ApiError::MissingToken | ApiError::BadCredentials(_) => {
            McpError::invalid_request(e.to_string(), err_data(ErrorKind::Auth))
        }
        ApiError::Duplicate(_) => {
            McpError::invalid_request(e.to_string(), err_data(ErrorKind::Duplicate))
        }
        ApiError::RateLimited(_) => {
            McpError::internal_error(e.to_string(), err_data(ErrorKind::RateLimit))
        }
        ApiError::NotFound(_) => {
            McpError::invalid_params(e.to_string(), err_data(ErrorKind::NotFound))
        }
        ApiError::Http(err) if err.is_timeout() => {
            McpError::internal_error(e.to_string(), err_data(ErrorKind::Timeout))
        }
        ApiError::Status { .. } | ApiError::Http(_) => {
            McpError::internal_error(e.to_string(), err_data(ErrorKind::Api))
        }
    }
}
