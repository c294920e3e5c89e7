//! Error types for GitHub API operations

use thiserror::Error;

/// Errors that can occur when calling the GitHub REST API
#[derive(Error, Debug)]
pub enum ApiError {
    /// No token is configured, checked before any request is sent
    #[error("GITHUB_TOKEN is not set - repository operations require a token")]
    MissingToken,

    /// GitHub rejected the token
    #[error("GitHub rejected the credentials: {0}")]
    BadCredentials(String),

    /// A repository with this name already exists for the account
    #[error("repository '{0}' already exists on this account")]
    Duplicate(String),

    /// The API rate limit is exhausted
    #[error("GitHub API rate limit exceeded: {0}")]
    RateLimited(String),

    /// The requested resource does not exist (or the token cannot see it)
    #[error("{0} not found on GitHub")]
    NotFound(String),

    /// Any other non-success response
    #[error("GitHub API error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Transport-level failure, including request timeouts
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for GitHub API operations
pub type ApiResult<T> = Result<T, ApiError>;
