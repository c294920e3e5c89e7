//! Wire types for the GitHub REST API
//!
//! Only the fields the repository tools actually consume are modeled;
//! unknown fields in responses are ignored.

use serde::{Deserialize, Serialize};

/// A GitHub account, as embedded in repository payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
}

/// A repository as returned by `GET /repos/{owner}/{repo}` and
/// `POST /user/repos`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub private: bool,
    pub html_url: String,
    pub clone_url: String,
    pub ssh_url: Option<String>,
    pub description: Option<String>,
    pub default_branch: Option<String>,
    pub owner: Option<Owner>,
}

/// Request body for `POST /user/repos`
#[derive(Debug, Clone, Serialize)]
pub struct NewRepository {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub private: bool,
    /// Create an initial commit so the repository can be cloned immediately
    pub auto_init: bool,
}
