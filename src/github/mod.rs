//! GitHub hosting API module
//!
//! Typed client and wire types for the GitHub REST endpoints used by the
//! repository tools.

pub mod client;
pub mod error;
pub mod types;

pub use client::GitHubClient;
pub use error::{ApiError, ApiResult};
pub use types::{NewRepository, Owner, Repository};
