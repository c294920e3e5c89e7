//! GitHub Repository Management MCP Server
//!
//! An MCP server that manages GitHub repositories end to end: pick an active
//! project, create or clone its repository, merge in a starter template,
//! write files, and commit and push the result.
//!
//! State is scoped to a [`context::ProjectRegistry`] owned by the server
//! rather than process globals, and git runs behind the [`git::GitBackend`]
//! trait so the subprocess implementation can be swapped out in tests.

pub mod config;
pub mod context;
pub mod git;
pub mod github;
pub mod handlers;
pub mod params;
pub mod server;
pub mod tools;
pub mod types;
pub mod workspace;

pub use server::GitHubRepoMcpServer;
