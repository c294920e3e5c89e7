//! GitHub Repository Management MCP Server
//!
//! Speaks MCP over stdio. Register it in `.mcp.json`:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "github-repo": {
//!       "command": "/path/to/github-repo-mcp",
//!       "env": {
//!         "GITHUB_TOKEN": "ghp_yourtoken"
//!       }
//!     }
//!   }
//! }
//! ```

use anyhow::Result;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use github_repo_mcp::config::Config;
use github_repo_mcp::GitHubRepoMcpServer;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries the MCP protocol
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive("github_repo_mcp=info".parse()?))
        .init();

    tracing::info!("Starting GitHub Repository Management MCP Server");

    let config = Config::load();
    if config.token.is_none() {
        // Continue anyway - authenticated tools will report the error
        tracing::warn!("GITHUB_TOKEN is not set - repository tools will fail until it is provided");
    }

    let server = GitHubRepoMcpServer::with_config(config)?;
    let service = server.serve(stdio()).await?;

    tracing::info!("Server running, waiting for requests...");

    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}
