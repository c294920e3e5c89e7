//! File handlers scoped to the active project's directory

use rmcp::model::{CallToolResult, Content};
use rmcp::ErrorData as McpError;
use tracing::debug;

use super::{context_error_to_mcp, workspace_error_to_mcp};
use crate::context::ProjectRegistry;
use crate::params::{CreateFileParams, ReadFileContentParams};
use crate::types::{ReadFileResponse, WriteFileResponse};
use crate::workspace;

/// Write a file under the active project, creating parent directories
pub async fn create_file(
    registry: &ProjectRegistry,
    params: CreateFileParams,
) -> Result<CallToolResult, McpError> {
    let ctx = registry.current().map_err(context_error_to_mcp)?;

    let (path, bytes_written) =
        workspace::write_file(&ctx.local_path, &params.file_path, &params.content)
            .await
            .map_err(workspace_error_to_mcp)?;
    debug!("wrote {} bytes to {}", bytes_written, path.display());

    Ok(CallToolResult::success(vec![Content::json(
        &WriteFileResponse {
            path: path.display().to_string(),
            bytes_written,
        },
    )?]))
}

/// Read a file from the active project
pub async fn read_file_content(
    registry: &ProjectRegistry,
    params: ReadFileContentParams,
) -> Result<CallToolResult, McpError> {
    let ctx = registry.current().map_err(context_error_to_mcp)?;

    let (path, content) = workspace::read_file(&ctx.local_path, &params.file_path)
        .await
        .map_err(workspace_error_to_mcp)?;

    Ok(CallToolResult::success(vec![Content::json(
        &ReadFileResponse {
            path: path.display().to_string(),
            size: content.len(),
            content,
        },
    )?]))
}
