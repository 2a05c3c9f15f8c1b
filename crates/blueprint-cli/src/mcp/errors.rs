//! Error handling utilities for the MCP server

use blueprint_core::BuildError;
use rmcp::ErrorData;

/// Convert a workspace error to an MCP error, prefixed with what failed.
///
/// Bad input from the caller maps to `invalid_params`; everything else is an
/// internal error.
pub fn to_mcp_error(message: &str, error: &BuildError) -> ErrorData {
    let text = format!("{message}: {error}");
    match error {
        BuildError::InvalidInput { .. } | BuildError::InvalidPath { .. } => {
            ErrorData::invalid_params(text, None)
        }
        _ => ErrorData::internal_error(text, None),
    }
}
