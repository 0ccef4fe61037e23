//! Error types for the UMS MCP server

use thiserror::Error;

use crate::protocol::{error_codes, JsonRpcError};

/// Result type for MCP operations
pub type McpResult<T> = Result<T, McpError>;

/// Errors that can occur in the MCP server
#[derive(Error, Debug)]
pub enum McpError {
    /// Client did not accept both JSON and SSE
    #[error("Client must accept both application/json and text/event-stream")]
    NotAcceptable,

    /// Non-initialize request without a session header
    #[error("Missing session ID")]
    MissingSession,

    /// Session header does not match any known session
    #[error("No valid session ID provided")]
    UnknownSession(String),

    /// Session exists but `notifications/initialized` was never received.
    /// The wire message is shared with `MissingSession`.
    #[error("Missing session ID")]
    SessionNotReady(String),

    /// Request body is not a JSON-RPC request
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Malformed protocol parameters
    #[error("{0}")]
    InvalidParams(String),

    /// Unknown JSON-RPC method
    #[error("Method '{0}' not found")]
    MethodNotFound(String),

    /// Unknown tool name
    #[error("Tool '{0}' not found")]
    ToolNotFound(String),

    /// Tool arguments failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// User service answered with a non-success status
    #[error("HTTP {status}: {body}")]
    UserService { status: u16, body: String },

    /// Outbound HTTP failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl McpError {
    /// Get error code for MCP protocol
    pub fn error_code(&self) -> i32 {
        match self {
            McpError::Parse(_) => error_codes::PARSE_ERROR,
            McpError::NotAcceptable
            | McpError::MissingSession
            | McpError::UnknownSession(_)
            | McpError::SessionNotReady(_) => error_codes::INVALID_REQUEST,
            McpError::MethodNotFound(_) | McpError::ToolNotFound(_) => error_codes::METHOD_NOT_FOUND,
            McpError::InvalidParams(_) | McpError::Validation(_) => error_codes::INVALID_PARAMS,
            _ => error_codes::INTERNAL_ERROR,
        }
    }

    /// Convert into a JSON-RPC error object
    pub fn to_jsonrpc(&self) -> JsonRpcError {
        JsonRpcError::new(self.error_code(), self.to_string())
    }
}
