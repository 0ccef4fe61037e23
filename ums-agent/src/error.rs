//! Error types for the UMS agent client

use thiserror::Error;

/// Result type for agent operations
pub type AgentResult<T> = Result<T, AgentError>;

/// Errors that can occur while talking to an MCP server
#[derive(Error, Debug)]
pub enum AgentError {
    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status and no JSON-RPC body
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON-RPC error object returned by the server
    #[error("MCP error {code}: {message}")]
    Rpc { code: i32, message: String },

    /// SSE body carried no data line
    #[error("No data in SSE response")]
    NoData,

    /// Response body could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Response shape did not match the protocol
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
