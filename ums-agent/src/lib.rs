//! UMS Agent - client side of the UMS MCP server
//!
//! Opens an MCP session over HTTP + SSE, lists the available tools in the
//! function-calling shape LLM APIs expect, and invokes them by name.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ums_agent::McpClient;
//!
//! let client = McpClient::connect("http://localhost:8006/mcp").await?;
//! let tools = client.get_tools().await?;
//! let text = client.call_tool("get_user_by_id", serde_json::json!({"id": 1})).await?;
//! ```

pub mod client;
pub mod error;

pub use client::{parse_sse, FunctionTool, McpClient};
pub use error::{AgentError, AgentResult};
