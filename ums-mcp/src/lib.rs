//! UMS MCP Server Library
//!
//! Exposes user-management operations as Model Context Protocol tools over
//! JSON-RPC 2.0, served on a single HTTP endpoint with Server-Sent Events
//! framing.
//!
//! ## Architecture
//!
//! ```text
//! Agent (LLM client)
//!        │  POST /mcp  (Accept: application/json, text/event-stream)
//!        ▼
//! ┌──────────────────────┐
//! │  transport (axum)    │  Mcp-Session-Id header in/out
//! └──────────┬───────────┘
//!            ▼
//! ┌──────────────────────┐     ┌──────────────────┐
//! │  McpServer           │────►│  SessionStore    │
//! │  (protocol handler)  │     └──────────────────┘
//! │                      │     ┌──────────────────┐
//! │                      │────►│  ToolRegistry    │ - get_user_by_id
//! └──────────┬───────────┘     │                  │ - search_users
//!            │                 │                  │ - add_user
//!            ▼                 │                  │ - update_user
//! ┌──────────────────────┐     │                  │ - delete_users
//! │  sse framer          │     └────────┬─────────┘
//! │  data: {...}         │              ▼
//! │  data: [DONE]        │     ┌──────────────────┐
//! └──────────────────────┘     │  UserService     │ (HTTP)
//!                              └──────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ums_mcp::{ServerConfig, UmsMcpServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::builder().port(8006).build();
//!     let server = UmsMcpServer::from_config(config)?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod protocol;
pub mod server;
pub mod session;
pub mod sse;
pub mod tools;
pub mod transport;
pub mod user_client;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use error::{McpError, McpResult};
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use server::{McpServer, Reply, ServerInfo};
pub use session::{Session, SessionStore};
pub use tools::{FunctionDefinition, Tool, ToolDefinition, ToolRegistry};
pub use transport::MCP_SESSION_ID_HEADER;
pub use user_client::{HttpUserClient, UserService};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;

/// Server metadata for MCP protocol
pub const SERVER_NAME: &str = "custom-ums-mcp-server";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// UMS MCP HTTP server
///
/// Wraps a shared [`McpServer`] with the axum transport.
pub struct UmsMcpServer {
    server: Arc<McpServer>,
    config: ServerConfig,
}

impl UmsMcpServer {
    /// Wrap an already assembled protocol handler
    pub fn new(server: McpServer, config: ServerConfig) -> Self {
        Self {
            server: Arc::new(server),
            config,
        }
    }

    /// Build the user tools against the configured user service
    pub fn from_config(config: ServerConfig) -> McpResult<Self> {
        let client = HttpUserClient::new(config.user_service_url.clone(), config.user_service_timeout())?;
        let tools = ToolRegistry::with_user_tools(Arc::new(client));
        Ok(Self::new(McpServer::new(tools), config))
    }

    /// Shared protocol handler
    pub fn handler(&self) -> Arc<McpServer> {
        Arc::clone(&self.server)
    }

    /// Build the Axum router with all routes
    pub fn router(&self) -> Router {
        transport::create_router(self.handler())
    }

    /// Get the socket address for the server
    pub fn addr(&self) -> SocketAddr {
        self.config.addr()
    }

    /// Run the server
    pub async fn run(&self) -> McpResult<()> {
        let app = self.router();
        let addr = self.addr();

        tracing::info!("UMS MCP Server listening on http://{}", addr);
        tracing::info!("Endpoints:");
        tracing::info!("  GET  /health");
        tracing::info!("  POST /mcp");
        tracing::info!(
            "Tools: {}",
            self.server
                .tools()
                .list()
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
