//! UMS MCP Server Binary
//!
//! Serves the user-management tools over MCP (HTTP + SSE).
//!
//! ## Usage
//!
//! ```bash
//! # Start with defaults (0.0.0.0:8006, user service at http://localhost:8041)
//! ums-mcp-server
//!
//! # Custom port and user service
//! UMS_MCP_PORT=9000 USER_SERVICE_URL=http://users:8041 ums-mcp-server
//! ```

use ums_mcp::{ServerConfig, UmsMcpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ums_mcp=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    tracing::info!("Starting UMS MCP Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("User service: {}", config.user_service_url);

    let server = UmsMcpServer::from_config(config)?;
    server.run().await?;

    Ok(())
}
