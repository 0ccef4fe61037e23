//! HTTP transport: the single `POST /mcp` endpoint
//!
//! Maps handler replies onto the three wire shapes: plain JSON/text errors,
//! the bare 202 for `notifications/initialized`, and SSE streams.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{
        header::{ACCEPT, CACHE_CONTROL, CONNECTION},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::error::McpError;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse};
use crate::server::{McpServer, Reply};
use crate::sse;

/// Header carrying the session id in both directions
pub const MCP_SESSION_ID_HEADER: &str = "mcp-session-id";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create the router with all routes
pub fn create_router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/mcp", post(handle_mcp))
        .with_state(server)
        .layer(TraceLayer::new_for_http())
}

fn header_str<'a>(headers: &'a HeaderMap, name: impl axum::http::header::AsHeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Single MCP endpoint handling every JSON-RPC request
async fn handle_mcp(
    State(server): State<Arc<McpServer>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected malformed JSON-RPC body");
            let response = JsonRpcResponse::server_error(McpError::Parse(e).to_jsonrpc());
            return (StatusCode::BAD_REQUEST, Json(response)).into_response();
        }
    };

    let accept = header_str(&headers, ACCEPT);
    let session_id = header_str(&headers, MCP_SESSION_ID_HEADER);

    server.dispatch(accept, session_id, request).into_response()
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Rejected { status, response } => (status, Json(response)).into_response(),
            Reply::UnknownSession(error) => (StatusCode::BAD_REQUEST, error.to_string()).into_response(),
            Reply::Accepted { session_id } => {
                (StatusCode::ACCEPTED, [(MCP_SESSION_ID_HEADER, session_id)]).into_response()
            }
            Reply::Stream {
                status,
                session_id,
                messages,
            } => {
                let mut response = (status, Sse::new(sse::frame(messages))).into_response();
                let headers = response.headers_mut();
                headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
                headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
                if let Some(value) = session_id.and_then(|id| HeaderValue::from_str(&id).ok()) {
                    headers.insert(MCP_SESSION_ID_HEADER, value);
                }
                response
            }
        }
    }
}
