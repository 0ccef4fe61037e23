//! MCP protocol handler
//!
//! Drives the per-session state machine
//! (no session → initialized, not ready → ready) and routes JSON-RPC
//! methods to the session store and the tool registry.

use std::sync::Arc;

use axum::http::StatusCode;
use futures::stream::{self, BoxStream};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::McpError;
use crate::protocol::{
    methods, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION, SUPPORTED_PROTOCOL_VERSIONS,
};
use crate::session::{Session, SessionStore};
use crate::tools::{ToolRegistry, ToolResult};
use crate::{SERVER_NAME, SERVER_VERSION};

/// Responses to be SSE framed, produced lazily
pub type MessageStream = BoxStream<'static, JsonRpcResponse>;

/// Server identity reported by `initialize`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: SERVER_VERSION.to_string(),
        }
    }
}

/// Outcome of dispatching one request, in transport-neutral form
pub enum Reply {
    /// Plain JSON error body, not SSE framed
    Rejected {
        status: StatusCode,
        response: JsonRpcResponse,
    },
    /// Session header matched nothing; plain-text 400
    UnknownSession(McpError),
    /// `notifications/initialized` accepted; empty 202
    Accepted { session_id: String },
    /// SSE framed reply
    Stream {
        status: StatusCode,
        session_id: Option<String>,
        messages: MessageStream,
    },
}

impl std::fmt::Debug for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reply::Rejected { status, response } => f
                .debug_struct("Rejected")
                .field("status", status)
                .field("response", response)
                .finish(),
            Reply::UnknownSession(error) => f.debug_tuple("UnknownSession").field(error).finish(),
            Reply::Accepted { session_id } => f
                .debug_struct("Accepted")
                .field("session_id", session_id)
                .finish(),
            Reply::Stream { status, session_id, .. } => f
                .debug_struct("Stream")
                .field("status", status)
                .field("session_id", session_id)
                .finish_non_exhaustive(),
        }
    }
}

/// True when the Accept header lists both JSON and SSE media types
pub fn accepts_json_and_event_stream(accept: Option<&str>) -> bool {
    let Some(accept) = accept else {
        return false;
    };

    let types: Vec<String> = accept
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .collect();

    let has_json = types.iter().any(|t| t.contains("application/json"));
    let has_sse = types.iter().any(|t| t.contains("text/event-stream"));
    has_json && has_sse
}

/// Name of the tool to call.
///
/// Empty values (`null`, `false`, `0`, `""`, `[]`, `{}`) count as missing;
/// any other non-string value is looked up by its JSON text and so resolves
/// to an unknown tool.
fn requested_tool_name(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        other => Some(other.to_string()),
    }
}

/// MCP server: owns the session store and the tool registry
pub struct McpServer {
    protocol_version: String,
    server_info: ServerInfo,
    sessions: SessionStore,
    tools: ToolRegistry,
}

impl McpServer {
    /// Create a server exposing the given tools
    pub fn new(tools: ToolRegistry) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            server_info: ServerInfo::default(),
            sessions: SessionStore::new(),
            tools,
        }
    }

    /// Override the reported server identity
    pub fn with_server_info(mut self, server_info: ServerInfo) -> Self {
        self.server_info = server_info;
        self
    }

    pub fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Echo a supported client version, otherwise answer with ours
    pub fn negotiate_protocol_version(&self, requested: Option<&str>) -> String {
        match requested {
            Some(version) if SUPPORTED_PROTOCOL_VERSIONS.contains(&version) => version.to_string(),
            _ => self.protocol_version.clone(),
        }
    }

    /// Dispatch one JSON-RPC request.
    ///
    /// `accept` and `session_id` are the raw `Accept` and `Mcp-Session-Id`
    /// header values.
    pub fn dispatch(
        self: &Arc<Self>,
        accept: Option<&str>,
        session_id: Option<&str>,
        request: JsonRpcRequest,
    ) -> Reply {
        if !accepts_json_and_event_stream(accept) {
            tracing::warn!(accept = ?accept, method = %request.method, "Rejected request: unacceptable Accept header");
            return Reply::Rejected {
                status: StatusCode::NOT_ACCEPTABLE,
                response: JsonRpcResponse::server_error(McpError::NotAcceptable.to_jsonrpc()),
            };
        }

        if request.method == methods::INITIALIZE {
            let (response, session) = self.handle_initialize(&request);
            return Reply::Stream {
                status: StatusCode::OK,
                session_id: Some(session.session_id),
                messages: Box::pin(stream::iter([response])),
            };
        }

        let Some(session_id) = session_id else {
            tracing::warn!(method = %request.method, "Rejected request: missing session header");
            return Reply::Rejected {
                status: StatusCode::BAD_REQUEST,
                response: JsonRpcResponse::server_error(McpError::MissingSession.to_jsonrpc()),
            };
        };

        let Some(session) = self.sessions.get(session_id) else {
            tracing::warn!(session_id, method = %request.method, "Rejected request: unknown session");
            return Reply::UnknownSession(McpError::UnknownSession(session_id.to_string()));
        };

        if request.method == methods::INITIALIZED {
            self.sessions.mark_ready(&session.session_id);
            tracing::info!(session_id = %session.session_id, "Session ready for operation");
            return Reply::Accepted {
                session_id: session.session_id,
            };
        }

        if !session.ready_for_operation {
            tracing::warn!(session_id = %session.session_id, method = %request.method, "Rejected request: session not ready");
            let error = McpError::SessionNotReady(session.session_id.clone()).to_jsonrpc();
            return Reply::Stream {
                status: StatusCode::BAD_REQUEST,
                session_id: Some(session.session_id),
                messages: Box::pin(stream::iter([JsonRpcResponse::server_error(error)])),
            };
        }

        let method = request.method.clone();
        let messages: MessageStream = match method.as_str() {
            methods::TOOLS_LIST => Box::pin(stream::iter([self.handle_tools_list(&request)])),
            methods::TOOLS_CALL => {
                let server = Arc::clone(self);
                Box::pin(stream::once(async move { server.handle_tools_call(&request).await }))
            }
            other => {
                tracing::debug!(method = other, "Unknown method");
                let error = McpError::MethodNotFound(other.to_string()).to_jsonrpc();
                Box::pin(stream::iter([JsonRpcResponse::failure(request.id.clone(), error)]))
            }
        };

        Reply::Stream {
            status: StatusCode::OK,
            session_id: Some(session.session_id),
            messages,
        }
    }

    /// Handle `initialize`: negotiate the version and open a session
    pub fn handle_initialize(&self, request: &JsonRpcRequest) -> (JsonRpcResponse, Session) {
        let requested = request.param("protocolVersion").and_then(Value::as_str);
        let protocol_version = self.negotiate_protocol_version(requested);
        let session = self.sessions.create();

        tracing::info!(
            session_id = %session.session_id,
            protocol_version = %protocol_version,
            "Initialized session"
        );

        let response = JsonRpcResponse::success(
            request.id.clone(),
            json!({
                "protocolVersion": protocol_version,
                "capabilities": {
                    "tools": {},
                    "resources": {},
                    "prompts": {}
                },
                "serverInfo": self.server_info
            }),
        );

        (response, session)
    }

    /// Handle `tools/list`
    pub fn handle_tools_list(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(request.id.clone(), json!({ "tools": self.tools.list() }))
    }

    /// Handle `tools/call`.
    ///
    /// Malformed calls produce JSON-RPC errors; failures while the tool runs
    /// produce a successful response carrying `isError: true`.
    pub async fn handle_tools_call(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        if request.params.as_ref().map_or(true, |p| p.is_empty()) {
            let error = McpError::InvalidParams("Missing parameters".to_string());
            return JsonRpcResponse::failure(id, error.to_jsonrpc());
        }

        let Some(name) = request.param("name").and_then(requested_tool_name) else {
            let error = McpError::InvalidParams("Missing required parameter: name".to_string());
            return JsonRpcResponse::failure(id, error.to_jsonrpc());
        };
        let tool_name = name.as_str();

        let Some(tool) = self.tools.get(tool_name) else {
            tracing::warn!(tool = tool_name, "Unknown tool");
            return JsonRpcResponse::failure(id, McpError::ToolNotFound(tool_name.to_string()).to_jsonrpc());
        };

        let arguments = match request.param("arguments") {
            None | Some(Value::Null) => json!({}),
            Some(arguments) => arguments.clone(),
        };

        tracing::info!(tool = tool_name, "Calling tool");

        let result = match tool.execute(arguments).await {
            Ok(text) => ToolResult::text(text),
            Err(e) => {
                tracing::warn!(tool = tool_name, error = %e, "Tool execution failed");
                ToolResult::error(format!("Tool execution error: {}", e))
            }
        };

        match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::failure(id, McpError::Internal(e.to_string()).to_jsonrpc()),
        }
    }
}
