//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use futures::StreamExt;
use parking_lot::Mutex;
use serde_json::{json, Value};

use ums_mcp::models::{UserCreate, UserSearch, UserUpdate};
use ums_mcp::server::Reply;
use ums_mcp::{JsonRpcRequest, JsonRpcResponse, McpError, McpResult, McpServer, Tool, ToolRegistry, UserService};

pub const ACCEPT_BOTH: &str = "application/json, text/event-stream";

/// User service double that records every call
#[derive(Default)]
pub struct RecordingUserService {
    calls: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingUserService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call answers with a 500
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) -> McpResult<()> {
        self.calls.lock().push(call);
        if self.fail {
            return Err(McpError::UserService {
                status: 500,
                body: "backend down".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl UserService for RecordingUserService {
    async fn get_user(&self, user_id: i64) -> McpResult<String> {
        self.record(format!("get_user:{}", user_id))?;
        Ok(format!("```\n  id: {}\n```\n", user_id))
    }

    async fn search_users(&self, search: &UserSearch) -> McpResult<String> {
        self.record(format!("search_users:{}", serde_json::to_string(search)?))?;
        Ok("## Search results: \n".to_string())
    }

    async fn add_user(&self, user: &UserCreate) -> McpResult<String> {
        self.record(format!("add_user:{}", user.email))?;
        Ok(format!("User successfully added: {}", user.email))
    }

    async fn update_user(&self, user_id: i64, update: &UserUpdate) -> McpResult<String> {
        self.record(format!("update_user:{}:{}", user_id, serde_json::to_string(update)?))?;
        Ok(format!("User successfully updated: {}", user_id))
    }

    async fn delete_user(&self, user_id: i64) -> McpResult<String> {
        self.record(format!("delete_user:{}", user_id))?;
        Ok("User successfully deleted".to_string())
    }
}

/// Tool whose execution always fails
pub struct ExplodingTool;

#[async_trait]
impl Tool for ExplodingTool {
    fn name(&self) -> &str {
        "explode"
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, _arguments: Value) -> McpResult<String> {
        Err(McpError::Internal("boom".to_string()))
    }
}

/// Server with the user tools backed by a recording service
pub fn user_server() -> (Arc<McpServer>, Arc<RecordingUserService>) {
    let service = Arc::new(RecordingUserService::new());
    let tools = ToolRegistry::with_user_tools(service.clone());
    (Arc::new(McpServer::new(tools)), service)
}

/// User server plus the always-failing tool
pub fn server_with_exploding_tool() -> (Arc<McpServer>, Arc<RecordingUserService>) {
    let service = Arc::new(RecordingUserService::new());
    let mut tools = ToolRegistry::with_user_tools(service.clone());
    tools.register(Arc::new(ExplodingTool));
    (Arc::new(McpServer::new(tools)), service)
}

pub fn request(id: &str, method: &str, params: Option<Value>) -> JsonRpcRequest {
    let params = params.and_then(|p| p.as_object().cloned());
    JsonRpcRequest::new(id, method, params)
}

/// Run initialize + notifications/initialized, returning the ready session id
pub fn ready_session(server: &Arc<McpServer>) -> String {
    let init = request("1", "initialize", Some(json!({"protocolVersion": "2024-11-05"})));
    let session_id = match server.dispatch(Some(ACCEPT_BOTH), None, init) {
        Reply::Stream { session_id: Some(id), .. } => id,
        other => panic!("unexpected initialize reply: {:?}", other),
    };

    let initialized = JsonRpcRequest::notification("notifications/initialized");
    match server.dispatch(Some(ACCEPT_BOTH), Some(&session_id), initialized) {
        Reply::Accepted { .. } => {}
        other => panic!("unexpected initialized reply: {:?}", other),
    }

    session_id
}

/// Collect the messages of an SSE reply
pub async fn stream_messages(reply: Reply) -> Vec<JsonRpcResponse> {
    match reply {
        Reply::Stream { messages, .. } => messages.collect().await,
        other => panic!("expected a stream reply, got {:?}", other),
    }
}

/// Build a POST /mcp request
pub fn http_request(accept: Option<&str>, session_id: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json");
    if let Some(accept) = accept {
        builder = builder.header("accept", accept);
    }
    if let Some(session_id) = session_id {
        builder = builder.header("Mcp-Session-Id", session_id);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Parse the `data:` frames of an SSE body, excluding the sentinel
pub fn sse_payloads(body: &str) -> Vec<Value> {
    body.split("\n\n")
        .filter_map(|frame| frame.strip_prefix("data: "))
        .filter(|data| *data != "[DONE]")
        .map(|data| serde_json::from_str(data).unwrap())
        .collect()
}
