//! End-to-end tests: the agent client against a live UMS MCP server

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use ums_agent::{AgentError, McpClient};
use ums_mcp::models::{UserCreate, UserSearch, UserUpdate};
use ums_mcp::transport::create_router;
use ums_mcp::{McpError, McpResult, McpServer, ToolRegistry, UserService};

/// Canned user service
struct StubUserService;

#[async_trait]
impl UserService for StubUserService {
    async fn get_user(&self, user_id: i64) -> McpResult<String> {
        if user_id == 404 {
            return Err(McpError::UserService {
                status: 404,
                body: "not found".to_string(),
            });
        }
        Ok(format!("```\n  id: {}\n  name: Ann\n```\n", user_id))
    }

    async fn search_users(&self, _search: &UserSearch) -> McpResult<String> {
        Ok("No users found\n".to_string())
    }

    async fn add_user(&self, user: &UserCreate) -> McpResult<String> {
        Ok(format!("User successfully added: {}", user.email))
    }

    async fn update_user(&self, user_id: i64, _update: &UserUpdate) -> McpResult<String> {
        Ok(format!("User successfully updated: {}", user_id))
    }

    async fn delete_user(&self, _user_id: i64) -> McpResult<String> {
        Ok("User successfully deleted".to_string())
    }
}

async fn spawn_server() -> String {
    let tools = ToolRegistry::with_user_tools(Arc::new(StubUserService));
    let app = create_router(Arc::new(McpServer::new(tools)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/mcp", addr)
}

#[tokio::test]
async fn test_connect_establishes_session() {
    let url = spawn_server().await;

    let client = McpClient::connect(&url).await.unwrap();

    assert_eq!(client.session_id().unwrap().len(), 32);
    assert!(client.capabilities().get("tools").is_some());
}

#[tokio::test]
async fn test_get_tools_function_shape() {
    let url = spawn_server().await;
    let client = McpClient::connect(&url).await.unwrap();

    let tools = client.get_tools().await.unwrap();

    assert_eq!(tools.len(), 5);
    assert!(tools.iter().all(|t| t.kind == "function"));
    let names: Vec<&str> = tools.iter().map(|t| t.function.name.as_str()).collect();
    assert!(names.contains(&"get_user_by_id"));
    assert!(names.contains(&"delete_users"));
}

#[tokio::test]
async fn test_call_tool_returns_text() {
    let url = spawn_server().await;
    let client = McpClient::connect(&url).await.unwrap();

    let text = client
        .call_tool("get_user_by_id", json!({"id": 7}))
        .await
        .unwrap();

    assert!(text.contains("id: 7"));
    assert!(text.contains("name: Ann"));
}

#[tokio::test]
async fn test_call_tool_service_failure_is_text() {
    let url = spawn_server().await;
    let client = McpClient::connect(&url).await.unwrap();

    let text = client
        .call_tool("get_user_by_id", json!({"id": 404}))
        .await
        .unwrap();

    assert!(text.contains("HTTP 404"));
}

#[tokio::test]
async fn test_unknown_tool_is_rpc_error() {
    let url = spawn_server().await;
    let client = McpClient::connect(&url).await.unwrap();

    let err = client.call_tool("nope", json!({})).await.unwrap_err();

    match err {
        AgentError::Rpc { code, message } => {
            assert_eq!(code, -32601);
            assert_eq!(message, "Tool 'nope' not found");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_method_is_rpc_error() {
    let url = spawn_server().await;
    let client = McpClient::connect(&url).await.unwrap();

    let err = client.send_request("resources/list", None).await.unwrap_err();

    assert!(matches!(err, AgentError::Rpc { code: -32601, .. }));
}

#[tokio::test]
async fn test_connect_to_closed_port_fails() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = McpClient::connect(format!("http://{}/mcp", addr)).await;

    assert!(matches!(result, Err(AgentError::Http(_))));
}
