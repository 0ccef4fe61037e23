//! MCP client speaking JSON-RPC over HTTP + SSE

use std::time::Duration;

use parking_lot::RwLock;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use ums_mcp::protocol::{methods, JsonRpcRequest, PROTOCOL_VERSION};
use ums_mcp::{FunctionDefinition, ToolDefinition, MCP_SESSION_ID_HEADER};

use crate::error::{AgentError, AgentResult};

const ACCEPT_BOTH: &str = "application/json, text/event-stream";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Text returned by [`McpClient::call_tool`] when the result has no content
pub const NO_CONTENT_TEXT: &str = "Unexpected error occurred!";

/// Tool description in the function-calling shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionTool {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionDefinition,
}

impl From<ToolDefinition> for FunctionTool {
    fn from(def: ToolDefinition) -> Self {
        Self {
            kind: "function".to_string(),
            function: def.into(),
        }
    }
}

/// Extract the first JSON payload from an SSE body.
///
/// Blank lines, `:` comments and the `[DONE]` sentinel are skipped.
pub fn parse_sse(body: &str) -> AgentResult<Value> {
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let Some(data) = line.strip_prefix("data:") else {
            continue;
        };
        let data = data.trim();
        if data == "[DONE]" {
            continue;
        }
        return Ok(serde_json::from_str(data)?);
    }
    Err(AgentError::NoData)
}

/// Connected MCP session
pub struct McpClient {
    http: reqwest::Client,
    url: String,
    session_id: RwLock<Option<String>>,
    capabilities: Value,
}

impl McpClient {
    /// Connect to the server and complete the initialize handshake
    pub async fn connect(url: impl Into<String>) -> AgentResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        let mut client = Self {
            http,
            url: url.into(),
            session_id: RwLock::new(None),
            capabilities: Value::Null,
        };

        let init = client
            .send_request(
                methods::INITIALIZE,
                Some(json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {"tools": {}},
                    "clientInfo": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION")
                    }
                })),
            )
            .await?;

        client.capabilities = init.get("capabilities").cloned().unwrap_or(Value::Null);

        if client.session_id().is_none() {
            return Err(AgentError::InvalidResponse(
                "initialize response carried no session id".to_string(),
            ));
        }

        client.send_notification(methods::INITIALIZED).await?;
        tracing::info!(url = %client.url, session_id = ?client.session_id(), "MCP session ready");

        Ok(client)
    }

    /// Session id assigned by the server
    pub fn session_id(&self) -> Option<String> {
        self.session_id.read().clone()
    }

    /// Capabilities advertised in the initialize response
    pub fn capabilities(&self) -> &Value {
        &self.capabilities
    }

    /// Send a request and return its `result` member
    pub async fn send_request(&self, method: &str, params: Option<Value>) -> AgentResult<Value> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let params = params.map(into_params).transpose()?;
        let request = JsonRpcRequest::new(id, method, params);

        let response = self.post(&request, method != methods::INITIALIZE).await?;
        if response.status() == StatusCode::ACCEPTED {
            return Ok(json!({}));
        }

        let status = response.status();
        let is_sse = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/event-stream"));
        let body = response.text().await?;

        let message = if is_sse {
            parse_sse(&body)?
        } else {
            match serde_json::from_str::<Value>(&body) {
                Ok(value) => value,
                Err(_) if !status.is_success() => {
                    return Err(AgentError::Status {
                        status: status.as_u16(),
                        body,
                    })
                }
                Err(e) => return Err(e.into()),
            }
        };

        if let Some(error) = message.get("error") {
            let error = rpc_error(error);
            tracing::warn!(method, error = %error, "MCP request failed");
            return Err(error);
        }

        Ok(message.get("result").cloned().unwrap_or_else(|| json!({})))
    }

    /// Send a notification; the response carries no payload
    pub async fn send_notification(&self, method: &str) -> AgentResult<()> {
        let request = JsonRpcRequest::notification(method);
        let response = self.post(&request, true).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// List the server tools in function-calling form
    pub async fn get_tools(&self) -> AgentResult<Vec<FunctionTool>> {
        let result = self.send_request(methods::TOOLS_LIST, None).await?;
        let tools = result.get("tools").cloned().unwrap_or_else(|| json!([]));
        let tools: Vec<ToolDefinition> = serde_json::from_value(tools)?;
        Ok(tools.into_iter().map(FunctionTool::from).collect())
    }

    /// Call a tool and return the text of its first content item
    pub async fn call_tool(&self, name: &str, arguments: Value) -> AgentResult<String> {
        let result = self
            .send_request(
                methods::TOOLS_CALL,
                Some(json!({"name": name, "arguments": arguments})),
            )
            .await?;

        let text = result
            .get("content")
            .and_then(Value::as_array)
            .and_then(|content| content.first())
            .and_then(|item| item.get("text"))
            .and_then(Value::as_str);

        Ok(text.unwrap_or(NO_CONTENT_TEXT).to_string())
    }

    async fn post(&self, request: &JsonRpcRequest, with_session: bool) -> AgentResult<reqwest::Response> {
        let mut builder = self
            .http
            .post(&self.url)
            .header(ACCEPT, ACCEPT_BOTH)
            .json(request);

        if with_session {
            if let Some(session_id) = self.session_id() {
                builder = builder.header(MCP_SESSION_ID_HEADER, session_id);
            }
        }

        tracing::debug!(method = %request.method, "Sending MCP request");
        let response = builder.send().await?;

        if let Some(session_id) = response
            .headers()
            .get(MCP_SESSION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            *self.session_id.write() = Some(session_id.to_string());
        }

        Ok(response)
    }
}

/// Convert a JSON-RPC error object; codes outside the `i32` range read as 0
fn rpc_error(error: &Value) -> AgentError {
    let code = error
        .get("code")
        .and_then(Value::as_i64)
        .and_then(|code| i32::try_from(code).ok())
        .unwrap_or(0);
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    AgentError::Rpc { code, message }
}

fn into_params(params: Value) -> AgentResult<Map<String, Value>> {
    match params {
        Value::Object(map) => Ok(map),
        other => Err(AgentError::InvalidResponse(format!(
            "params must be a JSON object, got {}",
            other
        ))),
    }
}
