//! JSON-RPC 2.0 message types used by the MCP endpoint

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON-RPC protocol version string
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol version implemented by this server
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Protocol versions a client may negotiate
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &[PROTOCOL_VERSION];

/// Id used on error responses produced before a request could be correlated
pub const SERVER_ERROR_ID: &str = "server-error";

/// Method names routed by the handler
pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const INITIALIZED: &str = "notifications/initialized";
    pub const TOOLS_LIST: &str = "tools/list";
    pub const TOOLS_CALL: &str = "tools/call";
}

/// Standard JSON-RPC error codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

fn default_jsonrpc() -> String {
    JSONRPC_VERSION.to_string()
}

/// MCP JSON-RPC request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    /// Absent for notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
}

impl JsonRpcRequest {
    /// Create a request expecting a response
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Option<Map<String, Value>>) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }

    /// Create a notification (no id, no response payload)
    pub fn notification(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            id: None,
            method: method.into(),
            params: None,
        }
    }

    /// Look up a single parameter
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.as_ref().and_then(|p| p.get(key))
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Either a result or an error, never both
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponsePayload {
    Result(Value),
    Error(JsonRpcError),
}

/// MCP JSON-RPC response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

impl JsonRpcResponse {
    /// Successful response
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            id,
            payload: ResponsePayload::Result(result),
        }
    }

    /// Error response
    pub fn failure(id: Option<Value>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            id,
            payload: ResponsePayload::Error(error),
        }
    }

    /// Error response for a request that could not be correlated
    pub fn server_error(error: JsonRpcError) -> Self {
        Self::failure(Some(Value::from(SERVER_ERROR_ID)), error)
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.payload {
            ResponsePayload::Result(value) => Some(value),
            ResponsePayload::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&JsonRpcError> {
        match &self.payload {
            ResponsePayload::Result(_) => None,
            ResponsePayload::Error(error) => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_request_without_params() {
        let req: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":"abc","method":"tools/list"}"#).unwrap();

        assert_eq!(req.id, Some(json!("abc")));
        assert_eq!(req.method, "tools/list");
        assert!(req.params.is_none());
        assert!(req.param("name").is_none());
    }

    #[test]
    fn test_parse_notification() {
        let req: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).unwrap();

        assert!(req.id.is_none());
        assert_eq!(req, JsonRpcRequest::notification(methods::INITIALIZED));
    }

    #[test]
    fn test_success_has_no_error_member() {
        let resp = JsonRpcResponse::success(Some(json!(1)), json!({"tools": []}));
        let value = serde_json::to_value(&resp).unwrap();

        assert_eq!(value, json!({"jsonrpc": "2.0", "id": 1, "result": {"tools": []}}));
    }

    #[test]
    fn test_failure_has_no_result_member() {
        let resp = JsonRpcResponse::server_error(JsonRpcError::new(-32600, "Missing session ID"));
        let value = serde_json::to_value(&resp).unwrap();

        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "id": "server-error",
                "error": {"code": -32600, "message": "Missing session ID"}
            })
        );
    }

    #[test]
    fn test_response_deserializes_back_into_payload() {
        let resp: JsonRpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": "7",
            "error": {"code": -32601, "message": "Tool 'x' not found"}
        }))
        .unwrap();

        assert!(resp.result().is_none());
        assert_eq!(resp.error().map(|e| e.code), Some(-32601));
    }
}
