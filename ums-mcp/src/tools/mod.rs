//! MCP Tool implementations
//!
//! These are the tools exposed to agents through the MCP protocol. Each tool
//! validates its arguments into a typed struct and forwards to the user
//! service.

pub mod create_user;
pub mod delete_user;
pub mod get_user;
pub mod search_users;
pub mod update_user;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{McpError, McpResult};
use crate::user_client::UserService;

pub use create_user::CreateUserTool;
pub use delete_user::DeleteUserTool;
pub use get_user::GetUserByIdTool;
pub use search_users::SearchUsersTool;
pub use update_user::UpdateUserTool;

/// A callable tool.
///
/// `execute` returns human-readable text. User tools fold service failures
/// into that text themselves; an `Err` reaching the protocol handler is
/// reported as an `isError` result.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique registry key
    fn name(&self) -> &str;

    /// Description shown to the agent
    fn description(&self) -> &str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    async fn execute(&self, arguments: Value) -> McpResult<String>;

    /// MCP `tools/list` entry
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Tool definition for MCP protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,

    /// Description shown to the agent
    #[serde(default)]
    pub description: String,

    /// JSON Schema for input parameters
    #[serde(rename = "inputSchema", default = "empty_object")]
    pub input_schema: Value,
}

/// Function-call shaped definition handed to LLM clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl From<ToolDefinition> for FunctionDefinition {
    fn from(def: ToolDefinition) -> Self {
        Self {
            name: def.name,
            description: def.description,
            parameters: def.input_schema,
        }
    }
}

fn empty_object() -> Value {
    json!({})
}

/// `tools/call` result payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            is_error: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            is_error: Some(true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl ToolContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: "text".to_string(),
            text: text.into(),
        }
    }
}

/// Registry of tools, keyed by name, listed in registration order
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the five user tools, sharing one client
    pub fn with_user_tools(client: Arc<dyn UserService>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(GetUserByIdTool::new(Arc::clone(&client))));
        registry.register(Arc::new(SearchUsersTool::new(Arc::clone(&client))));
        registry.register(Arc::new(CreateUserTool::new(Arc::clone(&client))));
        registry.register(Arc::new(UpdateUserTool::new(Arc::clone(&client))));
        registry.register(Arc::new(DeleteUserTool::new(client)));
        registry
    }

    /// Add a tool; a tool with the same name is replaced in place
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        match self.index.get(&name) {
            Some(&slot) => self.tools[slot] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&slot| Arc::clone(&self.tools[slot]))
    }

    /// Definitions in MCP wire shape (`inputSchema`)
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Definitions in function-call shape (`parameters`)
    pub fn functions(&self) -> Vec<FunctionDefinition> {
        self.list().into_iter().map(FunctionDefinition::from).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Deserialize tool arguments into their typed form
pub fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> McpResult<T> {
    serde_json::from_value(arguments).map_err(|e| McpError::Validation(e.to_string()))
}

/// Schema for tools taking a single numeric user id
pub(crate) fn user_id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": {
                "type": "number",
                "description": "User id"
            }
        },
        "required": ["id"]
    })
}

/// Arguments of tools taking a single user id
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserIdArgs {
    #[serde(deserialize_with = "deserialize_user_id")]
    pub id: i64,
}

/// Accept a user id as an integer, an integral float (`5.0`) or a numeric
/// string (`"5"`)
pub fn deserialize_user_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let value = Value::deserialize(deserializer)?;
    let id = match &value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    id.ok_or_else(|| D::Error::custom(format!("invalid user id: {}", value)))
}
