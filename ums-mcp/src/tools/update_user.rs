//! `update_user` tool

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_arguments, Tool};
use crate::error::McpResult;
use crate::models::UserUpdate;
use crate::user_client::UserService;

/// Input for update_user
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserInput {
    #[serde(deserialize_with = "super::deserialize_user_id")]
    pub id: i64,
    pub new_info: UserUpdate,
}

pub struct UpdateUserTool {
    client: Arc<dyn UserService>,
}

impl UpdateUserTool {
    pub fn new(client: Arc<dyn UserService>) -> Self {
        Self { client }
    }

    async fn update(&self, arguments: Value) -> McpResult<String> {
        let input: UpdateUserInput = parse_arguments(arguments)?;
        tracing::info!(user_id = input.id, "Updating user");
        self.client.update_user(input.id, &input.new_info).await
    }
}

#[async_trait]
impl Tool for UpdateUserTool {
    fn name(&self) -> &str {
        "update_user"
    }

    fn description(&self) -> &str {
        "Updates user info"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "number",
                    "description": "User id that should be updated"
                },
                "new_info": UserUpdate::schema()
            },
            "required": ["id", "new_info"]
        })
    }

    async fn execute(&self, arguments: Value) -> McpResult<String> {
        Ok(self
            .update(arguments)
            .await
            .unwrap_or_else(|e| format!("Error while updating user: {}", e)))
    }
}
