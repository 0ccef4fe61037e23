//! `delete_users` tool

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{parse_arguments, user_id_schema, Tool, UserIdArgs};
use crate::error::McpResult;
use crate::user_client::UserService;

pub struct DeleteUserTool {
    client: Arc<dyn UserService>,
}

impl DeleteUserTool {
    pub fn new(client: Arc<dyn UserService>) -> Self {
        Self { client }
    }

    async fn delete(&self, arguments: Value) -> McpResult<String> {
        let args: UserIdArgs = parse_arguments(arguments)?;
        tracing::info!(user_id = args.id, "Deleting user");
        self.client.delete_user(args.id).await
    }
}

#[async_trait]
impl Tool for DeleteUserTool {
    fn name(&self) -> &str {
        "delete_users"
    }

    fn description(&self) -> &str {
        "Deletes users"
    }

    fn input_schema(&self) -> Value {
        user_id_schema()
    }

    async fn execute(&self, arguments: Value) -> McpResult<String> {
        Ok(self
            .delete(arguments)
            .await
            .unwrap_or_else(|e| format!("Error while deleting user by id: {}", e)))
    }
}
