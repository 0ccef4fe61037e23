//! `get_user_by_id` tool

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{parse_arguments, user_id_schema, Tool, UserIdArgs};
use crate::error::McpResult;
use crate::user_client::UserService;

pub struct GetUserByIdTool {
    client: Arc<dyn UserService>,
}

impl GetUserByIdTool {
    pub fn new(client: Arc<dyn UserService>) -> Self {
        Self { client }
    }

    async fn fetch(&self, arguments: Value) -> McpResult<String> {
        let args: UserIdArgs = parse_arguments(arguments)?;
        self.client.get_user(args.id).await
    }
}

#[async_trait]
impl Tool for GetUserByIdTool {
    fn name(&self) -> &str {
        "get_user_by_id"
    }

    fn description(&self) -> &str {
        "Gets user by id"
    }

    fn input_schema(&self) -> Value {
        user_id_schema()
    }

    async fn execute(&self, arguments: Value) -> McpResult<String> {
        Ok(self
            .fetch(arguments)
            .await
            .unwrap_or_else(|e| format!("Error while retrieving user by id: {}", e)))
    }
}
