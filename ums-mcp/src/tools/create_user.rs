//! `add_user` tool

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{parse_arguments, Tool};
use crate::error::McpResult;
use crate::models::UserCreate;
use crate::user_client::UserService;

pub struct CreateUserTool {
    client: Arc<dyn UserService>,
}

impl CreateUserTool {
    pub fn new(client: Arc<dyn UserService>) -> Self {
        Self { client }
    }

    async fn create(&self, arguments: Value) -> McpResult<String> {
        let user: UserCreate = parse_arguments(arguments)?;
        tracing::info!(email = %user.email, "Creating user");
        self.client.add_user(&user).await
    }
}

#[async_trait]
impl Tool for CreateUserTool {
    fn name(&self) -> &str {
        "add_user"
    }

    fn description(&self) -> &str {
        "Adds new user"
    }

    fn input_schema(&self) -> Value {
        UserCreate::schema()
    }

    async fn execute(&self, arguments: Value) -> McpResult<String> {
        Ok(self
            .create(arguments)
            .await
            .unwrap_or_else(|e| format!("Error while creating a new user: {}", e)))
    }
}
