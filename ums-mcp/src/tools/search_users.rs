//! `search_users` tool

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{parse_arguments, Tool};
use crate::error::McpResult;
use crate::models::UserSearch;
use crate::user_client::UserService;

pub struct SearchUsersTool {
    client: Arc<dyn UserService>,
}

impl SearchUsersTool {
    pub fn new(client: Arc<dyn UserService>) -> Self {
        Self { client }
    }

    async fn search(&self, arguments: Value) -> McpResult<String> {
        // A call with no filters may omit arguments entirely
        let search: UserSearch = match arguments {
            Value::Null => UserSearch::default(),
            other => parse_arguments(other)?,
        };
        self.client.search_users(&search).await
    }
}

#[async_trait]
impl Tool for SearchUsersTool {
    fn name(&self) -> &str {
        "search_users"
    }

    fn description(&self) -> &str {
        "Search users by name, surname, email, gender (all params are optional)"
    }

    fn input_schema(&self) -> Value {
        UserSearch::schema()
    }

    async fn execute(&self, arguments: Value) -> McpResult<String> {
        Ok(self
            .search(arguments)
            .await
            .unwrap_or_else(|e| format!("Error while searching users: {}", e)))
    }
}
