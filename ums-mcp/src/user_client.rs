//! Client for the external user service
//!
//! The tools only see the [`UserService`] trait; [`HttpUserClient`] is the
//! production implementation talking REST to the service.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{McpError, McpResult};
use crate::models::{UserCreate, UserSearch, UserUpdate};

/// Operations the user tools forward to.
///
/// Every method returns display-ready text.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, user_id: i64) -> McpResult<String>;

    async fn search_users(&self, search: &UserSearch) -> McpResult<String>;

    async fn add_user(&self, user: &UserCreate) -> McpResult<String>;

    async fn update_user(&self, user_id: i64, update: &UserUpdate) -> McpResult<String>;

    async fn delete_user(&self, user_id: i64) -> McpResult<String>;
}

/// REST client for the user service
pub struct HttpUserClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpUserClient {
    /// Create a client for `base_url` (e.g. `http://localhost:8041`)
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> McpResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn users_url(&self) -> String {
        format!("{}/v1/users", self.base_url)
    }

    fn user_url(&self, user_id: i64) -> String {
        format!("{}/v1/users/{}", self.base_url, user_id)
    }

    /// Read the body, turning non-success statuses into errors
    async fn read_json(response: reqwest::Response) -> McpResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(McpError::UserService {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl UserService for HttpUserClient {
    async fn get_user(&self, user_id: i64) -> McpResult<String> {
        tracing::debug!(user_id, "Fetching user");
        let response = self.http.get(self.user_url(user_id)).send().await?;
        let user = Self::read_json(response).await?;
        Ok(format_user(&user))
    }

    async fn search_users(&self, search: &UserSearch) -> McpResult<String> {
        tracing::debug!(?search, "Searching users");
        let response = self
            .http
            .get(format!("{}/search", self.users_url()))
            .query(&search.query_pairs())
            .send()
            .await?;
        let users = Self::read_json(response).await?;
        Ok(format_search_results(&users))
    }

    async fn add_user(&self, user: &UserCreate) -> McpResult<String> {
        let response = self.http.post(self.users_url()).json(user).send().await?;
        let created = Self::read_json(response).await?;
        Ok(format!("User successfully added: {}", created))
    }

    async fn update_user(&self, user_id: i64, update: &UserUpdate) -> McpResult<String> {
        let response = self.http.put(self.user_url(user_id)).json(update).send().await?;
        let updated = Self::read_json(response).await?;
        Ok(format!("User successfully updated: {}", updated))
    }

    async fn delete_user(&self, user_id: i64) -> McpResult<String> {
        let response = self.http.delete(self.user_url(user_id)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(McpError::UserService {
                status: status.as_u16(),
                body,
            });
        }
        Ok("User successfully deleted".to_string())
    }
}

/// Render a user object as a fenced block of `key: value` lines
pub fn format_user(user: &Value) -> String {
    let mut out = String::from("```\n");
    match user.as_object() {
        Some(fields) => {
            for (key, value) in fields {
                match value {
                    Value::String(s) => out.push_str(&format!("  {}: {}\n", key, s)),
                    other => out.push_str(&format!("  {}: {}\n", key, other)),
                }
            }
        }
        None => {
            out.push_str(&format!("  {}\n", user));
        }
    }
    out.push_str("```\n");
    out
}

/// Render a list of users under a search header
pub fn format_search_results(users: &Value) -> String {
    let mut out = String::from("## Search results: \n");
    match users.as_array() {
        Some(list) if !list.is_empty() => {
            for user in list {
                out.push_str(&format_user(user));
            }
        }
        _ => out.push_str("No users found\n"),
    }
    out
}
