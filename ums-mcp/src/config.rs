//! Server configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8006;
const DEFAULT_USER_SERVICE_URL: &str = "http://localhost:8041";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Base URL of the user service
    pub user_service_url: String,
    /// Timeout for user service requests in milliseconds
    pub user_service_timeout_ms: u64,
}

impl ServerConfig {
    /// Create a new configuration builder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Read configuration from the environment.
    ///
    /// `UMS_MCP_HOST`, `UMS_MCP_PORT`, `USER_SERVICE_URL` and
    /// `USER_SERVICE_TIMEOUT_MS`; unset or unparsable values keep defaults.
    pub fn from_env() -> Self {
        let mut builder = Self::builder();

        if let Some(host) = env_parse::<IpAddr>("UMS_MCP_HOST") {
            builder = builder.host(host);
        }
        if let Some(port) = env_parse::<u16>("UMS_MCP_PORT") {
            builder = builder.port(port);
        }
        if let Ok(url) = std::env::var("USER_SERVICE_URL") {
            builder = builder.user_service_url(url);
        }
        if let Some(timeout) = env_parse::<u64>("USER_SERVICE_TIMEOUT_MS") {
            builder = builder.user_service_timeout_ms(timeout);
        }

        builder.build()
    }

    /// Socket address to bind
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn user_service_timeout(&self) -> Duration {
        Duration::from_millis(self.user_service_timeout_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            None
        }
    }
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    host: Option<IpAddr>,
    port: Option<u16>,
    user_service_url: Option<String>,
    user_service_timeout_ms: Option<u64>,
}

impl ServerConfigBuilder {
    /// Set the bind address
    pub fn host(mut self, host: IpAddr) -> Self {
        self.host = Some(host);
        self
    }

    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the user service base URL
    pub fn user_service_url(mut self, url: impl Into<String>) -> Self {
        self.user_service_url = Some(url.into());
        self
    }

    /// Set the user service request timeout
    pub fn user_service_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.user_service_timeout_ms = Some(timeout_ms);
        self
    }

    /// Build the configuration
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            host: self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            port: self.port.unwrap_or(DEFAULT_PORT),
            user_service_url: self
                .user_service_url
                .unwrap_or_else(|| DEFAULT_USER_SERVICE_URL.to_string()),
            user_service_timeout_ms: self.user_service_timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8006);
        assert_eq!(config.addr().to_string(), "0.0.0.0:8006");
        assert_eq!(config.user_service_url, "http://localhost:8041");
        assert_eq!(config.user_service_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ServerConfig::builder()
            .host(IpAddr::V4(Ipv4Addr::LOCALHOST))
            .port(9000)
            .user_service_url("http://users:8080")
            .user_service_timeout_ms(500)
            .build();

        assert_eq!(config.addr().to_string(), "127.0.0.1:9000");
        assert_eq!(config.user_service_url, "http://users:8080");
        assert_eq!(config.user_service_timeout_ms, 500);
    }
}
