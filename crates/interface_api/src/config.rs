//! API configuration

use serde::Deserialize;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// HS256 secret for authentication tokens
    pub jwt_secret: String,
    /// Database URL
    pub database_url: String,
    /// Log level, overridden by `RUST_LOG`
    pub log_level: String,
    /// Upper bound on pooled database connections
    pub db_max_connections: u32,
    /// Cookie consulted when no bearer token is sent
    pub session_cookie_name: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            database_url: "postgres://localhost/lost_found".to_string(),
            log_level: "info".to_string(),
            db_max_connections: 10,
            session_cookie_name: "session".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_`-prefixed environment variables
    ///
    /// Unset variables fall back to [`ApiConfig::default`].
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("jwt_secret", defaults.jwt_secret)?
            .set_default("database_url", defaults.database_url)?
            .set_default("log_level", defaults.log_level)?
            .set_default("db_max_connections", i64::from(defaults.db_max_connections))?
            .set_default("session_cookie_name", defaults.session_cookie_name)?
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
