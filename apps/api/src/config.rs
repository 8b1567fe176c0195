//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to bind (HTTP_HOST)
    pub http_host: String,

    /// HTTP port (HTTP_PORT)
    pub http_port: u16,

    /// SQLite file, created if missing (DATABASE_PATH)
    pub database_path: String,

    /// Pool size (DB_MAX_CONNECTIONS)
    pub db_max_connections: u32,

    /// Allowed CORS origins; `*` allows any (CORS_ALLOWED_ORIGINS, comma separated)
    pub cors_allowed_origins: Vec<String>,

    /// Default tracing filter (RUST_LOG)
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            http_host: "0.0.0.0".to_string(),
            http_port: 8080,
            database_path: "./venda.db".to_string(),
            db_max_connections: 5,
            cors_allowed_origins: vec!["*".to_string()],
            log_level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ApiConfig::default();

        let config = ApiConfig {
            http_host: lookup("HTTP_HOST").unwrap_or(defaults.http_host),

            http_port: match lookup("HTTP_PORT") {
                Some(port) => port
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,
                None => defaults.http_port,
            },

            database_path: lookup("DATABASE_PATH").unwrap_or(defaults.database_path),

            db_max_connections: match lookup("DB_MAX_CONNECTIONS") {
                Some(max) => max
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,
                None => defaults.db_max_connections,
            },

            cors_allowed_origins: match lookup("CORS_ALLOWED_ORIGINS") {
                Some(origins) => origins
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect(),
                None => defaults.cors_allowed_origins,
            },

            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.iter().any(|o| o == "*")
    }

    pub fn allows_origin(&self, origin: &str) -> bool {
        self.allows_any_origin() || self.cors_allowed_origins.iter().any(|o| o == origin)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
