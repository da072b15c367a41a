//! Configuration management for the Inventory Allocation System
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with IAS_ prefix (e.g. IAS__DATABASE__URL)

use config::{builder::DefaultState, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Purchasing hub integration
    pub hub: HubConfig,

    /// Log output configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,

    /// Origin allowed to call the API from a browser
    pub cors_origin: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Seconds to wait for a pooled connection
    pub acquire_timeout_secs: u64,

    /// Apply embedded migrations on startup
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HubConfig {
    /// Base URL of the purchasing hub
    pub base_url: String,

    /// Value sent in the `secret-key` header
    pub secret_key: String,

    /// Outbound request timeout in milliseconds
    pub timeout_ms: u64,

    /// Shared secret for signing inbound webhook calls; unsigned when absent
    pub webhook_secret: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// "pretty" or "json"
    pub format: String,

    /// Default filter directive when RUST_LOG is not set
    pub filter: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("IAS_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Self::builder(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (IAS_ prefix)
            .add_source(
                Environment::with_prefix("IAS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Builder preloaded with the defaults for `environment`
    pub fn builder(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("server.port", 3012)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.cors_origin", "http://localhost:3011")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("database.run_migrations", environment == "development")?
            .set_default("hub.base_url", "https://hub.foomid.id")?
            .set_default("hub.secret_key", "")?
            .set_default("hub.timeout_ms", 5000)?
            .set_default("logging.format", "pretty")?
            .set_default(
                "logging.filter",
                "ias_server=debug,inventory_allocation_backend=debug,tower_http=debug,sqlx=warn",
            )
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(environment: &str, overrides: &[(&str, &str)]) -> Config {
        let mut builder = Config::builder(environment)
            .unwrap()
            .set_override("database.url", "postgres://localhost/inventory_db")
            .unwrap();
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value).unwrap();
        }
        builder.build().unwrap().try_deserialize().unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = build("development", &[]);
        assert_eq!(config.server.port, 3012);
        assert_eq!(config.server.cors_origin, "http://localhost:3011");
        assert_eq!(config.hub.base_url, "https://hub.foomid.id");
        assert_eq!(config.hub.timeout_ms, 5000);
        assert!(config.hub.webhook_secret.is_none());
        assert!(config.database.run_migrations);
        assert!(config.is_development());
    }

    #[test]
    fn test_production_skips_migrations_by_default() {
        let config = build("production", &[]);
        assert!(!config.database.run_migrations);
        assert!(!config.is_development());
    }

    #[test]
    fn test_overrides() {
        let config = build(
            "production",
            &[("hub.webhook_secret", "s3cret"), ("hub.base_url", "http://hub.local")],
        );
        assert_eq!(config.hub.webhook_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.hub.base_url, "http://hub.local");
    }

    #[test]
    fn test_missing_database_url_fails() {
        let result: Result<Config, _> = Config::builder("development")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize();
        assert!(result.is_err());
    }
}
