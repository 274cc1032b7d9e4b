//! Vida en Mano backend library
//!
//! This module exports the core functionality of the patient monitoring
//! dashboard: reading ingestion, latest-reading aggregation and the triage
//! status classifier, plus the HTTP surface that serves them.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod session;
pub mod triage;

/// Application configuration
pub mod config {
    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize)]
    pub struct Config {
        pub server: ServerConfig,
        pub database: DatabaseConfig,
        pub session: SessionConfig,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ServerConfig {
        pub host: String,
        pub port: u16,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct DatabaseConfig {
        pub url: String,
        #[serde(default = "default_max_connections")]
        pub max_connections: u32,
        #[serde(default = "default_acquire_timeout_secs")]
        pub acquire_timeout_secs: u64,
        #[serde(default = "default_idle_timeout_secs")]
        pub idle_timeout_secs: u64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct SessionConfig {
        pub secret: String,
        #[serde(default = "default_session_ttl_days")]
        pub ttl_days: i64,
        #[serde(default)]
        pub cookie_secure: bool,
    }

    fn default_max_connections() -> u32 {
        20
    }

    fn default_acquire_timeout_secs() -> u64 {
        2
    }

    fn default_idle_timeout_secs() -> u64 {
        30
    }

    fn default_session_ttl_days() -> i64 {
        7
    }

    /// Load configuration from file
    pub fn load_config() -> Result<Config, config::ConfigError> {
        // Start with default settings
        let mut settings = config::Config::builder()
            .add_source(config::File::with_name("config/default"));

        // Override with environment-specific settings
        let env = std::env::var("VIDA_ENV").unwrap_or_else(|_| "development".into());
        settings = settings
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false));

        // Override with environment variables (VIDA_DATABASE__URL etc.)
        settings = settings.add_source(config::Environment::with_prefix("VIDA").separator("__"));

        settings.build()?.try_deserialize()
    }
}
