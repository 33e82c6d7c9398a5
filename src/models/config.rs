use std::time::Duration;

use serde::Deserialize;

/// Configuration options for the categories service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Interface the HTTP server binds to.
    pub address: String,
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Path of the SQLite database file.
    pub database_url: String,
    /// Maximum number of pooled database connections.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    /// How long a writer waits for SQLite's write lock, in milliseconds.
    /// Keep it above `book_service.timeout_ms`.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Connection settings for the book service mirror.
    pub book_service: BookServiceConfig,
}

/// Where and how to reach the book service.
#[derive(Clone, Debug, Deserialize)]
pub struct BookServiceConfig {
    /// gRPC endpoint, e.g. `http://127.0.0.1:50051`.
    pub url: String,
    /// Deadline applied to every mirror call, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ServerConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl BookServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_pool_size() -> u32 {
    10
}

fn default_busy_timeout_ms() -> u64 {
    30_000
}

fn default_timeout_ms() -> u64 {
    5_000
}

#[cfg(feature = "server")]
impl ServerConfig {
    /// Load `config/default.yaml`, then `config/{APP_ENV}.yaml` if present,
    /// then `APP__*` environment variables (`APP__BOOK_SERVICE__URL`, ...).
    pub fn load() -> Result<Self, config::ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());

        config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
