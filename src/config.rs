// src/config.rs

use crate::errors::ServerError;
use crate::logging::LogFormat;
use config::Config;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// One worker keeps a single logical writer.
    pub max_workers: usize,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub schema_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Key under which the record list is stored.
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Settings {
    /// Defaults, then `config.toml` (optional), then `LEDGER_*` environment
    /// variables, e.g. `LEDGER_SERVER__PORT=8080`.
    pub fn load() -> Result<Self, ServerError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")
            .and_then(|b| b.set_default("server.port", 3000))
            .and_then(|b| b.set_default("server.max_workers", 1))
            .and_then(|b| b.set_default("database.path", "listing_ledger.sqlite3"))
            .and_then(|b| b.set_default("database.schema_path", "sql/schema.sql"))
            .and_then(|b| b.set_default("storage.key", "savedRecords"))
            .and_then(|b| b.set_default("logging.level", "info"))
            .and_then(|b| b.set_default("logging.format", "pretty"))
            .map_err(|e| ServerError::Config(e.to_string()))?
            .add_source(config::File::with_name("config.toml").required(false))
            .add_source(
                config::Environment::with_prefix("LEDGER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize::<Settings>())
            .map_err(|e| ServerError::Config(e.to_string()))
    }
}

/// Loads `.env` (if present) and then the layered settings.
pub fn load_config() -> Result<Settings, ServerError> {
    dotenvy::dotenv().ok();
    Settings::load()
}
