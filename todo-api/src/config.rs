//! Layered configuration: optional YAML file, then `TODO_API_*` environment
//! variables (`__` separates nesting levels, e.g. `TODO_API_STORE__URL`).
//!
//! The `store` section carries the connection settings plus the table name.
//! URL and key have no defaults; a missing or blank one stops the process
//! before it binds a port.

use std::path::Path;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use serde::Deserialize;
use store_client::StoreConfig;

pub const ENV_PREFIX: &str = "TODO_API_";
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub store: StoreSection,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    #[serde(flatten)]
    pub connection: StoreConfig,
    /// Remote table holding the items.
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_table() -> String {
    "todos".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` wins when set.
    pub filter: String,
    /// Emit one JSON object per event instead of human-readable lines.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,todo_api=debug".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Sources in precedence order: `path` (or `config.yaml` when absent,
    /// skipped if the file does not exist), then the environment.
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::new()
            .merge(Yaml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        Self::from_figment(&Self::figment(path))
    }

    pub fn from_figment(figment: &Figment) -> Result<Self, figment::Error> {
        figment.extract()
    }
}
