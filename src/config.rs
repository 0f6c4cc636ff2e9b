use std::time::Duration;

use serde::Deserialize;

use crate::api::RegistrySettings;
use crate::services::EngineSettings;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Redis connection URL (search cache and profile storage)
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Open Library base URL
    #[serde(default = "default_open_library_url")]
    pub open_library_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound for a single book search, in milliseconds
    #[serde(default = "default_source_timeout_ms")]
    pub source_timeout_ms: u64,

    /// Upper bound for a profile load or save, in milliseconds
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    /// How long search results stay cached, in seconds
    #[serde(default = "default_search_cache_ttl")]
    pub search_cache_ttl: u64,

    /// Most users whose engines are kept in memory at once
    #[serde(default = "default_engine_capacity")]
    pub engine_capacity: u64,

    /// Seconds an unused engine stays in memory
    #[serde(default = "default_engine_idle_secs")]
    pub engine_idle_secs: u64,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_open_library_url() -> String {
    "https://openlibrary.org".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_source_timeout_ms() -> u64 {
    5000
}

fn default_store_timeout_ms() -> u64 {
    2000
}

fn default_search_cache_ttl() -> u64 {
    3600
}

fn default_engine_capacity() -> u64 {
    10_000
}

fn default_engine_idle_secs() -> u64 {
    1800
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the HTTP listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            source_timeout: Duration::from_millis(self.source_timeout_ms),
            store_timeout: Duration::from_millis(self.store_timeout_ms),
        }
    }

    pub fn registry_settings(&self) -> RegistrySettings {
        RegistrySettings {
            capacity: self.engine_capacity,
            idle_timeout: Duration::from_secs(self.engine_idle_secs),
        }
    }
}
