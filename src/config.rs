//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{MaxAge, DEFAULT_TTL_HOURS};
use crate::library::DEFAULT_HISTORY_LIMIT;

/// Where stored data lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// JSON file under `data_dir`, survives restarts
    File,
    /// Process memory only
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(StoreBackend::File),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

/// Where fresh swgt data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Bundled catalog
    Mock,
    /// swgt JSON endpoints
    Http,
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(SourceKind::Mock),
            "http" => Ok(SourceKind::Http),
            other => Err(format!("unknown swgt source '{}'", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Backing store implementation
    pub store_backend: StoreBackend,
    /// Directory of the file store
    pub data_dir: PathBuf,
    /// Freshness window of cached swgt data, in hours
    pub cache_ttl_hours: u64,
    /// swgt data source
    pub swgt_source: SourceKind,
    /// Base URL of the remote source
    pub swgt_base_url: String,
    /// Per-request timeout of the remote source, in seconds
    pub http_timeout_secs: u64,
    /// Number of search queries kept in history
    pub history_limit: usize,
    /// Seconds between background syncs, 0 disables them
    pub sync_interval: u64,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STORE_BACKEND` - `file` or `memory` (default: file)
    /// - `DATA_DIR` - File store directory (default: ./data)
    /// - `CACHE_TTL_HOURS` - swgt cache TTL (default: 24)
    /// - `SWGT_SOURCE` - `mock` or `http` (default: mock)
    /// - `SWGT_BASE_URL` - Remote base URL (default: https://swgt.io)
    /// - `HTTP_TIMEOUT_SECS` - Remote request timeout (default: 10)
    /// - `HISTORY_LIMIT` - Search history cap (default: 20)
    /// - `SYNC_INTERVAL` - Sync frequency in seconds, 0 disables (default: 21600)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            store_backend: env_or("STORE_BACKEND", defaults.store_backend),
            data_dir: env::var("DATA_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            cache_ttl_hours: env_or("CACHE_TTL_HOURS", defaults.cache_ttl_hours),
            swgt_source: env_or("SWGT_SOURCE", defaults.swgt_source),
            swgt_base_url: env::var("SWGT_BASE_URL").unwrap_or(defaults.swgt_base_url),
            http_timeout_secs: env_or("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs),
            history_limit: env_or("HISTORY_LIMIT", defaults.history_limit),
            sync_interval: env_or("SYNC_INTERVAL", defaults.sync_interval),
        }
    }

    pub fn cache_ttl(&self) -> MaxAge {
        MaxAge::hours(self.cache_ttl_hours)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            store_backend: StoreBackend::File,
            data_dir: PathBuf::from("./data"),
            cache_ttl_hours: DEFAULT_TTL_HOURS,
            swgt_source: SourceKind::Mock,
            swgt_base_url: "https://swgt.io".to_string(),
            http_timeout_secs: 10,
            history_limit: DEFAULT_HISTORY_LIMIT,
            sync_interval: 6 * 60 * 60,
        }
    }
}
