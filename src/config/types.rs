// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub assets: AssetsConfig,
    #[serde(default)]
    pub http: HttpConfig,
    pub performance: PerformanceConfig,
    pub logging: LoggingConfig,
    pub sink: SinkConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Worker threads; a current-thread runtime is used when unset
    #[serde(default)]
    pub workers: Option<usize>,
}

/// The two static asset roots
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct AssetsConfig {
    /// HTML/UI assets, directories resolve to `index.html`
    pub ui_root: PathBuf,
    /// Script assets, used for every target ending in `.js`
    pub script_root: PathBuf,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct HttpConfig {
    /// Upper bound for ingest bodies in bytes; unlimited when unset
    #[serde(default)]
    pub max_body_size: Option<u64>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Whole-connection timeout in seconds; unlimited when unset
    #[serde(default)]
    pub connection_timeout: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Log file path (optional, stderr if not set)
    #[serde(default)]
    pub log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Where ingested mappings are delivered
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SinkConfig {
    /// One JSON line per mapping on stdout
    #[default]
    Stdout,
    /// One JSON datagram per mapping
    Udp { target: String },
}
