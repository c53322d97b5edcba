// Configuration module entry point
// Loads layered configuration and holds the per-server state

mod state;
mod types;

use std::net::SocketAddr;
use std::path::PathBuf;

pub use state::AppState;
pub use types::{
    AssetsConfig, Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, SinkConfig,
};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UI_ROOT: &str = "other";
pub const DEFAULT_SCRIPT_ROOT: &str = "code";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Config file used when `BRIDGE_CONFIG` is not set (extension optional)
pub const DEFAULT_CONFIG_FILE: &str = "bridge";

impl Config {
    /// Load configuration from `BRIDGE_CONFIG`, or `bridge.toml` when unset
    pub fn load() -> Result<Self, config::ConfigError> {
        let path =
            std::env::var("BRIDGE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Sources, lowest priority first: built-in defaults, the file (optional),
    /// `BRIDGE_*` environment variables with `__` between sections
    /// (e.g. `BRIDGE_SERVER__PORT=3001`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("assets.ui_root", DEFAULT_UI_ROOT)?
            .set_default("assets.script_root", DEFAULT_SCRIPT_ROOT)?
            .set_default("performance.keep_alive", true)?
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            .set_default("logging.access_log", false)?
            .set_default("sink.type", "stdout")?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("BRIDGE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
                workers: None,
            },
            assets: AssetsConfig {
                ui_root: PathBuf::from(DEFAULT_UI_ROOT),
                script_root: PathBuf::from(DEFAULT_SCRIPT_ROOT),
            },
            http: HttpConfig::default(),
            performance: PerformanceConfig {
                keep_alive: true,
                connection_timeout: None,
            },
            logging: LoggingConfig {
                level: DEFAULT_LOG_LEVEL.to_string(),
                access_log: false,
                access_log_format: "combined".to_string(),
                log_file: None,
            },
            sink: SinkConfig::Stdout,
        }
    }
}
