//! Logger module
//!
//! Provides logging utilities for the bridge including:
//! - Server lifecycle logging
//! - Per-request and access logging
//! - Error and warning logging
//! - File-based logging support
//!
//! Output goes through `tracing`. Stdout is never used here because the
//! stdout sink owns it.

mod format;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use crate::payload::OutboundMapping;
use std::fs::{File, OpenOptions};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Target used for access log lines, so they can be filtered separately
pub const ACCESS_TARGET: &str = "access";

/// Initialize the global subscriber with configuration
///
/// Should be called once at application startup. `RUST_LOG` takes precedence
/// over `logging.level`.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match config.log_file.as_deref() {
        Some(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(open_log_file(path)?))
            .try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| std::io::Error::new(std::io::ErrorKind::AlreadyExists, e.to_string()))
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> std::io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("Server is listening on port {}", addr.port());
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("UI assets: {}", config.assets.ui_root.display());
    tracing::info!("Script assets: {}", config.assets.script_root.display());
    match config.http.max_body_size {
        Some(limit) => tracing::info!("Max body size: {limit} bytes"),
        None => tracing::info!("Max body size: unlimited"),
    }
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if let Some(ref path) = config.logging.log_file {
        tracing::info!("Log file: {path}");
    }
}

pub fn log_server_stopped(addr: &SocketAddr) {
    tracing::info!("Server on {addr} stopped accepting connections");
}

/// `METHOD URL`, written for every static file request
pub fn log_request(method: &hyper::Method, uri: &hyper::Uri) {
    tracing::info!("{method} {uri}");
}

pub fn log_delivery(mapping: &OutboundMapping) {
    tracing::debug!(id = %mapping.id, "Delivered mapping to host");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

pub fn log_bind_failed(addr: &SocketAddr, err: &std::io::Error) {
    tracing::error!("Server startup error: failed to bind {addr}: {err}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}
