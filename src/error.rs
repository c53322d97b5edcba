//! Startup and lifecycle errors
//!
//! Request-level failures never reach this type; they are turned into a
//! response by the handler that hit them.

use std::net::SocketAddr;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("{0}")]
    Address(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("sink setup failed: {0}")]
    Sink(#[from] crate::sink::SinkError),

    #[error("logger setup failed: {0}")]
    Logger(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
