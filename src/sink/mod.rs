//! Host delivery module
//!
//! The bridge's only outbound contact: one call per successful ingest, with
//! no acknowledgement from the host.

mod channel;
mod stdout;
mod udp;

use std::sync::Arc;

pub use channel::ChannelSink;
pub use stdout::StdoutSink;
pub use udp::UdpSink;

use crate::config::SinkConfig;
use crate::payload::OutboundMapping;

/// Errors a sink can report back to the ingest handler
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to encode mapping: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("host channel closed")]
    Closed,
}

/// One-way delivery of a mapping to the host process
///
/// Called synchronously from request handlers, so implementations must not
/// block for long.
pub trait EmitSink: Send + Sync {
    fn deliver(&self, mapping: &OutboundMapping) -> Result<(), SinkError>;
}

pub type SharedSink = Arc<dyn EmitSink>;

/// Build the sink selected in `[sink]`
pub fn from_config(config: &SinkConfig) -> Result<SharedSink, SinkError> {
    match config {
        SinkConfig::Stdout => Ok(Arc::new(StdoutSink::spawn()?)),
        SinkConfig::Udp { target } => Ok(Arc::new(UdpSink::connect(target)?)),
    }
}
