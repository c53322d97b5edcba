use tokio::sync::mpsc;

use super::{EmitSink, SinkError};
use crate::payload::OutboundMapping;

/// Pushes mappings into an in-process channel
///
/// For embedding the bridge in a larger program, and for tests.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<OutboundMapping>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundMapping>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EmitSink for ChannelSink {
    fn deliver(&self, mapping: &OutboundMapping) -> Result<(), SinkError> {
        self.tx.send(mapping.clone()).map_err(|_| SinkError::Closed)
    }
}
