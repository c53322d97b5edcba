// Application state module
// Everything a running server needs, passed in explicitly at startup

use std::sync::Arc;

use super::types::Config;
use crate::sink::{EmitSink, SharedSink};

/// Application state
///
/// Immutable for the lifetime of a server: configuration plus the sink that
/// receives ingested mappings.
pub struct AppState {
    pub config: Config,
    pub sink: SharedSink,
}

impl AppState {
    pub fn new(config: Config, sink: SharedSink) -> Self {
        Self { config, sink }
    }

    /// Convenience constructor taking a concrete sink
    pub fn with_sink<S: EmitSink + 'static>(config: Config, sink: S) -> Self {
        Self::new(config, Arc::new(sink))
    }
}
