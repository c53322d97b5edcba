//! marker-bridge
//!
//! A small local HTTP bridge: serves a UI asset tree and a script asset tree
//! over GET, and forwards `POST /qr/*` marker payloads to a host process
//! through an [`sink::EmitSink`].

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod payload;
pub mod server;
pub mod sink;

pub use config::{AppState, Config};
pub use error::BridgeError;
pub use server::{start, ServerHandle};
