//! Server module
//!
//! Binds the listener described by an [`AppState`] and runs the accept loop
//! in the background, returning a [`ServerHandle`] to stop it.

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as server_loop
#[path = "loop.rs"]
pub mod server_loop;

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::config::AppState;
use crate::error::BridgeError;
use crate::logger;

pub use listener::create_listener;
pub use server_loop::start_server_loop;

/// A running bridge
///
/// Dropping the handle stops the accept loop, as does [`ServerHandle::shutdown`].
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

/// Bind `state.config.server` and start accepting in a background task
///
/// Must be called from within a Tokio runtime.
pub async fn start(state: AppState) -> Result<ServerHandle, BridgeError> {
    let addr = state
        .config
        .get_socket_addr()
        .map_err(BridgeError::Address)?;

    let listener = create_listener(addr).map_err(|source| {
        logger::log_bind_failed(&addr, &source);
        BridgeError::Bind { addr, source }
    })?;
    let local_addr = listener.local_addr()?;

    let state = Arc::new(state);
    logger::log_server_start(&local_addr, &state.config);

    let (tx, rx) = oneshot::channel();
    let task = tokio::spawn(start_server_loop(listener, state, rx));

    Ok(ServerHandle {
        local_addr,
        shutdown: Some(tx),
        task,
    })
}

impl ServerHandle {
    /// Address actually bound (resolves port 0)
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting and wait for the accept loop to exit
    ///
    /// In-flight connections are left to finish on their own.
    pub async fn shutdown(mut self) -> Result<(), BridgeError> {
        if let Some(tx) = self.shutdown.take() {
            // Err only means the loop is already gone
            let _ = tx.send(());
        }
        (&mut self.task).await?;
        Ok(())
    }

    /// Wait for the accept loop to end without asking it to
    pub async fn wait(&mut self) -> Result<(), BridgeError> {
        (&mut self.task).await?;
        Ok(())
    }
}
