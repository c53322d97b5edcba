// Server loop module
// Accepts connections until told to stop

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop for one listener
///
/// Runs until `shutdown` fires or its sender is dropped. Connections already
/// accepted keep running in their own tasks after the loop returns.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    mut shutdown: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            _ = &mut shutdown => break,
        }
    }

    if let Ok(addr) = listener.local_addr() {
        logger::log_server_stopped(&addr);
    }
}
