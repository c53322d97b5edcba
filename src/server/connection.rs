// Connection handling module
// Serves one accepted TCP connection with hyper's HTTP/1 machinery

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Accept a connection and hand it to its own task.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
) {
    tracing::trace!("Accepted connection from {peer_addr}");
    handle_connection(stream, peer_addr, Arc::clone(state));
}

/// Handle a single connection in a spawned task.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Configures HTTP/1.1 keep-alive
/// 3. Serves the connection with the request router
/// 4. Applies the connection timeout, if one is configured
fn handle_connection(stream: tokio::net::TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.config.performance.keep_alive);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                handler::handle_request(req, Arc::clone(&service_state), Some(peer_addr))
            }),
        );

        let result = match state.config.performance.connection_timeout {
            Some(secs) => {
                let Ok(result) = tokio::time::timeout(Duration::from_secs(secs), conn).await
                else {
                    logger::log_warning(&format!(
                        "Connection from {peer_addr} timed out after {secs} seconds"
                    ));
                    return;
                };
                result
            }
            None => conn.await,
        };

        if let Err(err) = result {
            logger::log_connection_error(&err);
        }
    });
}
