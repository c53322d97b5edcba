use marker_bridge::config::Config;
use marker_bridge::{logger, server, sink, AppState, BridgeError};

fn main() -> Result<(), BridgeError> {
    let cfg = Config::load()?;
    logger::init(&cfg.logging).map_err(|e| BridgeError::Logger(e.to_string()))?;

    // Single-threaded by default; `server.workers` opts into a thread pool
    let runtime = if let Some(workers) = cfg.server.workers {
        tracing::info!("Using {workers} worker threads");
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(workers)
            .enable_all()
            .build()?
    } else {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?
    };

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), BridgeError> {
    let sink = sink::from_config(&cfg.sink).inspect_err(|e| {
        logger::log_error(&format!("Failed to set up sink {:?}: {e}", cfg.sink));
    })?;

    let mut handle = server::start(AppState::new(cfg, sink)).await?;

    tokio::select! {
        result = handle.wait() => result,
        () = server::signal::shutdown_signal() => handle.shutdown().await,
    }
}
