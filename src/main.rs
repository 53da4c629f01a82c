use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(config::AppState::new(cfg)?);

    // Bind failure (port in use, privileged port) is fatal: the error
    // propagates and the process exits non-zero
    let listener = server::bind_listener(addr)?;

    let signals = Arc::new(server::signal::SignalHandler::new());
    server::signal::start_signal_handler(Arc::clone(&signals));

    logger::log_server_start(&addr, &state);

    let active_connections = Arc::new(AtomicUsize::new(0));
    server::start_server_loop(
        listener,
        state,
        active_connections,
        Arc::clone(&signals.shutdown),
    )
    .await;

    Ok(())
}
