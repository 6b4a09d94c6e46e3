use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use quickserve::config::{AppState, Config};
use quickserve::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg.logging)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(run(cfg))
}

async fn run(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;

    let listener = match server::create_reusable_listener(addr) {
        Ok(listener) => listener,
        Err(err) => {
            if err.kind() == std::io::ErrorKind::AddrInUse {
                logger::log_error(&format!("Fail: Port {} is already in use", cfg.server.port));
            } else {
                logger::log_error(&format!("Fail: Can not start server ({err})"));
            }
            return Err(err.into());
        }
    };

    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(AppState::new(cfg));
    let active_connections = Arc::new(AtomicUsize::new(0));
    server::run_accept_loop(listener, state, active_connections).await?;
    Ok(())
}
