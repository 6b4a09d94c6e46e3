// Server module entry
// Listener construction, accept loop, and per-connection tasks

pub mod connection;
pub mod listener;

pub use listener::create_reusable_listener;

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;

/// Accept connections forever, spawning one task per connection.
pub async fn run_accept_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
) -> std::io::Result<()> {
    loop {
        match listener.accept().await {
            Ok((stream, _peer_addr)) => {
                connection::spawn_connection(
                    stream,
                    Arc::clone(&state),
                    Arc::clone(&active_connections),
                );
            }
            Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
        }
    }
}
