// Connection handling module
// One spawned task per accepted TCP connection

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::error::Error as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve one connection in a spawned task, keeping the active-connection
/// counter accurate across the task's whole lifetime.
pub fn spawn_connection(
    stream: TcpStream,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    conn_counter.fetch_add(1, Ordering::SeqCst);

    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.config.http.keep_alive);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&service_state);
                async move { handler::handle_request(req, state).await }
            }),
        );

        if let Err(err) = conn.await {
            log_serve_error(&err);
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Classify a connection failure for the log.
///
/// hyper answers malformed requests with 400 Bad Request on the wire before
/// surfacing the parse error here; a peer that reset the connection gets no
/// reply at all, only a log line.
fn log_serve_error(err: &hyper::Error) {
    if is_connection_reset(err) {
        logger::log_error("Remote connection closed  (ECONNRESET)");
    } else if err.is_parse() {
        logger::log_error(&format!("HTTP/1.1 400 Bad Request  ({err})"));
    } else {
        logger::log_connection_error(err);
    }
}

fn is_connection_reset(err: &hyper::Error) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<std::io::Error>() {
            return io_err.kind() == std::io::ErrorKind::ConnectionReset;
        }
        source = cause.source();
    }
    false
}
