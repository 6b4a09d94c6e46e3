//! Logger module
//!
//! Timestamped line logging with a verbosity gate:
//! - verbosity 0: error lines only
//! - verbosity 1: everything
//!
//! Each request produces exactly one outcome line ("200: <path>" on success,
//! "<status>: <message>" or "Interrupted: <message>" on failure).

pub mod writer;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::config::{Config, LoggingConfig};

static VERBOSITY: AtomicU8 = AtomicU8::new(1);

/// Initialize the logger with configuration.
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    VERBOSITY.store(config.verbosity, Ordering::Relaxed);
    writer::init(
        config.info_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
}

fn timestamped(message: &str) -> String {
    let now = chrono::Local::now();
    format!("{}  {}", now.format("[%Y-%m-%d %H:%M:%S]"), message)
}

fn write_info(message: &str) {
    let line = timestamped(message);
    if writer::is_initialized() {
        writer::get().write_info(&line);
    } else {
        println!("{line}");
    }
}

fn write_error(message: &str) {
    let line = timestamped(message);
    if writer::is_initialized() {
        writer::get().write_error(&line);
    } else {
        eprintln!("{line}");
    }
}

/// Log an informational line, suppressed at verbosity 0.
pub fn log_info(message: &str) {
    if VERBOSITY.load(Ordering::Relaxed) >= 1 {
        write_info(message);
    }
}

/// Log an error line, emitted at every verbosity.
pub fn log_error(message: &str) {
    write_error(message);
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    let port_suffix = if addr.port() == 80 {
        String::new()
    } else {
        format!(":{}", addr.port())
    };
    write_info(&format!(
        "READY;  \"{}\" directory is available at http://localhost{port_suffix}",
        config.files.public_dir,
    ));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("Failed to serve connection: {err:?}"));
}
