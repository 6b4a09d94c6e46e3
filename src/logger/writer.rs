//! Log writer module
//!
//! Thread-safe log writing to stdout/stderr or append-mode files.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::{Mutex, OnceLock};

static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

/// Thread-safe log writer with separate info and error targets
pub struct LogWriter {
    info: LogTarget,
    error: LogTarget,
}

impl LogWriter {
    fn new(info_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<Self> {
        let info = match info_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stdout,
        };

        let error = match error_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stderr,
        };

        Ok(Self { info, error })
    }

    pub fn write_info(&self, line: &str) {
        write_to_target(&self.info, line);
    }

    pub fn write_error(&self, line: &str) {
        write_to_target(&self.error, line);
    }
}

/// Initialize the global log writer. A second call keeps the first targets.
pub fn init(info_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(info_log_file, error_log_file)?;
    let _ = LOG_WRITER.set(writer);
    Ok(())
}

pub fn is_initialized() -> bool {
    LOG_WRITER.get().is_some()
}

/// Get the global log writer.
///
/// # Panics
/// Panics if `init` has not been called; guard with `is_initialized`.
pub fn get() -> &'static LogWriter {
    LOG_WRITER.get().expect("log writer not initialized")
}

fn write_to_target(target: &LogTarget, line: &str) {
    match target {
        LogTarget::Stdout => println!("{line}"),
        LogTarget::Stderr => eprintln!("{line}"),
        LogTarget::File(file) => {
            if let Ok(mut file) = file.lock() {
                // A failed log write must not take the server down
                let _ = writeln!(file, "{line}");
            }
        }
    }
}

fn open_log_file(path: &str) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
