//! Logger module
//!
//! Logging helpers for the server:
//! - Server lifecycle logging
//! - One record per request in a configurable format
//! - Error and warning logging
//! - Optional file output

mod format;
pub mod writer;

pub use format::{LogFormat, RequestLogEntry};

use crate::config::Config;
use std::path::Path;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(config.logging.file.as_deref().map(Path::new))
}

pub fn log_server_start(config: &Config) {
    writer::write(&format!(
        "http static server listen on http://{} for {}",
        config.server.listen,
        config.server.docroot.display()
    ));
    writer::write(&format!(
        "directory indexing: {}",
        !config.server.indexing
    ));
    if let Some(workers) = config.server.workers {
        writer::write(&format!("worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.file {
        writer::write(&format!("log file: {path}"));
    }
}

/// Log one incoming request
pub fn log_request(entry: &RequestLogEntry, format: &LogFormat) {
    writer::write(&entry.format(format));
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    writer::write(&format!("[ERROR] Failed to serve connection: {err}"));
}

pub fn log_error(message: &str) {
    writer::write(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    writer::write(&format!("[WARN] {message}"));
}

pub fn log_shutdown(reason: &str) {
    writer::write(&format!("{reason} received, shutting down"));
}
