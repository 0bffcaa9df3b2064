// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
///
/// Resolved once at startup and never mutated afterwards.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Document root; absolute once loading finishes
    pub docroot: PathBuf,
    /// `host:port` to listen on
    pub listen: String,
    /// Suppress directory listings unless an `index.html` is present
    pub indexing: bool,
    /// Runtime worker threads (CPU cores when unset)
    #[serde(default)]
    pub workers: Option<usize>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub keep_alive: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Request log format (default, json, or custom pattern)
    pub format: String,
    /// Log file path (optional, stderr if not set)
    #[serde(default)]
    pub file: Option<String>,
}
