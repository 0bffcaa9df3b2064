//! Request handler module
//!
//! The file server plus the logging wrapper placed in front of it.

pub mod file_server;
mod listing;
pub mod logging;

// Re-export main entry points
pub use file_server::FileServer;
pub use logging::{RequestLogger, WithRequestLog};
