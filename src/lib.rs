//! staticy: serve a directory tree over HTTP, optionally refusing to list
//! directories that have no `index.html`.

pub mod config;
pub mod fs;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
