// Connection handling module
// Serves one accepted TCP connection on its own task

use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use tokio::net::TcpStream;

use crate::fs::FileSystem;
use crate::handler::{FileServer, RequestLogger, WithRequestLog};
use crate::logger;

/// Per-connection settings shared by every accepted stream
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    pub keep_alive: bool,
    pub logger: RequestLogger,
}

/// Handle a single connection in a spawned task.
///
/// The file server is wrapped with request logging bound to the peer
/// address, then served over HTTP/1.1 until the client goes away.
pub fn handle_connection<F>(
    stream: TcpStream,
    peer_addr: SocketAddr,
    server: &FileServer<F>,
    options: &ConnectionOptions,
) where
    F: FileSystem + Send + Sync + 'static,
{
    let service = WithRequestLog::new(server.clone(), peer_addr, options.logger.clone());
    let keep_alive = options.keep_alive;

    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(keep_alive);

        if let Err(err) = builder.serve_connection(io, service).await {
            logger::log_connection_error(&err);
        }
    });
}
