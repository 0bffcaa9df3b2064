// Server module entry point
// Binds the listener and runs the accept loop until shutdown

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module gets another name
#[path = "loop.rs"]
pub mod server_loop;

pub use connection::ConnectionOptions;
pub use listener::{create_listener, normalize_listen, resolve_listen_addr};
pub use server_loop::start_server_loop;

use std::io;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::Config;
use crate::fs::FileSystem;
use crate::handler::{FileServer, RequestLogger};
use crate::logger;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("cannot resolve listen address {addr}: {source}")]
    Resolve { addr: String, source: io::Error },
    #[error("listen address {0} resolved to no socket address")]
    NoAddress(String),
    #[error("cannot bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },
}

/// Serve `fs` with the configured address and logging until a shutdown
/// signal arrives
///
/// Fails only before serving starts, when the address cannot be resolved or
/// bound.
pub async fn run<F>(config: &Config, fs: F) -> Result<(), ServerError>
where
    F: FileSystem + Send + Sync + 'static,
{
    let addr = resolve_listen_addr(&config.server.listen).await?;
    let listener = create_listener(addr)?;

    logger::log_server_start(config);

    let options = ConnectionOptions {
        keep_alive: config.http.keep_alive,
        logger: RequestLogger::new(config.log_format()),
    };
    start_server_loop(listener, FileServer::new(fs), options, signal::shutdown_signal()).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{Dir, UnindexedDir};
    use crate::logger::LogFormat;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    async fn fetch(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\nHost: test.local\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_serves_unindexed_tree_over_tcp() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("a")).unwrap();
        std::fs::create_dir_all(tmp.path().join("b")).unwrap();
        std::fs::write(tmp.path().join("a/index.html"), b"<h1>a</h1>").unwrap();
        std::fs::write(tmp.path().join("b/notes.txt"), b"plain notes").unwrap();

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();

        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        let options = ConnectionOptions {
            keep_alive: true,
            logger: RequestLogger::from_fn(move |entry| {
                sink.lock().unwrap().push(entry.format(&LogFormat::Default));
            }),
        };

        let (stop, stopped) = oneshot::channel::<()>();
        let server = FileServer::new(UnindexedDir::new(Dir::new(tmp.path())));
        let task = tokio::spawn(start_server_loop(listener, server, options, async {
            let _ = stopped.await;
        }));

        let response = fetch(addr, "/a/").await;
        assert!(response.starts_with("HTTP/1.1 200"), "{response}");
        assert!(response.ends_with("<h1>a</h1>"));

        let response = fetch(addr, "/b/").await;
        assert!(response.starts_with("HTTP/1.1 403"), "{response}");

        let response = fetch(addr, "/b/notes.txt").await;
        assert!(response.starts_with("HTTP/1.1 200"), "{response}");
        assert!(response.ends_with("plain notes"));

        let _ = stop.send(());
        task.await.unwrap();

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(" test.local HTTP/1.1 GET /a/"));
        assert!(lines[1].ends_with(" test.local HTTP/1.1 GET /b/"));
        assert!(lines[2].starts_with("127.0.0.1:"));
    }
}
