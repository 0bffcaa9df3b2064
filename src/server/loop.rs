// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use tokio::net::TcpListener;

use super::connection::{handle_connection, ConnectionOptions};
use crate::fs::FileSystem;
use crate::handler::FileServer;
use crate::logger;

/// Accept loop
///
/// Accept errors are logged and the loop keeps going. Once `shutdown`
/// resolves the listener is dropped; connections already running finish on
/// their own tasks.
pub async fn start_server_loop<F, S>(
    listener: TcpListener,
    server: FileServer<F>,
    options: ConnectionOptions,
    shutdown: S,
) where
    F: FileSystem + Send + Sync + 'static,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        handle_connection(stream, peer_addr, &server, &options);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => break,
        }
    }
}
