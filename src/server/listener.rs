// Listener module
// Resolves the configured listen address and binds the TCP listener

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use super::ServerError;

/// Pending-connection queue length
const BACKLOG: i32 = 1024;

/// Fill in the wildcard host for `:port` style addresses
///
/// # Examples
/// ```
/// use staticy::server::normalize_listen;
/// assert_eq!(normalize_listen(":8000"), "0.0.0.0:8000");
/// assert_eq!(normalize_listen("127.0.0.1:80"), "127.0.0.1:80");
/// ```
pub fn normalize_listen(listen: &str) -> String {
    let listen = listen.trim();
    if listen.starts_with(':') {
        format!("0.0.0.0{listen}")
    } else {
        listen.to_string()
    }
}

/// Resolve `host:port` to the first socket address it names
pub async fn resolve_listen_addr(listen: &str) -> Result<SocketAddr, ServerError> {
    let normalized = normalize_listen(listen);
    let mut addrs = tokio::net::lookup_host(normalized.as_str())
        .await
        .map_err(|source| ServerError::Resolve {
            addr: listen.to_string(),
            source,
        })?;
    addrs
        .next()
        .ok_or_else(|| ServerError::NoAddress(listen.to_string()))
}

/// Create a `TcpListener` with `SO_REUSEADDR` enabled.
///
/// `SO_REUSEADDR` lets a restarted server bind while old connections sit in
/// `TIME_WAIT`; a port with a live listener still fails to bind.
pub fn create_listener(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    bind(addr).map_err(|source| ServerError::Bind { addr, source })
}

fn bind(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    // Non-blocking mode for async compatibility
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
