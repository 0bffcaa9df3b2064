//! Request logging wrapper
//!
//! Wraps any request handler and writes one record per request before the
//! handler runs. The wrapper never filters or answers on its own.

use crate::logger::{self, LogFormat, RequestLogEntry};
use hyper::service::Service;
use hyper::Request;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

type Emit = dyn Fn(&RequestLogEntry) + Send + Sync;

/// Destination for request records
#[derive(Clone)]
pub struct RequestLogger {
    emit: Arc<Emit>,
}

impl RequestLogger {
    /// Write records through the global log writer
    pub fn new(format: LogFormat) -> Self {
        Self::from_fn(move |entry| logger::log_request(entry, &format))
    }

    pub fn from_fn(emit: impl Fn(&RequestLogEntry) + Send + Sync + 'static) -> Self {
        Self {
            emit: Arc::new(emit),
        }
    }

    fn record(&self, entry: &RequestLogEntry) {
        (self.emit)(entry);
    }
}

impl fmt::Debug for RequestLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestLogger").finish_non_exhaustive()
    }
}

/// Handler `S` with request logging in front of it
///
/// Built once per connection so every record carries the client address.
#[derive(Debug, Clone)]
pub struct WithRequestLog<S> {
    inner: S,
    remote_addr: SocketAddr,
    logger: RequestLogger,
}

impl<S> WithRequestLog<S> {
    pub const fn new(inner: S, remote_addr: SocketAddr, logger: RequestLogger) -> Self {
        Self {
            inner,
            remote_addr,
            logger,
        }
    }
}

impl<S, B> Service<Request<B>> for WithRequestLog<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn call(&self, req: Request<B>) -> Self::Future {
        self.logger
            .record(&RequestLogEntry::from_request(self.remote_addr, &req));
        self.inner.call(req)
    }
}
