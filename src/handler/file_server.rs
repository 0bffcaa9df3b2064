//! File serving module
//!
//! Maps request paths onto a [`FileSystem`] and renders files, index
//! documents, directory listings, redirects and error statuses.

use crate::fs::{FileSystem, FsError, OpenFile};
use crate::handler::listing;
use crate::http::{self, cache, mime, ByteRange, RangeOutcome, Validators};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH, RANGE};
use hyper::service::Service;
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::fs::Metadata;
use std::future::Future;
use std::io::{self, SeekFrom};
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

const INDEX_DOCUMENT: &str = "index.html";

/// Request context encapsulating information needed for request processing
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Raw URI path, still percent-encoded
    pub path: String,
    pub query: Option<String>,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
    pub range_header: Option<String>,
}

impl RequestContext {
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let header = |name: HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };
        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(ToString::to_string),
            if_none_match: header(IF_NONE_MATCH),
            if_modified_since: header(IF_MODIFIED_SINCE),
            range_header: header(RANGE),
        }
    }

    fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }
}

/// Serves a [`FileSystem`] over HTTP
///
/// Cloning is cheap; all clones share one filesystem.
#[derive(Debug)]
pub struct FileServer<F> {
    fs: Arc<F>,
}

impl<F> Clone for FileServer<F> {
    fn clone(&self) -> Self {
        Self {
            fs: Arc::clone(&self.fs),
        }
    }
}

impl<F: FileSystem + Send + Sync + 'static> FileServer<F> {
    pub fn new(fs: F) -> Self {
        Self { fs: Arc::new(fs) }
    }

    /// Produce the response for one request
    pub async fn respond(&self, ctx: &RequestContext) -> Response<Full<Bytes>> {
        // 1. Check HTTP method
        if let Some(resp) = check_http_method(&ctx.method) {
            return resp;
        }

        // 2. Decode the virtual path
        let Some(name) = decode_path(&ctx.path) else {
            return http::build_error_response(StatusCode::BAD_REQUEST);
        };

        // 3. Explicit index requests point back at their directory
        if name.ends_with(&format!("/{INDEX_DOCUMENT}")) {
            return local_redirect("./", ctx.query.as_deref());
        }

        // 4. Open through the filesystem
        let file = match self.fs.open(&name).await {
            Ok(f) => f,
            Err(e) => return error_response(&name, &e),
        };
        let Ok(metadata) = file.metadata().await else {
            return http::build_error_response(StatusCode::NOT_FOUND);
        };

        if metadata.is_dir() {
            if !name.ends_with('/') {
                let target = format!("{}/", urlencoding::encode(base_name(&name)));
                return local_redirect(&target, ctx.query.as_deref());
            }
            return self.serve_directory(ctx, &name, &file).await;
        }

        if name.ends_with('/') {
            let target = format!("../{}", urlencoding::encode(base_name(&name)));
            return local_redirect(&target, ctx.query.as_deref());
        }

        serve_file(ctx, &name, file, &metadata).await
    }

    /// Serve `index.html` if present, otherwise list the directory
    async fn serve_directory(
        &self,
        ctx: &RequestContext,
        name: &str,
        dir: &OpenFile,
    ) -> Response<Full<Bytes>> {
        let index_name = format!("{name}{INDEX_DOCUMENT}");
        if let Ok(index) = self.fs.open(&index_name).await {
            if let Ok(metadata) = index.metadata().await {
                if metadata.is_file() {
                    return serve_file(ctx, &index_name, index, &metadata).await;
                }
            }
        }

        match dir.read_dir().await {
            Ok(entries) => http::response::build_html_response(
                listing::render_listing(&entries),
                ctx.is_head(),
            ),
            Err(e) => {
                logger::log_error(&format!("Failed to list directory '{name}': {e}"));
                http::build_error_response(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

impl<F, B> Service<Request<B>> for FileServer<F>
where
    F: FileSystem + Send + Sync + 'static,
{
    type Response = Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<B>) -> Self::Future {
        let ctx = RequestContext::from_request(&req);
        let server = self.clone();
        Box::pin(async move { Ok(server.respond(&ctx).await) })
    }
}

/// Only GET and HEAD are served; OPTIONS is answered, the rest refused
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Percent-decode a request path into a rooted virtual path
fn decode_path(raw: &str) -> Option<String> {
    let decoded = urlencoding::decode(raw).ok()?;
    if decoded.contains('\0') {
        return None;
    }
    if decoded.starts_with('/') {
        Some(decoded.into_owned())
    } else {
        Some(format!("/{decoded}"))
    }
}

/// Last path segment, ignoring one trailing slash
fn base_name(name: &str) -> &str {
    let trimmed = name.strip_suffix('/').unwrap_or(name);
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Relative redirect that keeps the query string
fn local_redirect(target: &str, query: Option<&str>) -> Response<Full<Bytes>> {
    match query {
        Some(q) => http::build_redirect_response(&format!("{target}?{q}")),
        None => http::build_redirect_response(target),
    }
}

fn error_response(name: &str, err: &FsError) -> Response<Full<Bytes>> {
    match err {
        FsError::NotFound | FsError::InvalidPath(_) => {
            http::build_error_response(StatusCode::NOT_FOUND)
        }
        FsError::PermissionDenied => http::build_error_response(StatusCode::FORBIDDEN),
        FsError::Io(e) => {
            logger::log_error(&format!("Failed to open '{name}': {e}"));
            http::build_error_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Serve a regular file with validators and Range support
///
/// Validators come from metadata alone. The body is read only when it is
/// sent: not for 304 or HEAD, and only the requested bytes for 206.
async fn serve_file(
    ctx: &RequestContext,
    name: &str,
    file: OpenFile,
    metadata: &Metadata,
) -> Response<Full<Bytes>> {
    let Ok(size) = usize::try_from(metadata.len()) else {
        logger::log_error(&format!("File '{name}' is too large to serve"));
        return http::build_error_response(StatusCode::INTERNAL_SERVER_ERROR);
    };
    let modified = metadata.modified().ok();
    let validators = Validators {
        etag: cache::generate_etag(metadata.len(), modified),
        last_modified: modified.map(cache::http_date),
    };

    // If-None-Match takes precedence over If-Modified-Since
    let not_modified = match ctx.if_none_match.as_deref() {
        Some(_) => cache::check_etag_match(ctx.if_none_match.as_deref(), &validators.etag),
        None => modified.is_some_and(|m| {
            cache::not_modified_since(ctx.if_modified_since.as_deref(), m)
        }),
    };
    if not_modified {
        return http::build_304_response(&validators);
    }

    let content_type = mime::content_type_for(name);
    match http::parse_range_header(ctx.range_header.as_deref(), size) {
        RangeOutcome::Partial(range) => {
            let body = if ctx.is_head() {
                Bytes::new()
            } else {
                match read_range(file, range).await {
                    Ok(body) => body,
                    Err(e) => return read_failure(name, &e),
                }
            };
            http::response::build_partial_response(body, range, size, content_type, &validators)
        }
        RangeOutcome::NotSatisfiable => http::build_416_response(size),
        RangeOutcome::Full => {
            let body = if ctx.is_head() {
                Bytes::new()
            } else {
                let mut data = Vec::with_capacity(size);
                if let Err(e) = file.into_inner().read_to_end(&mut data).await {
                    return read_failure(name, &e);
                }
                Bytes::from(data)
            };
            http::response::build_file_response(body, size, content_type, &validators)
        }
    }
}

/// Read the bytes of `range` from the start of `file`
async fn read_range(file: OpenFile, range: ByteRange) -> io::Result<Bytes> {
    let mut file = file.into_inner();
    file.seek(SeekFrom::Start(range.start as u64)).await?;
    let mut data = vec![0; range.len()];
    file.read_exact(&mut data).await?;
    Ok(Bytes::from(data))
}

fn read_failure(name: &str, err: &io::Error) -> Response<Full<Bytes>> {
    logger::log_error(&format!("Failed to read file '{name}': {err}"));
    http::build_error_response(StatusCode::INTERNAL_SERVER_ERROR)
}
