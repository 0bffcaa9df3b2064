//! HTTP response building module
//!
//! Builders for every status the file server answers with. A builder error is
//! logged and replaced by an empty response, so none of these can panic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    ACCEPT_RANGES, ALLOW, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG,
    LAST_MODIFIED, LOCATION,
};
use hyper::{Response, StatusCode};

use super::range::ByteRange;

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";
const CACHE_POLICY: &str = "public, max-age=3600";

/// Validators attached to every file response
#[derive(Debug, Clone)]
pub struct Validators {
    pub etag: String,
    pub last_modified: Option<String>,
}

/// Build a plain-text error response, e.g. `403 Forbidden`
pub fn build_error_response(status: StatusCode) -> Response<Full<Bytes>> {
    let text = format!(
        "{} {}\n",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error")
    );
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header("X-Content-Type-Options", "nosniff")
        .body(Full::new(Bytes::from(text)))
        .unwrap_or_else(|e| fallback(status, &e))
}

/// Build 301 Moved Permanently response
pub fn build_redirect_response(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback(StatusCode::MOVED_PERMANENTLY, &e))
}

/// Build 304 Not Modified response
pub fn build_304_response(validators: &Validators) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(ETAG, &validators.etag)
        .header(CACHE_CONTROL, CACHE_POLICY);
    if let Some(ref modified) = validators.last_modified {
        builder = builder.header(LAST_MODIFIED, modified);
    }
    builder
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback(StatusCode::NOT_MODIFIED, &e))
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    let mut resp = build_error_response(StatusCode::METHOD_NOT_ALLOWED);
    resp.headers_mut()
        .insert(ALLOW, hyper::header::HeaderValue::from_static(ALLOWED_METHODS));
    resp
}

/// Build OPTIONS response
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, ALLOWED_METHODS)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback(StatusCode::NO_CONTENT, &e))
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(total_size: usize) -> Response<Full<Bytes>> {
    let mut resp = build_error_response(StatusCode::RANGE_NOT_SATISFIABLE);
    if let Ok(value) = format!("bytes */{total_size}").parse() {
        resp.headers_mut().insert(CONTENT_RANGE, value);
    }
    resp
}

/// Build generic HTML response (directory listings)
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(StatusCode::OK, &e))
}

/// Build 200 response for a whole file
///
/// `body` is empty for HEAD; `content_length` is always the file size.
pub fn build_file_response(
    body: Bytes,
    content_length: usize,
    content_type: &str,
    validators: &Validators,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, &validators.etag)
        .header(CACHE_CONTROL, CACHE_POLICY);
    if let Some(ref modified) = validators.last_modified {
        builder = builder.header(LAST_MODIFIED, modified);
    }
    builder
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(StatusCode::OK, &e))
}

/// Build 206 Partial Content response; `body` holds only the range
pub fn build_partial_response(
    body: Bytes,
    range: ByteRange,
    total_size: usize,
    content_type: &str,
    validators: &Validators,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, range.len())
        .header(CONTENT_RANGE, range.content_range(total_size))
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, &validators.etag)
        .header(CACHE_CONTROL, CACHE_POLICY);
    if let Some(ref modified) = validators.last_modified {
        builder = builder.header(LAST_MODIFIED, modified);
    }
    builder
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(StatusCode::PARTIAL_CONTENT, &e))
}

fn fallback(status: StatusCode, error: &hyper::http::Error) -> Response<Full<Bytes>> {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
    Response::new(Full::new(Bytes::new()))
}
