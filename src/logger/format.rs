//! Request log format module
//!
//! Supports:
//! - `default` (`remote host protocol method uri`, space separated)
//! - `json` (one JSON object per line)
//! - Custom patterns with variables

use chrono::Local;
use hyper::header::HOST;
use hyper::Request;
use std::net::SocketAddr;

/// How request records are rendered
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Default,
    Json,
    Custom(String),
}

impl From<&str> for LogFormat {
    fn from(value: &str) -> Self {
        match value {
            "" | "default" => Self::Default,
            "json" => Self::Json,
            pattern => Self::Custom(pattern.to_string()),
        }
    }
}

/// One incoming request, captured before it is handled
#[derive(Debug, Clone)]
pub struct RequestLogEntry {
    /// Client socket address
    pub remote_addr: String,
    /// `Host` header, or the URI authority when the header is missing
    pub host: String,
    /// Protocol version, e.g. `HTTP/1.1`
    pub protocol: String,
    pub method: String,
    /// Full request target, query included
    pub uri: String,
    pub time: chrono::DateTime<Local>,
}

impl RequestLogEntry {
    pub fn from_request<B>(remote_addr: SocketAddr, req: &Request<B>) -> Self {
        let host = req
            .headers()
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
            .or_else(|| req.uri().authority().map(ToString::to_string))
            .unwrap_or_default();

        Self {
            remote_addr: remote_addr.to_string(),
            host,
            protocol: format!("{:?}", req.version()),
            method: req.method().to_string(),
            uri: req.uri().to_string(),
            time: Local::now(),
        }
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: &LogFormat) -> String {
        match format {
            LogFormat::Default => format!(
                "{} {} {} {} {}",
                self.remote_addr, self.host, self.protocol, self.method, self.uri
            ),
            LogFormat::Json => self.format_json(),
            LogFormat::Custom(pattern) => self.format_custom(pattern),
        }
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "host": self.host,
            "protocol": self.protocol,
            "method": self.method,
            "uri": self.uri,
        })
        .to_string()
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables:
    /// - `$remote_addr` - Client address
    /// - `$host` - Requested host
    /// - `$protocol` - Protocol version
    /// - `$request_method` - HTTP method
    /// - `$request_uri` - Request target with query string
    /// - `$time_iso8601` - ISO 8601 timestamp
    fn format_custom(&self, pattern: &str) -> String {
        pattern
            .replace("$remote_addr", &self.remote_addr)
            .replace("$host", &self.host)
            .replace("$protocol", &self.protocol)
            .replace("$request_method", &self.method)
            .replace("$request_uri", &self.uri)
            .replace("$time_iso8601", &self.time.to_rfc3339())
    }
}
