//! MIME type detection module
//!
//! Maps a served file's extension to its `Content-Type`.

use std::path::Path;

const FALLBACK: &str = "application/octet-stream";

/// Get MIME Content-Type for a virtual path
///
/// Extensions are matched case-insensitively.
///
/// # Examples
/// ```
/// use staticy::http::mime::content_type_for;
/// assert_eq!(content_type_for("/a/index.html"), "text/html; charset=utf-8");
/// assert_eq!(content_type_for("/clip.MP4"), "video/mp4");
/// assert_eq!(content_type_for("/LICENSE"), "application/octet-stream");
/// ```
pub fn content_type_for(name: &str) -> &'static str {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map_or(FALLBACK, |ext| by_extension(&ext.to_ascii_lowercase()))
}

fn by_extension(extension: &str) -> &'static str {
    match extension {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "txt" | "md" => "text/plain; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",
        "xml" => "application/xml",

        // JavaScript/WASM
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "avif" => "image/avif",

        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "mov" => "video/quicktime",

        // Audio
        "mp3" => "audio/mpeg",
        "ogg" | "oga" => "audio/ogg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Archives and documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "tar" => "application/x-tar",

        _ => FALLBACK,
    }
}
