//! HTTP protocol layer module
//!
//! Protocol helpers shared by the file server: content types, validators,
//! ranges and response builders. Nothing in here touches the filesystem.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use range::{parse_range_header, ByteRange, RangeOutcome};
pub use response::{
    build_304_response, build_405_response, build_416_response, build_error_response,
    build_options_response, build_redirect_response, Validators,
};
