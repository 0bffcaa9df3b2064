//! HTTP Range request parsing module
//!
//! Single-range `bytes=` parsing for resumable downloads (RFC 7233).
//! Multi-range requests are answered with the full body.

/// Inclusive byte range already clamped to the file size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    #[inline]
    pub const fn len(self) -> usize {
        self.end - self.start + 1
    }

    /// `Content-Range` header value
    pub fn content_range(self, total_size: usize) -> String {
        format!("bytes {}-{}/{total_size}", self.start, self.end)
    }
}

/// What to send back for a request's Range header
#[derive(Debug, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No usable Range header: send the whole body
    Full,
    /// Send only this slice with 206
    Partial(ByteRange),
    /// Answer 416
    NotSatisfiable,
}

/// Parse HTTP Range header against a body of `size` bytes
///
/// Supported formats:
/// - `bytes=start-end` - Specific range
/// - `bytes=start-` - From start to end
/// - `bytes=-suffix` - Last suffix bytes
///
/// Anything else (other units, multiple ranges, garbage) is ignored.
///
/// # Examples
/// ```
/// use staticy::http::range::{parse_range_header, ByteRange, RangeOutcome};
///
/// let result = parse_range_header(Some("bytes=0-99"), 1000);
/// assert_eq!(result, RangeOutcome::Partial(ByteRange { start: 0, end: 99 }));
///
/// assert_eq!(parse_range_header(None, 1000), RangeOutcome::Full);
/// ```
pub fn parse_range_header(range_header: Option<&str>, size: usize) -> RangeOutcome {
    let Some(spec) = range_header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeOutcome::Full;
    };

    if spec.contains(',') {
        return RangeOutcome::Full;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeOutcome::Full;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    if start_str.is_empty() {
        suffix_range(end_str, size)
    } else {
        bounded_range(start_str, end_str, size)
    }
}

/// `-N`: the last N bytes
fn suffix_range(suffix_str: &str, size: usize) -> RangeOutcome {
    let Ok(suffix) = suffix_str.parse::<usize>() else {
        return RangeOutcome::Full;
    };

    if suffix == 0 || size == 0 {
        return RangeOutcome::NotSatisfiable;
    }

    RangeOutcome::Partial(ByteRange {
        start: size.saturating_sub(suffix),
        end: size - 1,
    })
}

/// `S-` or `S-E`
fn bounded_range(start_str: &str, end_str: &str, size: usize) -> RangeOutcome {
    let Ok(start) = start_str.parse::<usize>() else {
        return RangeOutcome::Full;
    };

    if start >= size {
        return RangeOutcome::NotSatisfiable;
    }

    let end = if end_str.is_empty() {
        size - 1
    } else {
        let Ok(end) = end_str.parse::<usize>() else {
            return RangeOutcome::Full;
        };
        if end < start {
            return RangeOutcome::Full;
        }
        end.min(size - 1)
    };

    RangeOutcome::Partial(ByteRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(start: usize, end: usize) -> RangeOutcome {
        RangeOutcome::Partial(ByteRange { start, end })
    }

    #[test]
    fn test_no_range() {
        assert_eq!(parse_range_header(None, 100), RangeOutcome::Full);
        assert_eq!(parse_range_header(Some("items=0-9"), 100), RangeOutcome::Full);
    }

    #[test]
    fn test_standard_range() {
        assert_eq!(parse_range_header(Some("bytes=0-9"), 100), partial(0, 9));
        assert_eq!(parse_range_header(Some("bytes=90-500"), 100), partial(90, 99));
    }

    #[test]
    fn test_open_range() {
        let outcome = parse_range_header(Some("bytes=50-"), 100);
        assert_eq!(outcome, partial(50, 99));
        if let RangeOutcome::Partial(r) = outcome {
            assert_eq!(r.len(), 50);
            assert_eq!(r.content_range(100), "bytes 50-99/100");
        }
    }

    #[test]
    fn test_suffix_range() {
        assert_eq!(parse_range_header(Some("bytes=-20"), 100), partial(80, 99));
        assert_eq!(parse_range_header(Some("bytes=-500"), 100), partial(0, 99));
    }

    #[test]
    fn test_not_satisfiable() {
        assert_eq!(
            parse_range_header(Some("bytes=200-"), 100),
            RangeOutcome::NotSatisfiable
        );
        assert_eq!(
            parse_range_header(Some("bytes=-0"), 100),
            RangeOutcome::NotSatisfiable
        );
        assert_eq!(
            parse_range_header(Some("bytes=-5"), 0),
            RangeOutcome::NotSatisfiable
        );
        assert_eq!(
            parse_range_header(Some("bytes=0-"), 0),
            RangeOutcome::NotSatisfiable
        );
    }

    #[test]
    fn test_invalid_format() {
        assert_eq!(parse_range_header(Some("bytes=a-b"), 100), RangeOutcome::Full);
        assert_eq!(parse_range_header(Some("bytes=9-2"), 100), RangeOutcome::Full);
        assert_eq!(
            parse_range_header(Some("bytes=0-9,20-29"), 100),
            RangeOutcome::Full
        );
    }
}
