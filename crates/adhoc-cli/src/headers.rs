//! Conditional and partial request helpers.
//!
//! HTTP dates use the IMF-fixdate form (`Sun, 06 Nov 1994 08:49:37 GMT`).
//! Only single byte ranges are honoured; a multi-range request is served in
//! full, which clients must accept.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Formats a timestamp as an HTTP date.
///
/// # Examples
///
/// ```
/// use adhoc_httpd::headers::http_date;
/// use std::time::{Duration, UNIX_EPOCH};
///
/// let t = UNIX_EPOCH + Duration::from_secs(784_111_777);
/// assert_eq!(http_date(t), "Sun, 06 Nov 1994 08:49:37 GMT");
/// ```
#[must_use]
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE).to_string()
}

/// Parses an HTTP date, returning `None` for anything unrecognised.
#[must_use]
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

/// Returns `true` if a resource modified at `modified` is unchanged since
/// the `If-Modified-Since` value. HTTP dates carry whole seconds, so the
/// comparison truncates.
#[must_use]
pub fn not_modified_since(modified: SystemTime, if_modified_since: &str) -> bool {
    let Some(since) = parse_http_date(if_modified_since) else {
        return false;
    };
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}

/// Outcome of evaluating a `Range` header against a resource length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRange {
    /// Serve the whole body
    Full,
    /// Serve `start..=end`
    Partial {
        /// First byte offset
        start: u64,
        /// Last byte offset, inclusive
        end: u64,
    },
    /// No requested byte exists
    Unsatisfiable,
}

impl ByteRange {
    /// Evaluates a `Range` header value for a body of `size` bytes.
    ///
    /// Malformed headers and multi-range requests yield [`ByteRange::Full`].
    ///
    /// # Examples
    ///
    /// ```
    /// use adhoc_httpd::headers::ByteRange;
    ///
    /// assert_eq!(ByteRange::parse("bytes=0-3", 10), ByteRange::Partial { start: 0, end: 3 });
    /// assert_eq!(ByteRange::parse("bytes=-4", 10), ByteRange::Partial { start: 6, end: 9 });
    /// assert_eq!(ByteRange::parse("bytes=20-", 10), ByteRange::Unsatisfiable);
    /// ```
    #[must_use]
    pub fn parse(header: &str, size: u64) -> Self {
        let Some(ranges) = header.trim().strip_prefix("bytes=") else {
            return Self::Full;
        };
        if ranges.contains(',') {
            return Self::Full;
        }
        let Some((first, last)) = ranges.trim().split_once('-') else {
            return Self::Full;
        };
        let (first, last) = (first.trim(), last.trim());

        if first.is_empty() {
            // suffix range: the final N bytes
            let Ok(suffix) = last.parse::<u64>() else {
                return Self::Full;
            };
            if suffix == 0 || size == 0 {
                return Self::Unsatisfiable;
            }
            return Self::Partial {
                start: size.saturating_sub(suffix),
                end: size - 1,
            };
        }

        let Ok(start) = first.parse::<u64>() else {
            return Self::Full;
        };
        let end = if last.is_empty() {
            None
        } else {
            match last.parse::<u64>() {
                Ok(end) if end >= start => Some(end),
                _ => return Self::Full,
            }
        };

        if start >= size {
            return Self::Unsatisfiable;
        }
        Self::Partial {
            start,
            end: end.map_or(size - 1, |end| end.min(size - 1)),
        }
    }

    /// Number of bytes to send for a body of `size` bytes.
    #[must_use]
    pub const fn byte_count(self, size: u64) -> u64 {
        match self {
            Self::Full => size,
            Self::Partial { start, end } => end - start + 1,
            Self::Unsatisfiable => 0,
        }
    }

    /// Offset of the first byte to send.
    #[must_use]
    pub const fn start(self) -> u64 {
        match self {
            Self::Partial { start, .. } => start,
            Self::Full | Self::Unsatisfiable => 0,
        }
    }

    /// `Content-Range` value for this range.
    #[must_use]
    pub fn content_range(self, size: u64) -> Option<String> {
        match self {
            Self::Full => None,
            Self::Partial { start, end } => Some(format!("bytes {start}-{end}/{size}")),
            Self::Unsatisfiable => Some(format!("bytes */{size}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_http_date_round_trips_to_the_second() {
        let t = UNIX_EPOCH + Duration::from_millis(1_700_000_000_250);
        let formatted = http_date(t);
        let parsed = parse_http_date(&formatted).unwrap();
        assert_eq!(parsed.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_parse_http_date_rejects_garbage() {
        assert!(parse_http_date("yesterday").is_none());
        assert!(parse_http_date("").is_none());
    }

    #[test]
    fn test_not_modified_since() {
        let modified = UNIX_EPOCH + Duration::from_millis(1_700_000_000_900);
        let same_second = http_date(UNIX_EPOCH + Duration::from_secs(1_700_000_000));
        let earlier = http_date(UNIX_EPOCH + Duration::from_secs(1_699_999_999));

        assert!(not_modified_since(modified, &same_second));
        assert!(!not_modified_since(modified, &earlier));
        assert!(!not_modified_since(modified, "not a date"));
    }

    #[test]
    fn test_range_forms() {
        assert_eq!(
            ByteRange::parse("bytes=2-5", 10),
            ByteRange::Partial { start: 2, end: 5 }
        );
        assert_eq!(
            ByteRange::parse("bytes=2-", 10),
            ByteRange::Partial { start: 2, end: 9 }
        );
        assert_eq!(
            ByteRange::parse("bytes=5-100", 10),
            ByteRange::Partial { start: 5, end: 9 }
        );
        assert_eq!(
            ByteRange::parse("bytes=-100", 10),
            ByteRange::Partial { start: 0, end: 9 }
        );
    }

    #[test]
    fn test_range_unsatisfiable() {
        assert_eq!(ByteRange::parse("bytes=10-", 10), ByteRange::Unsatisfiable);
        assert_eq!(ByteRange::parse("bytes=-0", 10), ByteRange::Unsatisfiable);
        assert_eq!(ByteRange::parse("bytes=0-", 0), ByteRange::Unsatisfiable);
        assert_eq!(
            ByteRange::Unsatisfiable.content_range(10).as_deref(),
            Some("bytes */10")
        );
    }

    #[test]
    fn test_range_ignored_when_malformed() {
        assert_eq!(ByteRange::parse("items=0-1", 10), ByteRange::Full);
        assert_eq!(ByteRange::parse("bytes=0-1,4-5", 10), ByteRange::Full);
        assert_eq!(ByteRange::parse("bytes=5-2", 10), ByteRange::Full);
        assert_eq!(ByteRange::parse("bytes=x-", 10), ByteRange::Full);
    }

    #[test]
    fn test_range_lengths() {
        let range = ByteRange::Partial { start: 3, end: 6 };
        assert_eq!(range.byte_count(10), 4);
        assert_eq!(range.start(), 3);
        assert_eq!(range.content_range(10).as_deref(), Some("bytes 3-6/10"));
        assert_eq!(ByteRange::Full.byte_count(10), 10);
        assert!(ByteRange::Full.content_range(10).is_none());
    }
}
