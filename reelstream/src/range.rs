//! HTTP Range header parsing.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::RangeError;

lazy_static! {
    static ref RANGE_RE: Regex = Regex::new(r"^bytes=(\d+)-(\d*)$").unwrap();
}

/// Parse a `Range` header against an object of `total_size` bytes.
///
/// Only the single-range `bytes=<start>-[<end>]` form is accepted. An
/// omitted end means "to the last byte"; an end past the object is clamped
/// to it.
///
/// # Returns
/// The inclusive `(start, end)` byte positions to serve.
///
/// # Errors
/// [`RangeError::InvalidSyntax`] for anything the pattern rejects,
/// [`RangeError::Unsatisfiable`] when `start` is past the object or the
/// range is empty after clamping. Both map to 416; the unsatisfiable case
/// additionally advertises `Content-Range: bytes */{total}`.
pub fn parse_range(header: &str, total_size: u64) -> Result<(u64, u64), RangeError> {
    let captures = RANGE_RE
        .captures(header.trim())
        .ok_or(RangeError::InvalidSyntax)?;

    let start = captures[1]
        .parse::<u64>()
        .map_err(|_| RangeError::InvalidSyntax)?;

    if start >= total_size {
        return Err(RangeError::Unsatisfiable { total: total_size });
    }

    let end = if captures[2].is_empty() {
        total_size - 1
    } else {
        let requested = captures[2]
            .parse::<u64>()
            .map_err(|_| RangeError::InvalidSyntax)?;
        requested.min(total_size - 1)
    };

    if end < start {
        return Err(RangeError::Unsatisfiable { total: total_size });
    }

    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_form() {
        assert_eq!(parse_range("bytes=0-499", 1000), Ok((0, 499)));
        assert_eq!(parse_range("bytes=500-999", 1000), Ok((500, 999)));
    }

    #[test]
    fn test_open_ended() {
        assert_eq!(parse_range("bytes=500-", 1000), Ok((500, 999)));
        assert_eq!(parse_range("bytes=0-", 1), Ok((0, 0)));
    }

    #[test]
    fn test_end_clamped_to_object() {
        assert_eq!(parse_range("bytes=900-5000", 1000), Ok((900, 999)));
    }

    #[test]
    fn test_start_past_object_is_unsatisfiable() {
        assert_eq!(
            parse_range("bytes=1000-", 1000),
            Err(RangeError::Unsatisfiable { total: 1000 })
        );
        assert_eq!(
            parse_range("bytes=5000-6000", 1000),
            Err(RangeError::Unsatisfiable { total: 1000 })
        );
    }

    #[test]
    fn test_inverted_range_is_unsatisfiable() {
        assert_eq!(
            parse_range("bytes=500-100", 1000),
            Err(RangeError::Unsatisfiable { total: 1000 })
        );
    }

    #[test]
    fn test_malformed_headers() {
        for header in ["bytes", "bytes=", "bytes=-500", "bytes=a-b", "0-499", "bytes=0-499,600-"] {
            assert_eq!(parse_range(header, 1000), Err(RangeError::InvalidSyntax), "{}", header);
        }
    }
}
