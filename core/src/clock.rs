//! `M:SS` clock values.

use crate::error::ParseError;

/// Formats a second count as `M:SS`. Minutes are unbounded, seconds are
/// zero-padded to two digits.
pub fn format_clock(total_secs: u32) -> String {
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Parses a `minutes:seconds` value into seconds.
///
/// The seconds part must be exactly two digits, so `1:5` is rejected while
/// `1:05` parses to 65. Malformed input is an error, not a sentinel.
pub fn parse_clock(s: &str) -> Result<u32, ParseError> {
    let invalid = || ParseError::InvalidClock(s.to_string());

    let (minutes, seconds) = s.split_once(':').ok_or_else(invalid)?;
    if minutes.is_empty()
        || seconds.len() != 2
        || !minutes.bytes().all(|b| b.is_ascii_digit())
        || !seconds.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let m: u32 = minutes.parse().map_err(|_| invalid())?;
    let s: u32 = seconds.parse().map_err(|_| invalid())?;
    Ok(m * 60 + s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_padded_seconds() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(5), "0:05");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(format_clock(3661), "61:01");
    }

    #[test]
    fn parses_minutes_and_seconds() {
        assert_eq!(parse_clock("0:00").unwrap(), 0);
        assert_eq!(parse_clock("1:05").unwrap(), 65);
        assert_eq!(parse_clock("10:30").unwrap(), 630);
    }

    #[test]
    fn rejects_malformed_clocks() {
        for bad in ["", "90", "1:5", "1:005", ":30", "1:a5", "a:05", "1:05:00"] {
            assert!(parse_clock(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn format_and_parse_round_trip() {
        for secs in [0, 1, 59, 60, 61, 599, 3600] {
            assert_eq!(parse_clock(&format_clock(secs)).unwrap(), secs);
        }
    }
}
