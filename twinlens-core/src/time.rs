//! History timestamp handling
//!
//! The history endpoint returns timestamps as RFC 3339 strings but may
//! omit the seconds field (`2022-04-27T17:50Z`). Parsing tolerates both
//! forms; anything else is a [`TimeParseError`].

use crate::error::TimeParseError;
use chrono::{DateTime, SecondsFormat, Utc};

// Byte offset of the seconds separator in `YYYY-MM-DDTHH:MM:SS...`.
const SECONDS_INDEX: usize = 16;

/// Parse a history timestamp, restoring an omitted seconds field.
pub fn parse_history_time(input: &str) -> Result<DateTime<Utc>, TimeParseError> {
    if input.is_empty() {
        return Err(TimeParseError::Empty);
    }

    let mut normalized = input.to_string();
    if input.len() > SECONDS_INDEX && !input.is_char_boundary(SECONDS_INDEX) {
        return Err(TimeParseError::Malformed {
            input: input.to_string(),
            reason: "not an RFC 3339 timestamp".to_string(),
        });
    }
    if input.len() > SECONDS_INDEX && &input[SECONDS_INDEX..SECONDS_INDEX + 1] != ":" {
        normalized.insert_str(SECONDS_INDEX, ":00");
    }

    DateTime::parse_from_rfc3339(&normalized)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| TimeParseError::Malformed {
            input: input.to_string(),
            reason: e.to_string(),
        })
}

/// Format a timestamp for the write path (RFC 3339, full precision).
pub fn format_history_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_full_timestamp() {
        let t = parse_history_time("2022-04-27T17:50:00Z").unwrap();
        assert_eq!(t.to_rfc3339(), "2022-04-27T17:50:00+00:00");
    }

    #[test]
    fn test_parse_truncated_seconds_matches_full_form() {
        let truncated = parse_history_time("2022-04-27T17:50Z").unwrap();
        let full = parse_history_time("2022-04-27T17:50:00Z").unwrap();
        assert_eq!(truncated, full);
    }

    #[test]
    fn test_parse_truncated_seconds_with_offset() {
        let t = parse_history_time("2022-04-27T17:50+02:00").unwrap();
        let full = parse_history_time("2022-04-27T15:50:00Z").unwrap();
        assert_eq!(t, full);
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let t = parse_history_time("2022-04-27T17:50:01.250Z").unwrap();
        assert_eq!(t.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_invalid_date_is_an_error_not_zero_time() {
        let err = parse_history_time("2022-02-30T10:00:00Z").unwrap_err();
        assert!(matches!(err, TimeParseError::Malformed { .. }));
    }

    #[test]
    fn test_empty_and_garbage_inputs() {
        assert_eq!(parse_history_time("").unwrap_err(), TimeParseError::Empty);
        assert!(parse_history_time("not-a-time").is_err());
        assert!(parse_history_time("2022-04-27").is_err());
    }

    #[test]
    fn test_format_round_trip() {
        let t = parse_history_time("2022-04-27T17:50:30Z").unwrap();
        let s = format_history_time(&t);
        assert_eq!(parse_history_time(&s).unwrap(), t);
    }

    proptest! {
        #[test]
        fn prop_parse_never_panics(s in "\\PC*") {
            let _ = parse_history_time(&s);
        }

        #[test]
        fn prop_valid_minutes_parse_with_or_without_seconds(
            h in 0u32..24, m in 0u32..60,
        ) {
            let truncated = format!("2023-06-15T{:02}:{:02}Z", h, m);
            let full = format!("2023-06-15T{:02}:{:02}:00Z", h, m);
            prop_assert_eq!(
                parse_history_time(&truncated).unwrap(),
                parse_history_time(&full).unwrap()
            );
        }
    }
}
