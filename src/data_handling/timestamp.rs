use chrono::{Local, LocalResult, NaiveDateTime, TimeZone};

use crate::error::{FeedError, FeedResult};

/// Lexical format of feed timestamps, e.g. `2013-09-01 12-30-00`.
pub const FEED_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

/// Epoch milliseconds, the unit of the chart's time axis.
pub type TimestampMs = i64;

/// Converts a feed timestamp, read as local time, into epoch milliseconds.
pub fn normalize(text: &str) -> FeedResult<TimestampMs> {
    normalize_in(text, &Local)
}

/// Same as [`normalize`] but in an explicit time zone.
///
/// A local time that falls in a DST gap is rejected; one that falls in a fold
/// resolves to the earlier instant.
pub fn normalize_in<Tz: TimeZone>(text: &str, tz: &Tz) -> FeedResult<TimestampMs> {
    let invalid = |reason: &str| FeedError::TimestampFormat {
        text: text.to_string(),
        reason: reason.to_string(),
    };

    // chrono treats a format space as "any whitespace", the feed contract is one space.
    let (date, time) = text
        .split_once(' ')
        .ok_or_else(|| invalid("expected date and time separated by a space"))?;
    if date.is_empty() || time.is_empty() || time.contains(char::is_whitespace) {
        return Err(invalid("expected date and time separated by a space"));
    }

    let naive = NaiveDateTime::parse_from_str(text, FEED_TIMESTAMP_FORMAT)
        .map_err(|e| invalid(&e.to_string()))?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) => Ok(t.timestamp_millis()),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.timestamp_millis()),
        LocalResult::None => Err(invalid("local time does not exist")),
    }
}

/// Converts an epoch-seconds value (as sent by the snapshot endpoint) to milliseconds.
pub fn seconds_to_millis(seconds: f64) -> TimestampMs {
    (seconds * 1000.0).round() as TimestampMs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_normalize_matches_slash_form() {
        let expected = NaiveDateTime::parse_from_str("2013/09/01 12:30:00", "%Y/%m/%d %H:%M:%S")
            .unwrap();
        let expected = match Local.from_local_datetime(&expected) {
            LocalResult::Single(t) => t.timestamp_millis(),
            LocalResult::Ambiguous(t, _) => t.timestamp_millis(),
            LocalResult::None => panic!("test time must exist locally"),
        };
        assert_eq!(normalize("2013-09-01 12-30-00").unwrap(), expected);
    }

    #[test]
    fn test_normalize_utc() {
        assert_eq!(
            normalize_in("2013-01-01 00-00-00", &Utc).unwrap(),
            1_356_998_400_000
        );
        assert_eq!(
            normalize_in("2013-01-01 00-00-03", &Utc).unwrap(),
            1_356_998_403_000
        );
    }

    #[test]
    fn test_normalize_is_monotonic() {
        let a = normalize_in("2013-01-01 23-59-59", &Utc).unwrap();
        let b = normalize_in("2013-01-02 00-00-00", &Utc).unwrap();
        assert_eq!(b - a, 1000);
    }

    #[test]
    fn test_reject_malformed() {
        for text in [
            "",
            "garbage",
            "2013-09-01",
            "2013-09-01T12-30-00",
            "2013-09-01  12-30-00",
            "2013/09/01 12:30:00",
            "2013-13-01 12-30-00",
            "2013-09-01 25-30-00",
            "2013-09-01 12-30-00 extra",
        ] {
            match normalize_in(text, &Utc) {
                Err(FeedError::TimestampFormat { text: t, .. }) => assert_eq!(t, text),
                other => panic!("{:?} should be rejected, got {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_seconds_to_millis() {
        let secs = NaiveDate::from_ymd_opt(2013, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp();
        assert_eq!(seconds_to_millis(secs as f64), 1_356_998_400_000);
        assert_eq!(seconds_to_millis(1.5), 1500);
    }
}
