//! Timestamp utilities

use chrono::{DateTime, Local, NaiveDateTime, Utc};

/// Format used for record timestamps written to the `metrics` table
pub const RECORD_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current wall-clock time in the local timezone, without offset
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS`
pub fn format_record_timestamp(at: &NaiveDateTime) -> String {
    at.format(RECORD_TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_format_record_timestamp_layout() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 1)
            .unwrap();
        assert_eq!(format_record_timestamp(&at), "2024-03-07 09:05:01");
    }

    #[test]
    fn test_local_now_round_trips_through_format() {
        let formatted = format_record_timestamp(&local_now());
        assert_eq!(formatted.len(), 19);
        assert!(NaiveDateTime::parse_from_str(&formatted, RECORD_TIMESTAMP_FORMAT).is_ok());
    }
}
