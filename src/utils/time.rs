use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Utc};

/// Parse a server timestamp. The registry emits both RFC 3339 and the
/// older `YYYY-MM-DD HH:MM:SS UTC` form.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Some(time.with_timezone(&Utc));
    }
    let trimmed = value.trim().trim_end_matches(" UTC");
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Format a server timestamp for display. The year is dropped when it
/// matches the current one; unparsable input passes through untouched.
pub fn format_timestamp(value: &str) -> String {
    format_timestamp_at(value, Utc::now())
}

pub fn format_timestamp_at(value: &str, now: DateTime<Utc>) -> String {
    match parse_timestamp(value) {
        Some(time) if time.year() == now.year() => time.format("%B %-d %H:%M").to_string(),
        Some(time) => time.format("%B %-d %Y %H:%M").to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339() {
        let parsed = parse_timestamp("2015-12-05T02:00:25Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2015, 12, 5, 2, 0, 25).unwrap());
    }

    #[test]
    fn test_parse_legacy_format() {
        let parsed = parse_timestamp("2015-12-05 02:00:25 UTC").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2015, 12, 5, 2, 0, 25).unwrap());
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse_timestamp("not a time").is_none());
    }

    #[test]
    fn test_format_drops_current_year() {
        let now = Utc.with_ymd_and_hms(2015, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(
            format_timestamp_at("2015-12-05 02:00:25 UTC", now),
            "December 5 02:00"
        );
    }

    #[test]
    fn test_format_keeps_other_years() {
        let now = Utc.with_ymd_and_hms(2016, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(
            format_timestamp_at("2015-12-05 02:00:25 UTC", now),
            "December 5 2015 02:00"
        );
    }

    #[test]
    fn test_format_passes_garbage_through() {
        let now = Utc.with_ymd_and_hms(2016, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp_at("t1", now), "t1");
    }
}
