use chrono::{DateTime, FixedOffset, TimeZone};

const DISPLAY_OFFSET_SECS: i32 = 7 * 60 * 60; // +0700

pub fn datetime_to_string<Tz: TimeZone>(datetime: DateTime<Tz>) -> String {
    let offset = match FixedOffset::east_opt(DISPLAY_OFFSET_SECS) {
        Some(val) => val,
        None => return datetime.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string(),
    };
    datetime
        .with_timezone(&offset)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::datetime_to_string;

    #[test]
    fn test_datetime_to_string_uses_display_offset() {
        let datetime = Utc.with_ymd_and_hms(2025, 1, 31, 20, 15, 0).unwrap();
        assert_eq!(datetime_to_string(datetime), "2025-02-01 03:15:00");
    }
}
