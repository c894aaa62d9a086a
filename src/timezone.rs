use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

#[cfg(test)]
mod get_local_offset_tests {
    use super::get_local_offset;

    #[test]
    fn returns_offset_for_canonical_timezone() {
        assert!(get_local_offset("Asia/Jakarta").is_some());
    }

    #[test]
    fn returns_none_for_unknown_timezone() {
        assert!(get_local_offset("Not/ATimezone").is_none());
    }
}
