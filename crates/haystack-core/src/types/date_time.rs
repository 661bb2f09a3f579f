use chrono::{FixedOffset, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use core::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S%.f";

/// Timezone name attached to instants parsed with a trailing `Z`.
pub const UTC_TZ: &str = "UTC";

/// An instant with its UTC offset plus a timezone display name.
///
/// The name is kept as written (`New_York`, `GMT+5`, `UTC`) and is not
/// resolved against a timezone database. Equality requires both the same
/// instant and the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateTime {
    val: chrono::DateTime<FixedOffset>,
    tz: String,
}

impl DateTime {
    pub fn new(val: chrono::DateTime<FixedOffset>, tz: impl Into<String>) -> Self {
        Self { val, tz: tz.into() }
    }

    pub fn utc(val: chrono::DateTime<Utc>) -> Self {
        Self::new(val.fixed_offset(), UTC_TZ)
    }

    /// Builds an instant from local calendar fields and an offset in seconds
    /// east of UTC. Returns `None` for an invalid offset or ambiguous local
    /// time.
    pub fn from_local(
        date: NaiveDate,
        time: NaiveTime,
        offset_secs: i32,
        tz: impl Into<String>,
    ) -> Option<Self> {
        let offset = FixedOffset::east_opt(offset_secs)?;
        let val = offset.from_local_datetime(&date.and_time(time)).single()?;
        Some(Self::new(val, tz))
    }

    pub fn val(&self) -> &chrono::DateTime<FixedOffset> {
        &self.val
    }

    pub fn tz(&self) -> &str {
        &self.tz
    }

    pub fn date(&self) -> NaiveDate {
        self.val.date_naive()
    }

    pub fn time(&self) -> NaiveTime {
        self.val.time()
    }

    /// RFC 3339 text of the instant with its offset, `Z` for UTC.
    pub fn iso(&self) -> String {
        self.val.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    pub fn to_zinc(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.iso(), self.tz)
    }
}

pub(crate) fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn format_time(time: &NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str, tz: &str) -> DateTime {
        DateTime::new(chrono::DateTime::parse_from_rfc3339(text).unwrap(), tz)
    }

    #[test]
    fn renders_offset_and_zone() {
        let dt = parse("2016-01-13T09:51:33-05:00", "New_York");
        assert_eq!(dt.to_zinc(), "2016-01-13T09:51:33-05:00 New_York");
        let utc = parse("2016-01-13T14:51:33Z", "UTC");
        assert_eq!(utc.to_zinc(), "2016-01-13T14:51:33Z UTC");
        let frac = parse("2016-01-13T14:51:33.250Z", "UTC");
        assert_eq!(frac.to_zinc(), "2016-01-13T14:51:33.250Z UTC");
    }

    #[test]
    fn equality_needs_instant_and_zone() {
        let a = parse("2016-01-13T09:51:33-05:00", "New_York");
        let b = parse("2016-01-13T14:51:33Z", "New_York");
        let c = parse("2016-01-13T09:51:33-05:00", "Chicago");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn builds_from_local_fields() {
        let date = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
        let time = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
        let dt = DateTime::from_local(date, time, 3600, "London").unwrap();
        assert_eq!(dt.iso(), "2021-06-01T08:30:00+01:00");
        assert_eq!(dt.date(), date);
        assert_eq!(dt.time(), time);
    }

    #[test]
    fn formats_calendar_fields() {
        let time = NaiveTime::from_hms_milli_opt(8, 5, 9, 120).unwrap();
        assert_eq!(format_time(&time), "08:05:09.120");
        let date = NaiveDate::from_ymd_opt(2016, 6, 6).unwrap();
        assert_eq!(format_date(&date), "2016-06-06");
    }
}
