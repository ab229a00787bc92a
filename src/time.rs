//! Service-day dates and clock times.
//!
//! A GTFS service day can run past midnight: `25:10:00` is ten past one in the
//! morning of the next calendar day, but still belongs to the service day it
//! was scheduled on. [`TimeOfDay`] stores seconds since the start of the
//! service day and never wraps at 24 hours.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FrequencyError;

const SECONDS_PER_HOUR: u32 = 3600;

/// A calendar date that a schedule is evaluated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServiceDate(NaiveDate);

impl ServiceDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, FrequencyError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| FrequencyError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))
    }

    /// Parses user input, accepting `YYYY-MM-DD` as well as the feed's `YYYYMMDD`.
    pub fn parse(s: &str) -> Result<Self, FrequencyError> {
        let s = s.trim();
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| Self::parse_feed_date(s))
            .map(Self)
            .map_err(|_| FrequencyError::InvalidDate(s.to_string()))
    }

    fn parse_feed_date(s: &str) -> chrono::ParseResult<NaiveDate> {
        NaiveDate::parse_from_str(s, "%Y%m%d")
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Lower-case English weekday name, matching the GTFS calendar column names.
    pub fn weekday_name(&self) -> &'static str {
        match self.weekday() {
            Weekday::Mon => "monday",
            Weekday::Tue => "tuesday",
            Weekday::Wed => "wednesday",
            Weekday::Thu => "thursday",
            Weekday::Fri => "friday",
            Weekday::Sat => "saturday",
            Weekday::Sun => "sunday",
        }
    }

    /// `YYYYMMDD`, the representation used inside feeds.
    pub fn feed_format(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for ServiceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for ServiceDate {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

/// Feed tables always carry dates as `YYYYMMDD`.
impl<'de> Deserialize<'de> for ServiceDate {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::parse_feed_date(s.trim())
            .map(Self)
            .map_err(|_| serde::de::Error::custom(format!("invalid feed date '{s}'")))
    }
}

/// Seconds since the start of the service day. Values of 86400 and above are
/// trips running past midnight on behalf of the same service day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub const fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self(hours * SECONDS_PER_HOUR + minutes * 60 + seconds)
    }

    /// Parses `H:MM:SS` / `HH:MM:SS`; the hour field is unbounded, minutes and
    /// seconds take exactly two digits.
    pub fn parse(s: &str) -> Result<Self, FrequencyError> {
        let invalid = || FrequencyError::InvalidTime(s.to_string());

        let mut parts = s.trim().split(':');
        let (Some(h), Some(m), Some(sec), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let field = |p: &str| -> Result<u32, FrequencyError> {
            if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            p.parse::<u32>().map_err(|_| invalid())
        };
        if m.len() != 2 || sec.len() != 2 {
            return Err(invalid());
        }
        let (hours, minutes, seconds) = (field(h)?, field(m)?, field(sec)?);
        if minutes >= 60 || seconds >= 60 {
            return Err(invalid());
        }

        hours
            .checked_mul(SECONDS_PER_HOUR)
            .and_then(|t| t.checked_add(minutes * 60 + seconds))
            .map(Self)
            .ok_or_else(invalid)
    }

    pub fn seconds(&self) -> u32 {
        self.0
    }

    /// True when the time falls on the following calendar day.
    pub fn is_past_midnight(&self) -> bool {
        self.0 >= 24 * SECONDS_PER_HOUR
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / SECONDS_PER_HOUR;
        let minutes = (self.0 % SECONDS_PER_HOUR) / 60;
        let seconds = self.0 % 60;
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Half-open `[start, end)` window of the service day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisitWindow {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl VisitWindow {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self, FrequencyError> {
        if end <= start {
            return Err(FrequencyError::EmptyWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, FrequencyError> {
        Self::new(TimeOfDay::parse(start)?, TimeOfDay::parse(end)?)
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.start <= time && time < self.end
    }

    /// Always strictly positive.
    pub fn duration_hours(&self) -> f64 {
        f64::from(self.end.0 - self.start.0) / f64::from(SECONDS_PER_HOUR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_basic() {
        assert_eq!(TimeOfDay::parse("08:00:00").unwrap().seconds(), 28_800);
        assert_eq!(TimeOfDay::parse("8:05:09").unwrap().seconds(), 29_109);
        assert_eq!(TimeOfDay::parse(" 06:00:00 ").unwrap().seconds(), 21_600);
    }

    #[test]
    fn test_parse_time_past_midnight() {
        let t = TimeOfDay::parse("25:00:00").unwrap();
        assert_eq!(t.seconds(), 90_000);
        assert!(t.is_past_midnight());
        assert_eq!(t.to_string(), "25:00:00");
        assert!(!TimeOfDay::parse("23:59:59").unwrap().is_past_midnight());
    }

    #[test]
    fn test_parse_time_rejects_garbage() {
        for bad in ["", "8", "08:00", "08:00:00:00", "aa:00:00", "08:60:00", "08:00:60", "-1:00:00", "08: 00:00"] {
            assert!(
                matches!(TimeOfDay::parse(bad), Err(FrequencyError::InvalidTime(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_time_two_digit_minutes_and_seconds() {
        for bad in ["08:5:0", "08:05:0", "08:5:00", "08:005:00", "08:05:000"] {
            assert!(
                matches!(TimeOfDay::parse(bad), Err(FrequencyError::InvalidTime(_))),
                "{bad:?} should be rejected"
            );
        }
        assert_eq!(TimeOfDay::parse("108:05:00").unwrap().seconds(), 389_100);
    }

    #[test]
    fn test_parse_time_rejects_overflow() {
        assert!(TimeOfDay::parse("9999999:00:00").is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let a = ServiceDate::parse("2023-10-13").unwrap();
        let b = ServiceDate::parse("20231013").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.weekday_name(), "friday");
        assert_eq!(a.feed_format(), "20231013");
        assert_eq!(a.to_string(), "2023-10-13");
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(ServiceDate::parse("2023-02-30").is_err());
        assert!(ServiceDate::parse("13/10/2023").is_err());
        assert!(ServiceDate::parse("").is_err());
        assert!(ServiceDate::from_ymd(2023, 13, 1).is_err());
    }

    #[test]
    fn test_window_is_half_open() {
        let w = VisitWindow::parse("06:00:00", "21:00:00").unwrap();
        assert!(w.contains(TimeOfDay::from_hms(6, 0, 0)));
        assert!(w.contains(TimeOfDay::from_hms(20, 59, 59)));
        assert!(!w.contains(TimeOfDay::from_hms(21, 0, 0)));
        assert!(!w.contains(TimeOfDay::from_hms(5, 59, 59)));
        assert_eq!(w.duration_hours(), 15.0);
    }

    #[test]
    fn test_window_rejects_empty_or_inverted() {
        assert!(matches!(
            VisitWindow::parse("08:00:00", "08:00:00"),
            Err(FrequencyError::EmptyWindow { .. })
        ));
        assert!(VisitWindow::parse("21:00:00", "06:00:00").is_err());
    }

    #[test]
    fn test_window_may_extend_past_midnight() {
        let w = VisitWindow::parse("20:00:00", "27:00:00").unwrap();
        assert!(w.contains(TimeOfDay::from_seconds(90_000)));
        assert_eq!(w.duration_hours(), 7.0);
    }
}
