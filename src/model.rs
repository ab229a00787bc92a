//! Typed records for the feed tables the pipeline consumes.
//!
//! Field names follow the GTFS column names so rows deserialize straight out
//! of the CSV files; extra columns are ignored.

use chrono::Weekday;
use serde::{Deserialize, Deserializer};

use crate::time::{ServiceDate, TimeOfDay};

pub type ServiceId = String;
pub type TripId = String;
pub type StopId = String;

/// One row of `calendar.txt`.
#[derive(Debug, Clone, Deserialize)]
pub struct WeeklyServicePattern {
    pub service_id: ServiceId,
    #[serde(deserialize_with = "parse_bool")]
    pub monday: bool,
    #[serde(deserialize_with = "parse_bool")]
    pub tuesday: bool,
    #[serde(deserialize_with = "parse_bool")]
    pub wednesday: bool,
    #[serde(deserialize_with = "parse_bool")]
    pub thursday: bool,
    #[serde(deserialize_with = "parse_bool")]
    pub friday: bool,
    #[serde(deserialize_with = "parse_bool")]
    pub saturday: bool,
    #[serde(deserialize_with = "parse_bool")]
    pub sunday: bool,
    pub start_date: ServiceDate,
    pub end_date: ServiceDate,
}

impl WeeklyServicePattern {
    pub fn runs_on_weekday(&self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    /// Validity range is inclusive at both ends.
    pub fn covers(&self, date: &ServiceDate) -> bool {
        self.start_date <= *date && *date <= self.end_date
    }

    pub fn runs_on(&self, date: &ServiceDate) -> bool {
        self.covers(date) && self.runs_on_weekday(date.weekday())
    }
}

/// `exception_type` of `calendar_dates.txt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionKind {
    /// `1`: service added on this date.
    Added,
    /// `2`: service removed on this date.
    Removed,
}

impl<'de> Deserialize<'de> for ExceptionKind {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        match u8::deserialize(d)? {
            1 => Ok(ExceptionKind::Added),
            2 => Ok(ExceptionKind::Removed),
            n => Err(serde::de::Error::custom(format!(
                "unknown exception_type {n}"
            ))),
        }
    }
}

/// One row of `calendar_dates.txt`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceDateException {
    pub service_id: ServiceId,
    pub date: ServiceDate,
    #[serde(rename = "exception_type")]
    pub kind: ExceptionKind,
}

/// The part of a `trips.txt` row the pipeline needs.
#[derive(Debug, Clone, Deserialize)]
pub struct Trip {
    pub trip_id: TripId,
    pub service_id: ServiceId,
}

/// One row of `stop_times.txt`.
///
/// `departure_time` is empty for stops that are not timepoints; such visits
/// never fall inside a window.
#[derive(Debug, Clone, Deserialize)]
pub struct StopVisit {
    pub trip_id: TripId,
    pub stop_id: StopId,
    #[serde(default, deserialize_with = "parse_optional_time")]
    pub departure_time: Option<TimeOfDay>,
}

/// One row of `stops.txt`. Generic nodes and boarding areas may have no
/// coordinates.
#[derive(Debug, Clone, Deserialize)]
pub struct Stop {
    pub stop_id: StopId,
    #[serde(rename = "stop_name", default)]
    pub name: Option<String>,
    #[serde(rename = "stop_lat", default)]
    pub latitude: Option<f64>,
    #[serde(rename = "stop_lon", default)]
    pub longitude: Option<f64>,
}

impl Stop {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.stop_id)
    }
}

fn parse_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let n = <u8>::deserialize(d)?;
    if n == 1 {
        return Ok(true);
    }
    if n == 0 {
        return Ok(false);
    }
    Err(serde::de::Error::custom(format!("Unknown bool value {n}")))
}

fn parse_optional_time<'de, D: Deserializer<'de>>(d: D) -> Result<Option<TimeOfDay>, D::Error> {
    match Option::<String>::deserialize(d)? {
        Some(s) if !s.trim().is_empty() => TimeOfDay::parse(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
