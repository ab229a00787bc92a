use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::feed::Feed;
use crate::params::RunParameters;
use crate::pipeline::{FrequencyReport, Tier};

#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub timestamp: DateTime<Utc>,
    pub feed: Option<String>,
    pub date: Option<String>,
    pub weekday: Option<String>,
    pub window_start: Option<String>,
    pub window_end: Option<String>,
    pub window_hours: f64,

    // feed tables
    pub trips: usize,
    pub stop_times: usize,
    /// Rows in stops.txt.
    pub stops: usize,
    pub has_calendar: bool,
    pub has_calendar_dates: bool,
    pub has_frequencies: bool,

    // pipeline
    pub active_services: usize,
    pub eligible_trips: usize,
    pub visits_counted: usize,

    // stops per tier; `stops_reported` also covers stops known only from stop_times
    pub stops_reported: usize,
    pub dark_green: usize,
    pub green: usize,
    pub yellow: usize,
    pub orange: usize,
    pub red: usize,
    pub dark_red: usize,
    pub black: usize,
}

impl RunSummary {
    pub fn from_report(params: &RunParameters, feed: &Feed, report: &FrequencyReport) -> Self {
        let result = &report.result;
        RunSummary {
            timestamp: Utc::now(),
            feed: None,
            date: Some(params.date.to_string()),
            weekday: Some(params.date.weekday_name().to_string()),
            window_start: Some(params.window.start().to_string()),
            window_end: Some(params.window.end().to_string()),
            window_hours: params.window.duration_hours(),
            trips: feed.trips.len(),
            stop_times: feed.stop_visits.len(),
            stops: feed.stops.len(),
            has_calendar: feed.weekly_patterns.is_some(),
            has_calendar_dates: feed.exceptions.is_some(),
            has_frequencies: feed.has_frequencies,
            active_services: report.active_services,
            eligible_trips: report.eligible_trips,
            visits_counted: report.visits_counted,
            stops_reported: result.len(),
            dark_green: result.tier_count(Tier::DarkGreen),
            green: result.tier_count(Tier::Green),
            yellow: result.tier_count(Tier::Yellow),
            orange: result.tier_count(Tier::Orange),
            red: result.tier_count(Tier::Red),
            dark_red: result.tier_count(Tier::DarkRed),
            black: result.tier_count(Tier::Black),
        }
    }

    /// Table sizes only, for inspecting a feed without computing.
    pub fn from_feed(feed: &Feed) -> Self {
        RunSummary {
            timestamp: Utc::now(),
            trips: feed.trips.len(),
            stop_times: feed.stop_visits.len(),
            stops: feed.stops.len(),
            has_calendar: feed.weekly_patterns.is_some(),
            has_calendar_dates: feed.exceptions.is_some(),
            has_frequencies: feed.has_frequencies,
            ..Default::default()
        }
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    /// Share of stops with at least one visit in the window.
    pub fn served_pct(&self) -> f64 {
        Self::pct(
            self.stops_reported.saturating_sub(self.black),
            self.stops_reported,
        )
    }

    pub fn with_feed(mut self, feed: &str) -> Self {
        self.feed = Some(feed.to_string());
        self
    }
}
