//! Trips-per-hour and tier classification.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::pipeline::types::{FrequencyResult, StopFrequency, VisitCount};

/// Colour-coded frequency band of a stop.
///
/// | Trips/hour | Tier       |
/// |------------|------------|
/// | >= 6       | dark-green |
/// | >= 4       | green      |
/// | >= 3       | yellow     |
/// | >= 2       | orange     |
/// | >= 1       | red        |
/// | > 0        | dark-red   |
/// | 0          | black      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    DarkGreen,
    Green,
    Yellow,
    Orange,
    Red,
    DarkRed,
    Black,
}

impl Tier {
    /// Highest band first.
    pub const ALL: [Tier; 7] = [
        Tier::DarkGreen,
        Tier::Green,
        Tier::Yellow,
        Tier::Orange,
        Tier::Red,
        Tier::DarkRed,
        Tier::Black,
    ];

    pub fn from_frequency(frequency: f64) -> Tier {
        match frequency {
            f if f >= 6.0 => Tier::DarkGreen,
            f if f >= 4.0 => Tier::Green,
            f if f >= 3.0 => Tier::Yellow,
            f if f >= 2.0 => Tier::Orange,
            f if f >= 1.0 => Tier::Red,
            f if f > 0.0 => Tier::DarkRed,
            _ => Tier::Black,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tier::DarkGreen => "dark-green",
            Tier::Green => "green",
            Tier::Yellow => "yellow",
            Tier::Orange => "orange",
            Tier::Red => "red",
            Tier::DarkRed => "dark-red",
            Tier::Black => "black",
        }
    }

    /// CSS colour used when drawing the stop.
    pub fn color(&self) -> &'static str {
        match self {
            Tier::DarkGreen => "darkgreen",
            Tier::Green => "green",
            Tier::Yellow => "yellow",
            Tier::Orange => "orange",
            Tier::Red => "red",
            Tier::DarkRed => "darkred",
            Tier::Black => "black",
        }
    }

    /// Legend text for the band.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::DarkGreen => "6+ trips/hour",
            Tier::Green => "4 to 6 trips/hour",
            Tier::Yellow => "3 to 4 trips/hour",
            Tier::Orange => "2 to 3 trips/hour",
            Tier::Red => "1 to 2 trips/hour",
            Tier::DarkRed => "under 1 trip/hour",
            Tier::Black => "no trips",
        }
    }
}

/// Divides each count by the window length and assigns its tier.
/// `window_duration_hours` must be positive.
pub fn classify(visit_counts: &VisitCount, window_duration_hours: f64) -> FrequencyResult {
    let stops: BTreeMap<_, _> = visit_counts
        .iter()
        .map(|(stop_id, count)| {
            let frequency = count as f64 / window_duration_hours;
            (
                stop_id.to_string(),
                StopFrequency {
                    count,
                    frequency,
                    tier: Tier::from_frequency(frequency),
                },
            )
        })
        .collect();
    FrequencyResult { stops }
}
