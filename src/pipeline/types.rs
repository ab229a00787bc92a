//! Data types produced by the pipeline stages.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::model::StopId;
use crate::pipeline::frequency::Tier;

/// Qualifying visits per stop. Stops without visits read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitCount {
    counts: HashMap<StopId, usize>,
}

impl VisitCount {
    pub fn increment(&mut self, stop_id: &str) {
        if let Some(n) = self.counts.get_mut(stop_id) {
            *n += 1;
        } else {
            self.counts.insert(stop_id.to_string(), 1);
        }
    }

    /// Makes sure every given stop has an entry, at zero if it had no visits.
    pub fn seed<'a>(&mut self, stop_ids: impl IntoIterator<Item = &'a str>) {
        for stop_id in stop_ids {
            if !self.counts.contains_key(stop_id) {
                self.counts.insert(stop_id.to_string(), 0);
            }
        }
    }

    /// Key-wise addition.
    pub fn merge(mut self, other: VisitCount) -> VisitCount {
        if self.counts.len() < other.counts.len() {
            return other.merge(self);
        }
        for (stop_id, n) in other.counts {
            *self.counts.entry(stop_id).or_default() += n;
        }
        self
    }

    pub fn get(&self, stop_id: &str) -> usize {
        self.counts.get(stop_id).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Count, trips/hour and tier for one stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StopFrequency {
    pub count: usize,
    pub frequency: f64,
    pub tier: Tier,
}

/// Per-stop classification, iterated in `stop_id` order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyResult {
    pub(crate) stops: BTreeMap<StopId, StopFrequency>,
}

impl FrequencyResult {
    pub fn get(&self, stop_id: &str) -> Option<&StopFrequency> {
        self.stops.get(stop_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StopFrequency)> {
        self.stops.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn tier_count(&self, tier: Tier) -> usize {
        self.stops.values().filter(|s| s.tier == tier).count()
    }
}

/// A [`FrequencyResult`] plus the sizes of the intermediate sets.
#[derive(Debug, Clone)]
pub struct FrequencyReport {
    pub active_services: usize,
    pub eligible_trips: usize,
    pub visits_counted: usize,
    pub result: FrequencyResult,
}
