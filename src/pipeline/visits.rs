//! Counts scheduled stop visits inside a time window.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::debug;

use crate::model::StopVisit;
use crate::pipeline::types::VisitCount;
use crate::time::VisitWindow;

/// Rows handed to each rayon task by [`count_visits_parallel`].
const CHUNK_ROWS: usize = 16_384;

fn qualifies(visit: &StopVisit, eligible_trips: &HashSet<&str>, window: &VisitWindow) -> bool {
    visit.departure_time.is_some_and(|t| window.contains(t))
        && eligible_trips.contains(visit.trip_id.as_str())
}

/// Counts visits of eligible trips departing in `window`, keyed by the stop
/// each visit actually serves.
#[tracing::instrument(skip_all, fields(rows = stop_visits.len(), window_start = %window.start(), window_end = %window.end()))]
pub fn count_visits(
    stop_visits: &[StopVisit],
    eligible_trips: &HashSet<&str>,
    window: &VisitWindow,
) -> VisitCount {
    let mut counts = VisitCount::default();
    for visit in stop_visits {
        if qualifies(visit, eligible_trips, window) {
            counts.increment(&visit.stop_id);
        }
    }
    debug!(qualifying = counts.total(), stops = counts.len(), "Counted visits");
    counts
}

/// Same result as [`count_visits`], computed over chunks of the table in
/// parallel and merged by key-wise addition.
#[tracing::instrument(skip_all, fields(rows = stop_visits.len(), window_start = %window.start(), window_end = %window.end()))]
pub fn count_visits_parallel(
    stop_visits: &[StopVisit],
    eligible_trips: &HashSet<&str>,
    window: &VisitWindow,
) -> VisitCount {
    let counts = stop_visits
        .par_chunks(CHUNK_ROWS)
        .map(|chunk| {
            let mut counts = VisitCount::default();
            for visit in chunk {
                if qualifies(visit, eligible_trips, window) {
                    counts.increment(&visit.stop_id);
                }
            }
            counts
        })
        .reduce(VisitCount::default, VisitCount::merge);
    debug!(qualifying = counts.total(), stops = counts.len(), "Counted visits");
    counts
}
