//! Service-calendar resolution and visit counting.
//!
//! The stages run strictly forward, each over immutable inputs:
//! [`calendar::resolve_active_services`] → [`trips::select_trips`] →
//! [`visits::count_visits`] → [`frequency::classify`].

pub mod calendar;
pub mod frequency;
pub mod trips;
pub mod types;
pub mod visits;

pub use frequency::Tier;
pub use types::{FrequencyReport, FrequencyResult, StopFrequency, VisitCount};

use tracing::info;

use crate::model::{ServiceDateException, Stop, StopVisit, Trip, WeeklyServicePattern};
use crate::time::{ServiceDate, VisitWindow};

/// Borrowed view of the tables a run reads.
#[derive(Debug, Clone, Copy)]
pub struct FeedTables<'a> {
    pub trips: &'a [Trip],
    pub stop_visits: &'a [StopVisit],
    pub stops: &'a [Stop],
    pub weekly_patterns: Option<&'a [WeeklyServicePattern]>,
    pub exceptions: Option<&'a [ServiceDateException]>,
}

/// How the visit counter walks the stop-visit table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountStrategy {
    #[default]
    Sequential,
    Parallel,
    /// Parallel once the table has more than `parallel_rows` rows.
    Auto { parallel_rows: usize },
}

impl CountStrategy {
    fn parallel_for(&self, rows: usize) -> bool {
        match self {
            CountStrategy::Sequential => false,
            CountStrategy::Parallel => true,
            CountStrategy::Auto { parallel_rows } => rows > *parallel_rows,
        }
    }
}

/// Classifies every stop for `date` and `window`.
///
/// Every stop in `stops` appears in the result, at zero visits if nothing
/// qualifies; stops only referenced by stop times appear when they are visited.
pub fn compute_frequencies(
    date: ServiceDate,
    window: &VisitWindow,
    trips: &[Trip],
    stop_visits: &[StopVisit],
    stops: &[Stop],
    weekly_patterns: Option<&[WeeklyServicePattern]>,
    exceptions: Option<&[ServiceDateException]>,
) -> FrequencyResult {
    let tables = FeedTables {
        trips,
        stop_visits,
        stops,
        weekly_patterns,
        exceptions,
    };
    run(date, window, tables, CountStrategy::Sequential).result
}

/// [`compute_frequencies`] with a choice of counting strategy, also reporting
/// the size of each intermediate set.
#[tracing::instrument(skip_all, fields(date = %date, window_start = %window.start(), window_end = %window.end()))]
pub fn run(
    date: ServiceDate,
    window: &VisitWindow,
    tables: FeedTables<'_>,
    strategy: CountStrategy,
) -> FrequencyReport {
    let active =
        calendar::resolve_active_services(date, tables.weekly_patterns, tables.exceptions);
    let eligible = trips::select_trips(tables.trips, &active);

    let mut counts = if strategy.parallel_for(tables.stop_visits.len()) {
        visits::count_visits_parallel(tables.stop_visits, &eligible, window)
    } else {
        visits::count_visits(tables.stop_visits, &eligible, window)
    };
    let visits_counted = counts.total();
    counts.seed(tables.stops.iter().map(|s| s.stop_id.as_str()));

    let result = frequency::classify(&counts, window.duration_hours());

    info!(
        active_services = active.len(),
        eligible_trips = eligible.len(),
        visits_counted,
        stops = result.len(),
        "Computed stop frequencies"
    );

    FrequencyReport {
        active_services: active.len(),
        eligible_trips: eligible.len(),
        visits_counted,
        result,
    }
}
