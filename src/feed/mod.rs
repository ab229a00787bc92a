//! Loads the tables of a static feed.
//!
//! [`FeedSource`] picks where the feed lives (directory, zip archive or URL),
//! [`TableSource`] opens individual tables and [`Feed`] holds the parsed rows.

mod fetch;
mod source;

pub use fetch::fetch_bytes;
pub use source::{ArchiveSource, DirectorySource, FeedSource, TableSource};

use std::collections::HashMap;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::FrequencyError;
use crate::model::{ServiceDateException, Stop, StopVisit, Trip, WeeklyServicePattern};
use crate::params::RunParameters;
use crate::pipeline::{self, CountStrategy, FeedTables, FrequencyReport};

pub const TRIPS: &str = "trips.txt";
pub const STOP_TIMES: &str = "stop_times.txt";
pub const STOPS: &str = "stops.txt";
pub const CALENDAR: &str = "calendar.txt";
pub const CALENDAR_DATES: &str = "calendar_dates.txt";
pub const FREQUENCIES: &str = "frequencies.txt";

/// Parsed tables of one feed.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    pub trips: Vec<Trip>,
    pub stop_visits: Vec<StopVisit>,
    pub stops: Vec<Stop>,
    pub weekly_patterns: Option<Vec<WeeklyServicePattern>>,
    pub exceptions: Option<Vec<ServiceDateException>>,
    /// Headway-based service is not expanded into visits, so stops served by
    /// those trips are undercounted.
    pub has_frequencies: bool,
}

impl Feed {
    #[tracing::instrument(skip_all, fields(source = ?source))]
    pub fn load(source: &FeedSource) -> Result<Feed> {
        let mut tables = source.open()?;
        Self::from_tables(tables.as_mut())
    }

    pub fn from_tables(tables: &mut dyn TableSource) -> Result<Feed> {
        info!(feed = %tables.describe(), "Loading feed");

        let trips = read_required(tables, TRIPS)?;
        let stop_visits = read_required(tables, STOP_TIMES)?;
        let stops = read_required(tables, STOPS)?;
        let weekly_patterns = read_table(tables, CALENDAR)?;
        let exceptions = read_table(tables, CALENDAR_DATES)?;
        let has_frequencies = tables.contains(FREQUENCIES);

        let feed = Feed {
            trips,
            stop_visits,
            stops,
            weekly_patterns,
            exceptions,
            has_frequencies,
        };

        if feed.weekly_patterns.is_none() {
            info!("Feed has no {CALENDAR}, services come from {CALENDAR_DATES} only");
        }
        if feed.exceptions.is_none() {
            debug!("Feed has no {CALENDAR_DATES}");
        }
        if feed.has_frequencies {
            warn!(
                "Feed defines headway-based service in {FREQUENCIES}; it is ignored and stops on those trips will be undercounted"
            );
        }

        info!(
            trips = feed.trips.len(),
            stop_times = feed.stop_visits.len(),
            stops = feed.stops.len(),
            calendar = feed.weekly_patterns.as_ref().map_or(0, Vec::len),
            calendar_dates = feed.exceptions.as_ref().map_or(0, Vec::len),
            "Feed loaded"
        );
        Ok(feed)
    }

    pub fn tables(&self) -> FeedTables<'_> {
        FeedTables {
            trips: &self.trips,
            stop_visits: &self.stop_visits,
            stops: &self.stops,
            weekly_patterns: self.weekly_patterns.as_deref(),
            exceptions: self.exceptions.as_deref(),
        }
    }

    pub fn compute(&self, params: &RunParameters, strategy: CountStrategy) -> FrequencyReport {
        pipeline::run(params.date, &params.window, self.tables(), strategy)
    }

    pub fn stop_index(&self) -> HashMap<&str, &Stop> {
        self.stops.iter().map(|s| (s.stop_id.as_str(), s)).collect()
    }
}

fn read_required<T: DeserializeOwned>(
    tables: &mut dyn TableSource,
    name: &'static str,
) -> Result<Vec<T>> {
    read_table(tables, name)?.ok_or_else(|| FrequencyError::MissingTable(name).into())
}

fn read_table<T: DeserializeOwned>(
    tables: &mut dyn TableSource,
    name: &'static str,
) -> Result<Option<Vec<T>>> {
    let Some(reader) = tables.open(name)? else {
        return Ok(None);
    };

    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: T = result.with_context(|| format!("Failed to parse {name}"))?;
        rows.push(record);
    }
    debug!(table = name, rows = rows.len(), "Table read");
    Ok(Some(rows))
}
