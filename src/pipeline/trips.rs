use std::collections::HashSet;

use tracing::debug;

use crate::model::Trip;

/// Ids of the trips whose service is active.
#[tracing::instrument(skip_all, fields(trips = trips.len(), active_services = active_services.len()))]
pub fn select_trips<'a>(trips: &'a [Trip], active_services: &HashSet<&str>) -> HashSet<&'a str> {
    let selected: HashSet<&str> = trips
        .iter()
        .filter(|trip| active_services.contains(trip.service_id.as_str()))
        .map(|trip| trip.trip_id.as_str())
        .collect();
    debug!(selected = selected.len(), "Selected trips");
    selected
}
