//! Resolves which services run on a date.

use std::collections::HashSet;

use tracing::debug;

use crate::model::{ExceptionKind, ServiceDateException, WeeklyServicePattern};
use crate::time::ServiceDate;

/// Returns the ids of every service active on `date`.
///
/// The result is `(added ∪ recurring) \ removed`: a REMOVE exception for the
/// date wins over both a matching weekly pattern and an ADD exception. Either
/// table may be absent; with neither, no service is active.
#[tracing::instrument(skip_all, fields(date = %date, weekday = date.weekday_name()))]
pub fn resolve_active_services<'a>(
    date: ServiceDate,
    weekly_patterns: Option<&'a [WeeklyServicePattern]>,
    exceptions: Option<&'a [ServiceDateException]>,
) -> HashSet<&'a str> {
    let mut added = HashSet::new();
    let mut removed = HashSet::new();
    for exception in exceptions.unwrap_or_default() {
        if exception.date != date {
            continue;
        }
        match exception.kind {
            ExceptionKind::Added => added.insert(exception.service_id.as_str()),
            ExceptionKind::Removed => removed.insert(exception.service_id.as_str()),
        };
    }

    let mut active = added;
    if let Some(patterns) = weekly_patterns {
        active.extend(
            patterns
                .iter()
                .filter(|p| p.runs_on(&date))
                .map(|p| p.service_id.as_str()),
        );
    } else {
        debug!("No weekly patterns, resolving from exceptions only");
    }

    active.retain(|service_id| !removed.contains(service_id));

    debug!(
        active = active.len(),
        removed = removed.len(),
        "Resolved active services"
    );
    active
}
