//! Error taxonomy for a frequency computation run.

use crate::time::TimeOfDay;

/// Fatal errors raised before or while assembling the inputs of a run.
///
/// Absent calendar tables are not errors; they are modelled as `None` and the
/// calendar resolver degrades to an empty or exception-only service set.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FrequencyError {
    #[error("invalid time '{0}', expected HH:MM:SS")]
    InvalidTime(String),
    #[error("invalid date '{0}', expected YYYY-MM-DD or YYYYMMDD")]
    InvalidDate(String),
    #[error("window end {end} must be after window start {start}")]
    EmptyWindow { start: TimeOfDay, end: TimeOfDay },
    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),
    #[error("feed is missing required table {0}")]
    MissingTable(&'static str),
}

impl FrequencyError {
    /// True for errors caused by user-supplied parameters rather than the feed.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, FrequencyError::MissingTable(_))
    }
}
