//! Run parameters and the ways of obtaining them.
//!
//! [`ParameterProvider`] is implemented by [`ArgsProvider`] (command-line
//! values) and [`InteractiveProvider`] (prompts). Both validate through the
//! same parsers, so bad input is rejected before any feed table is read.

mod args;
mod interactive;

pub use args::ArgsProvider;
pub use interactive::InteractiveProvider;

use crate::error::FrequencyError;
use crate::time::{ServiceDate, VisitWindow};

/// Validated inputs of one computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParameters {
    pub date: ServiceDate,
    pub window: VisitWindow,
}

impl RunParameters {
    pub fn parse(date: &str, start: &str, end: &str) -> Result<Self, FrequencyError> {
        Ok(Self {
            date: ServiceDate::parse(date)?,
            window: VisitWindow::parse(start, end)?,
        })
    }
}

/// Source of [`RunParameters`].
pub trait ParameterProvider {
    fn parameters(&mut self) -> Result<RunParameters, FrequencyError>;
}
