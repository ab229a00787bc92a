//! Scheduled trips per hour at every stop of a static transit feed, for one
//! service date and time-of-day window.

pub mod config;
pub mod error;
pub mod feed;
pub mod logging;
pub mod model;
pub mod output;
pub mod params;
pub mod pipeline;
pub mod render;
pub mod stats;
pub mod time;

pub use error::FrequencyError;
pub use pipeline::compute_frequencies;
