#![forbid(unsafe_code)]

use thiserror::Error;

/// Interval construction errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimelineError {
    #[error("Empty range: [{start}, {end}) has no duration")]
    EmptyRange { start: f64, end: f64 },

    #[error("Non-finite endpoint: [{start}, {end})")]
    NonFinite { start: f64, end: f64 },
}

pub type TimelineResult<T> = Result<T, TimelineError>;
