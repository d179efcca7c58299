#![forbid(unsafe_code)]

use thiserror::Error;

/// Fragment tracking errors.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Invalid fragment interval: {0}")]
    InvalidInterval(#[from] syrinx_timeline::TimelineError),
}

pub type TrackerResult<T> = Result<T, TrackerError>;
