#![forbid(unsafe_code)]

//! Presentation-time interval math.
//!
//! Building blocks for reasoning about what a media sink retains on the
//! presentation timeline: validated `[start, end)` ranges, normalized
//! buffered-range lists, and the pure coverage evaluator used to decide
//! whether a fragment's time window is fully, partially, or not at all
//! backed by buffered data.

mod coverage;
mod error;
mod range;

pub use coverage::{CoverageClass, StreamCoverage};
pub use error::{TimelineError, TimelineResult};
pub use range::{TimeRange, TimeRangeList};
