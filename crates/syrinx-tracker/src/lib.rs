#![forbid(unsafe_code)]

//! Buffered-media-fragment tracking engine.
//!
//! Reconciles two independent sources of truth — the fragments a
//! downloader has finished loading, and the time intervals a downstream
//! media sink actually retains after those fragments were appended — and
//! answers which fragments are usable, partially usable, or no longer
//! present.
//!
//! The tracker is driven by discrete notifications
//! ([`FragmentTracker::fragment_loaded`],
//! [`FragmentTracker::buffer_appended`],
//! [`FragmentTracker::fragment_buffered`],
//! [`FragmentTracker::buffer_flushed`]) and read through side-effect-free
//! queries. It never calls back into its collaborators and assumes no
//! particular event dispatch mechanism; callers with event-bus wiring can
//! forward [`TrackerEvent`] values via [`FragmentTracker::handle`].

mod error;
mod events;
mod fragment;
mod options;
mod snapshot;
mod tracker;

pub use error::{TrackerError, TrackerResult};
pub use events::TrackerEvent;
pub use fragment::{Fragment, FragmentKey, StreamKind, StreamSet, TrackGroup};
pub use options::TrackerOptions;
pub use snapshot::{BufferSnapshot, StreamMap};
pub use tracker::{FragmentState, FragmentTracker};

// Timeline types that appear in this crate's public API.
pub use syrinx_timeline::{CoverageClass, StreamCoverage, TimeRange, TimeRangeList, TimelineError};
