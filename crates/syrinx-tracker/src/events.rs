#![forbid(unsafe_code)]

//! Notifications consumed by the tracker.

use std::sync::Arc;

use crate::{fragment::Fragment, snapshot::BufferSnapshot, tracker::FragmentTracker};

/// Inbound notifications from the loader and the media sink.
///
/// The tracker exposes a direct method for each of these; the enum
/// exists so callers with their own event wiring can forward
/// notifications wholesale through [`FragmentTracker::handle`] without
/// this crate assuming any dispatch mechanism.
#[derive(Clone, Debug)]
pub enum TrackerEvent {
    /// A fragment finished loading; begin tracking it.
    FragmentLoaded { fragment: Arc<Fragment> },
    /// The sink reported its current buffered ranges per stream kind.
    BufferAppended { snapshot: BufferSnapshot },
    /// Explicit finalize signal for one fragment.
    FragmentBuffered { fragment: Arc<Fragment> },
    /// The sink dropped everything it had buffered.
    BufferFlushed,
}

impl FragmentTracker {
    /// Dispatch one notification to the matching handler.
    pub fn handle(&mut self, event: TrackerEvent) {
        match event {
            TrackerEvent::FragmentLoaded { fragment } => self.fragment_loaded(fragment),
            TrackerEvent::BufferAppended { snapshot } => self.buffer_appended(snapshot),
            TrackerEvent::FragmentBuffered { fragment } => self.fragment_buffered(&fragment),
            TrackerEvent::BufferFlushed => self.buffer_flushed(),
        }
    }
}
