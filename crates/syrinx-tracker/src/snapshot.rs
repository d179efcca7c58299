#![forbid(unsafe_code)]

//! Buffer snapshots delivered with `BufferAppended` notifications.

use syrinx_timeline::TimeRangeList;

use crate::fragment::StreamKind;

/// Per-stream-kind slots.
///
/// Used both for buffer snapshots (`StreamMap<TimeRangeList>`) and for
/// the coverage a tracked entry last validated (`StreamMap<TimeRange>`).
#[derive(Debug, Clone)]
pub struct StreamMap<T> {
    audio: Option<T>,
    video: Option<T>,
}

impl<T> StreamMap<T> {
    pub fn new() -> Self {
        Self {
            audio: None,
            video: None,
        }
    }

    pub fn get(&self, kind: StreamKind) -> Option<&T> {
        match kind {
            StreamKind::Audio => self.audio.as_ref(),
            StreamKind::Video => self.video.as_ref(),
        }
    }

    pub fn set(&mut self, kind: StreamKind, value: T) {
        match kind {
            StreamKind::Audio => self.audio = Some(value),
            StreamKind::Video => self.video = Some(value),
        }
    }

    pub fn take(&mut self, kind: StreamKind) -> Option<T> {
        match kind {
            StreamKind::Audio => self.audio.take(),
            StreamKind::Video => self.video.take(),
        }
    }

    pub fn clear(&mut self, kind: StreamKind) {
        let _ = self.take(kind);
    }

    /// Kinds that currently hold a value.
    pub fn kinds(&self) -> impl Iterator<Item = StreamKind> + '_ {
        StreamKind::ALL.into_iter().filter(|kind| self.get(*kind).is_some())
    }
}

impl<T> Default for StreamMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of per-stream buffered ranges at one point in time.
///
/// Each notification carries a fresh, independently owned snapshot of
/// what the sink retains; the tracker keeps its own copy so a later
/// single-fragment finalize can be evaluated without a new snapshot.
pub type BufferSnapshot = StreamMap<TimeRangeList>;

impl BufferSnapshot {
    /// Attach a normalized range list for one stream kind, builder style.
    pub fn with<I>(mut self, kind: StreamKind, pairs: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        self.set(kind, TimeRangeList::from_pairs(pairs));
        self
    }

    /// Snapshot reporting the same ranges for both audio and video.
    pub fn both<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)> + Clone,
    {
        Self::new()
            .with(StreamKind::Audio, pairs.clone())
            .with(StreamKind::Video, pairs)
    }
}
