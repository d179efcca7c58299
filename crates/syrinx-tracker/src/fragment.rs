#![forbid(unsafe_code)]

//! Fragment records: immutable descriptions of requested media segments.

use syrinx_timeline::TimeRange;

use crate::error::TrackerResult;

// StreamKind / StreamSet

/// One decodable elementary stream a fragment may contribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Audio,
    Video,
}

impl StreamKind {
    /// All stream kinds, in a fixed order.
    pub const ALL: [StreamKind; 2] = [StreamKind::Audio, StreamKind::Video];
}

/// Set of elementary streams a fragment contributes.
///
/// Fixed at fragment creation; evaluation never probes the fragment for
/// "has audio / has video" after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSet {
    audio: bool,
    video: bool,
}

impl StreamSet {
    pub fn audio_video() -> Self {
        Self {
            audio: true,
            video: true,
        }
    }

    pub fn audio_only() -> Self {
        Self {
            audio: true,
            video: false,
        }
    }

    pub fn video_only() -> Self {
        Self {
            audio: false,
            video: true,
        }
    }

    pub fn contains(&self, kind: StreamKind) -> bool {
        match kind {
            StreamKind::Audio => self.audio,
            StreamKind::Video => self.video,
        }
    }

    /// Iterate over the kinds present in this set.
    pub fn kinds(&self) -> impl Iterator<Item = StreamKind> + '_ {
        StreamKind::ALL.into_iter().filter(|kind| self.contains(*kind))
    }
}

// TrackGroup

/// Logical timeline a fragment belongs to for seek/playback purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackGroup {
    /// Primary audio+video timeline.
    Main,
    /// Dedicated audio rendition timeline.
    Audio,
    /// Alternate audio (commentary, another language).
    AltAudio,
}

// Fragment

/// Immutable description of one requested media segment.
///
/// Created by the loader and shared with the tracker by reference
/// (`Arc`); the tracker never copies or mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    sn: u64,
    level: usize,
    track_group: TrackGroup,
    range: TimeRange,
    streams: StreamSet,
}

impl Fragment {
    /// Create a fragment record. `end_pts` must exceed `start_pts`.
    pub fn new(
        sn: u64,
        level: usize,
        track_group: TrackGroup,
        start_pts: f64,
        end_pts: f64,
        streams: StreamSet,
    ) -> TrackerResult<Self> {
        let range = TimeRange::new(start_pts, end_pts)?;
        Ok(Self {
            sn,
            level,
            track_group,
            range,
            streams,
        })
    }

    /// Sequence number within the track group's timeline.
    pub fn sn(&self) -> u64 {
        self.sn
    }

    /// Rendition/level index the fragment was loaded from.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn track_group(&self) -> TrackGroup {
        self.track_group
    }

    /// Nominal presentation interval `[start_pts, end_pts)`.
    pub fn range(&self) -> &TimeRange {
        &self.range
    }

    pub fn start_pts(&self) -> f64 {
        self.range.start()
    }

    pub fn end_pts(&self) -> f64 {
        self.range.end()
    }

    /// Elementary streams this fragment contributes.
    pub fn streams(&self) -> &StreamSet {
        &self.streams
    }

    /// Identity triple: one tracked entry exists per key.
    pub fn key(&self) -> FragmentKey {
        FragmentKey {
            track_group: self.track_group,
            sn: self.sn,
            level: self.level,
        }
    }
}

/// Identity of a fragment within the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FragmentKey {
    pub track_group: TrackGroup,
    pub sn: u64,
    pub level: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;

    // FR-1: Construction validates the interval

    #[test]
    fn test_invalid_interval_rejected() {
        let result = Fragment::new(1, 0, TrackGroup::Main, 2.0, 1.0, StreamSet::audio_video());
        assert!(matches!(result, Err(TrackerError::InvalidInterval(_))));
    }

    // FR-2: Identity is (group, sn, level)

    #[test]
    fn test_key_identity() {
        let a = Fragment::new(1, 0, TrackGroup::Main, 0.0, 1.0, StreamSet::audio_video()).unwrap();
        let b = Fragment::new(1, 0, TrackGroup::Main, 5.0, 6.0, StreamSet::audio_only()).unwrap();
        let c = Fragment::new(1, 1, TrackGroup::Main, 0.0, 1.0, StreamSet::audio_video()).unwrap();
        let d = Fragment::new(1, 0, TrackGroup::Audio, 0.0, 1.0, StreamSet::audio_video()).unwrap();

        // Same identity even when attributes differ.
        assert_eq!(a.key(), b.key());
        // Level and track group are part of the identity.
        assert_ne!(a.key(), c.key());
        assert_ne!(a.key(), d.key());
    }

    // FR-3: Stream sets

    #[test]
    fn test_stream_set_kinds() {
        let both: Vec<_> = StreamSet::audio_video().kinds().collect();
        assert_eq!(both, vec![StreamKind::Audio, StreamKind::Video]);

        let audio: Vec<_> = StreamSet::audio_only().kinds().collect();
        assert_eq!(audio, vec![StreamKind::Audio]);

        assert!(StreamSet::video_only().contains(StreamKind::Video));
        assert!(!StreamSet::video_only().contains(StreamKind::Audio));
    }
}
