#![forbid(unsafe_code)]

//! Time ranges and buffered-range lists.

use tracing::warn;

use crate::error::{TimelineError, TimelineResult};

// TimeRange

/// A `[start, end)` interval on the presentation timeline, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    start: f64,
    end: f64,
}

impl TimeRange {
    /// Create a range. `end` must be strictly greater than `start`.
    pub fn new(start: f64, end: f64) -> TimelineResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(TimelineError::NonFinite { start, end });
        }
        if end <= start {
            return Err(TimelineError::EmptyRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Length of the range in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `position` falls within the closed interval `[start, end]`.
    ///
    /// Fragment-level queries use closed bounds: a position exactly at a
    /// fragment's end still belongs to it.
    pub fn contains(&self, position: f64) -> bool {
        position >= self.start && position <= self.end
    }

    /// Overlap with `other`, or `None` when the two do not intersect.
    pub fn intersect(&self, other: &TimeRange) -> Option<TimeRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (end > start).then_some(TimeRange { start, end })
    }

    /// Smallest range containing both `self` and `other`.
    pub fn hull(&self, other: &TimeRange) -> TimeRange {
        TimeRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

// TimeRangeList

/// Ordered, non-overlapping, ascending list of buffered ranges.
///
/// One list describes what a downstream sink currently retains for a
/// single elementary stream. Lists arrive as wholesale snapshots, never
/// as diffs. The constructor repairs unsorted or overlapping input
/// instead of failing: a transient buffer inconsistency must at worst
/// under-report coverage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeRangeList {
    ranges: Vec<TimeRange>,
}

impl TimeRangeList {
    /// Empty list: the sink retains nothing.
    pub fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Build a normalized list from raw `(start, end)` pairs.
    ///
    /// Pairs with inverted or non-finite endpoints are dropped, the rest
    /// are sorted and merged so the result is ascending and
    /// non-overlapping.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut dropped = 0usize;
        let mut ranges: Vec<TimeRange> = Vec::new();
        for (start, end) in pairs {
            match TimeRange::new(start, end) {
                Ok(range) => ranges.push(range),
                Err(_) => dropped += 1,
            }
        }
        if dropped > 0 {
            warn!(dropped, "time_range_list: dropped invalid ranges");
        }

        if ranges.windows(2).any(|w| w[1].start < w[0].start) {
            warn!("time_range_list: unsorted input, repairing");
        }
        ranges.sort_by(|a, b| a.start.total_cmp(&b.start));

        let mut merged: Vec<TimeRange> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match merged.last_mut() {
                Some(last) if range.start <= last.end => {
                    if range.end > last.end {
                        last.end = range.end;
                    }
                }
                _ => merged.push(range),
            }
        }
        Self { ranges: merged }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeRange> {
        self.ranges.iter()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Summed length of all ranges in seconds.
    pub fn total_duration(&self) -> f64 {
        self.ranges.iter().map(TimeRange::duration).sum()
    }
}
