#![forbid(unsafe_code)]

//! Tracking store: reconciles load completion with sink buffer state.

use std::{collections::HashMap, sync::Arc};

use syrinx_timeline::{CoverageClass, StreamCoverage, TimeRange};
use tracing::debug;

use crate::{
    fragment::{Fragment, FragmentKey, StreamKind, TrackGroup},
    options::TrackerOptions,
    snapshot::{BufferSnapshot, StreamMap},
};

/// Tracking state of one fragment identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentState {
    /// Never seen, or removed (superseded or evicted).
    NotLoaded,
    /// Load completed; no buffer evaluation has classified it yet.
    Appending,
    /// Every required stream fully covered at the last evaluation.
    Ok,
    /// At least one required stream short of full coverage.
    Partial,
}

/// One tracked entry: a loaded fragment plus its last validated coverage.
#[derive(Debug, Clone)]
struct TrackedEntry {
    fragment: Arc<Fragment>,
    /// Whether a buffer evaluation has classified this entry at least
    /// once since its load completed.
    finalized: bool,
    state: FragmentState,
    /// Per-required-stream coverage span recorded at the most recent
    /// successful evaluation. Regression of these spans is the eviction
    /// signal.
    recorded: StreamMap<TimeRange>,
}

impl TrackedEntry {
    fn new(fragment: Arc<Fragment>) -> Self {
        Self {
            fragment,
            finalized: false,
            state: FragmentState::Appending,
            recorded: StreamMap::new(),
        }
    }
}

/// Reconciles the fragments a downloader has finished loading with the
/// time intervals a downstream media sink actually retains.
///
/// Mutations happen only through the notification handlers; queries are
/// read-only and safe at any time, including on an empty store.
/// Single-threaded by design: `&mut self` on every notification makes
/// the cooperative event-driven model explicit, so no locking is needed.
///
/// An entry exists in the store iff its fragment is currently considered
/// loaded-or-better; removing the entry is the sole mechanism for
/// reverting a fragment to [`FragmentState::NotLoaded`].
pub struct FragmentTracker {
    entries: HashMap<FragmentKey, TrackedEntry>,
    /// Last buffered-range snapshot per stream kind, copied out of the
    /// most recent `buffer_appended` notification. `fragment_buffered`
    /// evaluates against this copy.
    ranges: BufferSnapshot,
    options: TrackerOptions,
}

impl FragmentTracker {
    pub fn new(options: TrackerOptions) -> Self {
        Self {
            entries: HashMap::new(),
            ranges: BufferSnapshot::new(),
            options,
        }
    }

    // ---- inbound notifications ----

    /// Load completed: begin tracking `fragment` as [`FragmentState::Appending`].
    ///
    /// A load at an identity that is already tracked restarts tracking.
    pub fn fragment_loaded(&mut self, fragment: Arc<Fragment>) {
        let key = fragment.key();
        debug!(
            sn = key.sn,
            level = key.level,
            group = ?key.track_group,
            "fragment_tracker::track"
        );
        self.entries.insert(key, TrackedEntry::new(fragment));
    }

    /// The sink reported its current buffered ranges for one or more
    /// stream kinds.
    ///
    /// Every tracked entry requiring at least one of the reported kinds
    /// is re-evaluated; a snapshot naming only kinds no entry consumes is
    /// a no-op.
    pub fn buffer_appended(&mut self, mut snapshot: BufferSnapshot) {
        let mutated: Vec<StreamKind> = snapshot.kinds().collect();
        if mutated.is_empty() {
            return;
        }
        for &kind in &mutated {
            if let Some(list) = snapshot.take(kind) {
                self.ranges.set(kind, list);
            }
        }
        debug!(kinds = ?mutated, "fragment_tracker::buffer_appended");

        let affected: Vec<FragmentKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| {
                mutated
                    .iter()
                    .any(|kind| entry.fragment.streams().contains(*kind))
            })
            .map(|(key, _)| *key)
            .collect();
        for key in affected {
            self.evaluate(key);
        }
    }

    /// Explicit finalize signal tied to one fragment.
    ///
    /// Classifies the named fragment against the retained snapshot
    /// immediately instead of waiting for the next generic
    /// `buffer_appended`. Unknown fragments are a no-op.
    pub fn fragment_buffered(&mut self, fragment: &Fragment) {
        self.evaluate(fragment.key());
    }

    /// The sink dropped its entire buffer; nothing tracked survives and
    /// the retained snapshot is forgotten.
    pub fn buffer_flushed(&mut self) {
        debug!(removed = self.entries.len(), "fragment_tracker::flush");
        self.entries.clear();
        self.ranges = BufferSnapshot::new();
    }

    // ---- explicit store management ----

    /// Stop tracking `fragment`; its state reverts to
    /// [`FragmentState::NotLoaded`].
    pub fn remove_fragment(&mut self, fragment: &Fragment) {
        if self.entries.remove(&fragment.key()).is_some() {
            debug!(sn = fragment.sn(), "fragment_tracker::remove");
        }
    }

    /// Drop every tracked entry. The retained buffer snapshot is kept:
    /// the sink did not report anything changed.
    pub fn remove_all(&mut self) {
        debug!(removed = self.entries.len(), "fragment_tracker::remove_all");
        self.entries.clear();
    }

    pub fn has_fragment(&self, fragment: &Fragment) -> bool {
        self.entries.contains_key(&fragment.key())
    }

    pub fn tracked_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ---- query surface ----

    /// Tracking state of the fragment identity; absence is
    /// [`FragmentState::NotLoaded`], never an error.
    pub fn state(&self, fragment: &Fragment) -> FragmentState {
        self.entries
            .get(&fragment.key())
            .map_or(FragmentState::NotLoaded, |entry| entry.state)
    }

    /// The buffered fragment whose interval contains `position` on the
    /// given track group's timeline.
    ///
    /// Only finalized entries qualify; `Appending` fragments are
    /// invisible here. When `position` sits exactly on the boundary
    /// between two adjacent fragments the later one wins, unless the
    /// later one is the rightmost tracked fragment: at the trailing edge
    /// of buffered data there is nothing to enter yet. The rendition
    /// level is ignored (fragments are matched by track group only).
    pub fn buffered_fragment_at(
        &self,
        position: f64,
        group: TrackGroup,
    ) -> Option<Arc<Fragment>> {
        let mut candidates: Vec<&TrackedEntry> = self
            .entries
            .values()
            .filter(|entry| entry.finalized && entry.fragment.track_group() == group)
            .collect();
        candidates.sort_by(|a, b| a.fragment.start_pts().total_cmp(&b.fragment.start_pts()));

        let matches: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.fragment.range().contains(position))
            .map(|(index, _)| index)
            .collect();

        let &last = matches.last()?;
        if matches.len() > 1 && last == candidates.len() - 1 {
            // Boundary tie at the trailing edge: stay in the predecessor.
            let prev = matches[matches.len() - 2];
            return Some(Arc::clone(&candidates[prev].fragment));
        }
        Some(Arc::clone(&candidates[last].fragment))
    }

    /// The first incompletely buffered `Main`-group fragment whose
    /// nominal closed interval contains `position`.
    ///
    /// Matches `Partial` and `Appending` entries alike: both mark a
    /// region upstream logic may need to re-request.
    pub fn partial_fragment_at(&self, position: f64) -> Option<Arc<Fragment>> {
        let mut candidates: Vec<&TrackedEntry> = self
            .entries
            .values()
            .filter(|entry| {
                entry.state != FragmentState::Ok
                    && entry.fragment.track_group() == TrackGroup::Main
                    && entry.fragment.range().contains(position)
            })
            .collect();
        candidates.sort_by(|a, b| a.fragment.start_pts().total_cmp(&b.fragment.start_pts()));
        candidates
            .first()
            .map(|entry| Arc::clone(&entry.fragment))
    }

    // ---- evaluation ----

    /// Run the coverage evaluator for one entry against the retained
    /// snapshot, applying the finalize / eviction transitions.
    fn evaluate(&mut self, key: FragmentKey) {
        let eps = self.options.coverage_tolerance;

        let (window, kinds, finalized, recorded) = match self.entries.get(&key) {
            Some(entry) => (
                *entry.fragment.range(),
                entry.fragment.streams().kinds().collect::<Vec<_>>(),
                entry.finalized,
                entry.recorded.clone(),
            ),
            None => return,
        };

        let mut coverages: Vec<(StreamKind, StreamCoverage)> = Vec::with_capacity(kinds.len());
        for kind in kinds {
            let coverage = self
                .ranges
                .get(kind)
                .map(|list| list.coverage_within(&window))
                .unwrap_or_else(StreamCoverage::empty);
            coverages.push((kind, coverage));
        }

        if finalized && coverage_regressed(&recorded, &coverages, eps) {
            debug!(
                sn = key.sn,
                level = key.level,
                group = ?key.track_group,
                "fragment_tracker::evict"
            );
            self.entries.remove(&key);
            return;
        }

        let state = match aggregate_class(&coverages, &window, eps) {
            CoverageClass::Full => FragmentState::Ok,
            CoverageClass::Partial => FragmentState::Partial,
            // No coverage on any required stream: an unfinalized entry
            // stays `Appending` (distinct from "not yet evaluated" only
            // in that we tried); a finalized one was caught above as a
            // total regression.
            CoverageClass::Empty => return,
        };

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.finalized = true;
            entry.state = state;
            for (kind, coverage) in coverages {
                match coverage.span {
                    Some(span) => entry.recorded.set(kind, span),
                    None => entry.recorded.clear(kind),
                }
            }
            debug!(
                sn = key.sn,
                level = key.level,
                group = ?key.track_group,
                state = ?entry.state,
                "fragment_tracker::classify"
            );
        }
    }
}

impl Default for FragmentTracker {
    fn default() -> Self {
        Self::new(TrackerOptions::default())
    }
}

/// Aggregate per-stream classifications into a fragment-level one: all
/// full means fully usable, all empty means no coverage, and the worst
/// stream otherwise caps the fragment at partially usable (a player
/// cannot present a frame without all required tracks).
fn aggregate_class(
    coverages: &[(StreamKind, StreamCoverage)],
    window: &TimeRange,
    tolerance: f64,
) -> CoverageClass {
    let mut all_full = true;
    let mut all_empty = true;
    for (_, coverage) in coverages {
        match coverage.classify(window, tolerance) {
            CoverageClass::Full => all_empty = false,
            CoverageClass::Partial => {
                all_full = false;
                all_empty = false;
            }
            CoverageClass::Empty => all_full = false,
        }
    }
    if all_full {
        CoverageClass::Full
    } else if all_empty {
        CoverageClass::Empty
    } else {
        CoverageClass::Partial
    }
}

/// Whether newly computed coverage regressed past what was previously
/// validated: the sink trimmed data this entry had already seen. A
/// previously validated stream whose coverage vanished entirely counts.
fn coverage_regressed(
    recorded: &StreamMap<TimeRange>,
    coverages: &[(StreamKind, StreamCoverage)],
    tolerance: f64,
) -> bool {
    for (kind, coverage) in coverages {
        let Some(prev) = recorded.get(*kind) else {
            continue;
        };
        match coverage.span {
            None => return true,
            Some(span) => {
                if span.start() > prev.start() + tolerance
                    || span.end() < prev.end() - tolerance
                {
                    return true;
                }
            }
        }
    }
    false
}
