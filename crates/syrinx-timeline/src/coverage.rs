#![forbid(unsafe_code)]

//! Coverage evaluation: how much of a fragment's time window a buffered
//! range list actually retains.

use crate::range::{TimeRange, TimeRangeList};

/// Classification of one stream's coverage of a fragment window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageClass {
    /// The union of overlaps covers the window to within tolerance.
    Full,
    /// Non-empty overlap short of full coverage.
    Partial,
    /// No overlap at all.
    Empty,
}

/// Measured overlap between one buffered range list and a fragment window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamCoverage {
    /// Hull of the covered region, `None` when nothing overlaps.
    pub span: Option<TimeRange>,
    /// Measured length of the union of overlaps, in seconds.
    pub covered: f64,
}

impl StreamCoverage {
    /// Coverage of a stream the sink retains no data for.
    pub fn empty() -> Self {
        Self {
            span: None,
            covered: 0.0,
        }
    }

    /// Classify this coverage against the window it was measured for.
    pub fn classify(&self, window: &TimeRange, tolerance: f64) -> CoverageClass {
        if self.span.is_none() || self.covered <= 0.0 {
            CoverageClass::Empty
        } else if self.covered + tolerance >= window.duration() {
            CoverageClass::Full
        } else {
            CoverageClass::Partial
        }
    }
}

impl TimeRangeList {
    /// Overlap between this list and `window`.
    ///
    /// The list is normalized (ascending, non-overlapping), so the
    /// measured length is the plain sum of the per-range intersections
    /// and the result does not depend on the order the sink reported
    /// ranges in.
    pub fn coverage_within(&self, window: &TimeRange) -> StreamCoverage {
        let mut covered = 0.0;
        let mut span: Option<TimeRange> = None;
        for range in self.iter() {
            let Some(overlap) = range.intersect(window) else {
                continue;
            };
            covered += overlap.duration();
            span = Some(match span {
                Some(hull) => hull.hull(&overlap),
                None => overlap,
            });
        }
        StreamCoverage { span, covered }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn window() -> TimeRange {
        TimeRange::new(0.0, 1.0).unwrap()
    }

    // CV-1: Full coverage, exact and oversized

    #[rstest]
    #[case(vec![(0.0, 1.0)])]
    #[case(vec![(-1.0, 2.0)])]
    #[case(vec![(0.0, 0.5), (0.5, 1.0)])]
    fn test_full_coverage(#[case] pairs: Vec<(f64, f64)>) {
        let list = TimeRangeList::from_pairs(pairs);
        let coverage = list.coverage_within(&window());
        assert_eq!(coverage.classify(&window(), 0.02), CoverageClass::Full);

        let span = coverage.span.unwrap();
        assert_eq!(span.start(), 0.0);
        assert_eq!(span.end(), 1.0);
    }

    // CV-2: Partial coverage

    #[rstest]
    #[case(vec![(0.0, 0.5)], 0.5)]
    #[case(vec![(0.5, 2.0)], 0.5)]
    #[case(vec![(0.2, 0.4), (0.6, 0.8)], 0.4)]
    fn test_partial_coverage(#[case] pairs: Vec<(f64, f64)>, #[case] expected: f64) {
        let list = TimeRangeList::from_pairs(pairs);
        let coverage = list.coverage_within(&window());
        assert!((coverage.covered - expected).abs() < 1e-9);
        assert_eq!(coverage.classify(&window(), 0.02), CoverageClass::Partial);
    }

    // CV-3: No overlap

    #[rstest]
    #[case(vec![])]
    #[case(vec![(2.0, 3.0)])]
    #[case(vec![(1.0, 2.0)])]
    fn test_empty_coverage(#[case] pairs: Vec<(f64, f64)>) {
        let list = TimeRangeList::from_pairs(pairs);
        let coverage = list.coverage_within(&window());
        assert!(coverage.span.is_none());
        assert_eq!(coverage.classify(&window(), 0.02), CoverageClass::Empty);
    }

    // CV-4: Tolerance absorbs rounding shortfall

    #[test]
    fn test_tolerance_absorbs_shortfall() {
        let list = TimeRangeList::from_pairs([(0.01, 1.0)]);
        let coverage = list.coverage_within(&window());

        // 0.99 covered of a 1.0 window: full at eps 0.02, partial at eps 0.001.
        assert_eq!(coverage.classify(&window(), 0.02), CoverageClass::Full);
        assert_eq!(coverage.classify(&window(), 0.001), CoverageClass::Partial);
    }

    // CV-5: Order independence over the reported ranges

    #[test]
    fn test_order_independent() {
        let forward = TimeRangeList::from_pairs([(0.0, 0.3), (0.5, 0.8)]);
        let backward = TimeRangeList::from_pairs([(0.5, 0.8), (0.0, 0.3)]);
        assert_eq!(
            forward.coverage_within(&window()),
            backward.coverage_within(&window())
        );
    }

    // CV-6: Span is the hull of disjoint overlaps

    #[test]
    fn test_span_hull() {
        let list = TimeRangeList::from_pairs([(0.1, 0.2), (0.7, 0.9)]);
        let coverage = list.coverage_within(&window());
        let span = coverage.span.unwrap();
        assert_eq!(span.start(), 0.1);
        assert_eq!(span.end(), 0.9);
        assert!((coverage.covered - 0.3).abs() < 1e-9);
    }
}
