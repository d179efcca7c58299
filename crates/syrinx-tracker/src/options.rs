#![forbid(unsafe_code)]

/// Configuration for the fragment tracker.
#[derive(Clone, Debug)]
pub struct TrackerOptions {
    /// Tolerance in seconds, applied when deciding that a stream is fully
    /// covered and when comparing newly computed coverage against the
    /// previously validated coverage for eviction detection. Absorbs
    /// floating-point and container timestamp rounding.
    pub coverage_tolerance: f64,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            coverage_tolerance: 0.02,
        }
    }
}

impl TrackerOptions {
    /// Set the coverage/eviction tolerance in seconds.
    pub fn with_coverage_tolerance(mut self, tolerance: f64) -> Self {
        self.coverage_tolerance = tolerance;
        self
    }
}
