//! Sleep-accuracy statistics.
//!
//! Provides a ring buffer-based histogram for tracking how far each sleep
//! overshoots its requested duration, without heap allocations while
//! sampling.

use std::time::Duration;

/// Sleep overshoot statistics with a ring buffer for percentile tracking.
#[derive(Debug)]
pub struct SleepStats {
    /// Ring buffer of overshoot values in nanoseconds.
    samples: Box<[u64]>,
    /// Current write position in the ring buffer.
    write_pos: usize,
    /// Number of samples retained (saturates at buffer size).
    sample_count: usize,
    /// Total sleeps recorded.
    total_sleeps: u64,
    /// Minimum observed overshoot in nanoseconds.
    min_ns: u64,
    /// Maximum observed overshoot in nanoseconds.
    max_ns: u64,
    /// Sum of all overshoots for mean calculation.
    sum_ns: u64,
    /// Number of sleeps that returned before their requested duration.
    early_return_count: u64,
}

impl SleepStats {
    /// Create a new collector retaining up to `histogram_size` samples.
    #[must_use]
    pub fn new(histogram_size: usize) -> Self {
        let size = histogram_size.max(1);
        Self {
            samples: vec![0u64; size].into_boxed_slice(),
            write_pos: 0,
            sample_count: 0,
            total_sleeps: 0,
            min_ns: u64::MAX,
            max_ns: 0,
            sum_ns: 0,
            early_return_count: 0,
        }
    }

    /// Record one sleep: the duration that was requested and the duration
    /// that actually elapsed.
    ///
    /// An actual duration below the requested one counts as an early
    /// return and contributes a zero overshoot sample.
    pub fn record(&mut self, requested: Duration, actual: Duration) {
        if actual < requested {
            self.early_return_count += 1;
        }
        let overshoot_ns = actual.saturating_sub(requested).as_nanos() as u64;

        self.samples[self.write_pos] = overshoot_ns;
        self.write_pos = (self.write_pos + 1) % self.samples.len();
        self.sample_count = self.sample_count.saturating_add(1).min(self.samples.len());

        self.total_sleeps += 1;
        self.min_ns = self.min_ns.min(overshoot_ns);
        self.max_ns = self.max_ns.max(overshoot_ns);
        self.sum_ns = self.sum_ns.wrapping_add(overshoot_ns);
    }

    /// Get total number of sleeps recorded.
    #[must_use]
    pub fn total_sleeps(&self) -> u64 {
        self.total_sleeps
    }

    /// Get number of sleeps that returned early.
    #[must_use]
    pub fn early_return_count(&self) -> u64 {
        self.early_return_count
    }

    /// Get minimum observed overshoot.
    #[must_use]
    pub fn min(&self) -> Option<Duration> {
        if self.total_sleeps > 0 {
            Some(Duration::from_nanos(self.min_ns))
        } else {
            None
        }
    }

    /// Get maximum observed overshoot.
    #[must_use]
    pub fn max(&self) -> Option<Duration> {
        if self.total_sleeps > 0 {
            Some(Duration::from_nanos(self.max_ns))
        } else {
            None
        }
    }

    /// Get mean overshoot.
    #[must_use]
    pub fn mean(&self) -> Option<Duration> {
        if self.total_sleeps > 0 {
            Some(Duration::from_nanos(self.sum_ns / self.total_sleeps))
        } else {
            None
        }
    }

    /// Compute a percentile from the ring buffer.
    ///
    /// # Arguments
    ///
    /// * `percentile` - Percentile to compute (0.0 to 100.0).
    ///
    /// Returns `None` if no samples have been collected or if the
    /// percentile is out of range.
    #[must_use]
    pub fn percentile(&self, percentile: f64) -> Option<Duration> {
        if self.sample_count == 0 {
            return None;
        }

        if !(0.0..=100.0).contains(&percentile) || percentile.is_nan() {
            return None;
        }

        let mut sorted: Vec<u64> = self.samples[..self.sample_count].to_vec();
        sorted.sort_unstable();

        let idx = ((percentile / 100.0) * (sorted.len() - 1) as f64).round() as usize;
        let idx = idx.min(sorted.len() - 1);

        Some(Duration::from_nanos(sorted[idx]))
    }

    /// Compute multiple percentiles over one sorted copy.
    ///
    /// Invalid percentiles (< 0, > 100, or NaN) are skipped.
    #[must_use]
    pub fn percentiles(&self, percentiles: &[f64]) -> Vec<(f64, Duration)> {
        if self.sample_count == 0 {
            return vec![];
        }

        let mut sorted: Vec<u64> = self.samples[..self.sample_count].to_vec();
        sorted.sort_unstable();

        percentiles
            .iter()
            .filter(|&&p| (0.0..=100.0).contains(&p) && !p.is_nan())
            .map(|&p| {
                let idx = ((p / 100.0) * (sorted.len() - 1) as f64).round() as usize;
                let idx = idx.min(sorted.len() - 1);
                (p, Duration::from_nanos(sorted[idx]))
            })
            .collect()
    }

    /// Get a snapshot of current statistics.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_sleeps: self.total_sleeps,
            min_ns: if self.total_sleeps > 0 {
                Some(self.min_ns)
            } else {
                None
            },
            max_ns: if self.total_sleeps > 0 {
                Some(self.max_ns)
            } else {
                None
            },
            mean_ns: if self.total_sleeps > 0 {
                Some(self.sum_ns / self.total_sleeps)
            } else {
                None
            },
            early_return_count: self.early_return_count,
            sample_count: self.sample_count,
        }
    }

    /// Reset all statistics to initial state.
    pub fn reset(&mut self) {
        self.samples.fill(0);
        self.write_pos = 0;
        self.sample_count = 0;
        self.total_sleeps = 0;
        self.min_ns = u64::MAX;
        self.max_ns = 0;
        self.sum_ns = 0;
        self.early_return_count = 0;
    }
}

/// Immutable snapshot of sleep statistics for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct StatsSnapshot {
    /// Total sleeps recorded.
    pub total_sleeps: u64,
    /// Minimum overshoot in nanoseconds.
    pub min_ns: Option<u64>,
    /// Maximum overshoot in nanoseconds.
    pub max_ns: Option<u64>,
    /// Mean overshoot in nanoseconds.
    pub mean_ns: Option<u64>,
    /// Number of early returns.
    pub early_return_count: u64,
    /// Number of samples in the histogram.
    pub sample_count: usize,
}

impl StatsSnapshot {
    /// Get overshoot spread (max - min) in nanoseconds.
    #[must_use]
    pub fn spread_ns(&self) -> Option<u64> {
        match (self.min_ns, self.max_ns) {
            (Some(min), Some(max)) => Some(max - min),
            _ => None,
        }
    }
}
