//! The elapsed-time clock.
//!
//! A [`Clock`] owns a raw time source selected at construction, the
//! source's resolution in seconds per tick, and a tick-count origin
//! (`base`). Every elapsed-time query is `(raw - base) * resolution`;
//! results are relative to the origin, never absolute.

use crate::sleep;
use crate::source::TickSource;
use monoclock_common::{ClockResult, SourcePreference};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use tracing::debug;

/// Process-lifetime elapsed-time clock with a resettable origin.
///
/// `base` is an atomic so the clock can be queried through a shared
/// reference. The atomic provides tearing-freedom only: callers that
/// invoke [`Clock::set_elapsed_secs`] concurrently with other clock
/// operations must provide their own mutual exclusion if they need a
/// consistent ordering between the rebase and nearby queries.
#[derive(Debug)]
pub struct Clock {
    /// Selected raw time source, fixed for the clock's lifetime.
    source: TickSource,
    /// Seconds per raw tick. Always > 0.
    resolution: f64,
    /// Raw-tick origin that elapsed queries are computed against.
    base: AtomicU64,
}

static GLOBAL: OnceLock<Clock> = OnceLock::new();

impl Clock {
    /// Create a clock using the best source the host offers.
    ///
    /// # Errors
    ///
    /// Returns [`monoclock_common::ClockError::Unavailable`] if no usable
    /// time source answers.
    pub fn new() -> ClockResult<Self> {
        Self::with_preference(SourcePreference::Auto)
    }

    /// Create a clock with an explicit source preference.
    ///
    /// # Errors
    ///
    /// Returns [`monoclock_common::ClockError::Unavailable`] if the
    /// preferred source cannot be provided.
    pub fn with_preference(preference: SourcePreference) -> ClockResult<Self> {
        let source = TickSource::select(preference)?;
        let resolution = source.resolution();
        debug_assert!(resolution > 0.0);

        let base = source.raw_ticks();
        debug!(
            source = source.name(),
            resolution, "Clock initialized"
        );

        Ok(Self {
            source,
            resolution,
            base: AtomicU64::new(base),
        })
    }

    /// Get the process-wide clock, initializing it on first call.
    ///
    /// Subsequent calls are idempotent no-ops returning the same
    /// instance; the source and resolution chosen by the first call are
    /// never revisited.
    ///
    /// # Errors
    ///
    /// Returns [`monoclock_common::ClockError::Unavailable`] if the first
    /// initialization finds no usable time source.
    pub fn global() -> ClockResult<&'static Clock> {
        if let Some(clock) = GLOBAL.get() {
            return Ok(clock);
        }
        let clock = Clock::new()?;
        // If another thread won the race, its instance is kept and this
        // one is dropped
        Ok(GLOBAL.get_or_init(|| clock))
    }

    /// Seconds elapsed since the clock's origin.
    ///
    /// No side effects. Non-decreasing as long as the origin is not reset
    /// and the monotonic source is in use. Under the wall-clock fallback
    /// the value follows system clock adjustments and can move backward
    /// (even below zero); nothing clamps it.
    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        let raw = self.source.raw_ticks();
        let base = self.base.load(Ordering::Relaxed);
        // Signed difference keeps a backward-adjusted wall clock readable
        // instead of wrapping to an enormous unsigned delta
        raw.wrapping_sub(base) as i64 as f64 * self.resolution
    }

    /// Rebase the clock so an immediate [`Clock::elapsed_secs`] returns
    /// approximately `secs`.
    ///
    /// Values below zero (and NaN) clamp to a zero offset. Not
    /// synchronized against concurrent queries; see the type-level note.
    pub fn set_elapsed_secs(&self, secs: f64) {
        let offset_ticks = (secs / self.resolution) as u64;
        let base = self.source.raw_ticks().wrapping_sub(offset_ticks);
        self.base.store(base, Ordering::Relaxed);
    }

    /// Block the calling thread for at least `secs` seconds, best effort.
    ///
    /// A zero duration yields the processor instead of sleeping. Only the
    /// calling thread blocks. Uses no clock state; provided here so the
    /// clock surface carries all three time operations.
    ///
    /// # Errors
    ///
    /// Returns [`monoclock_common::ClockError::InvalidArgument`] for
    /// negative or non-finite durations, before any blocking.
    pub fn sleep_secs(&self, secs: f64) -> ClockResult<()> {
        sleep::sleep_secs(secs)
    }

    /// The raw source backing this clock.
    #[must_use]
    pub fn source(&self) -> TickSource {
        self.source
    }

    /// Seconds per raw tick.
    #[must_use]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Whether the backing source is immune to system clock adjustments.
    #[must_use]
    pub fn is_monotonic(&self) -> bool {
        self.source.is_monotonic()
    }
}
