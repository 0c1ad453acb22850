//! Raw time source selection.
//!
//! The clock reads an unscaled integer tick count from one of two source
//! strategies, chosen once at initialization:
//!
//! - Monotonic: `clock_gettime(CLOCK_MONOTONIC)`, whole nanoseconds
//! - Wall clock: `gettimeofday`, whole microseconds
//!
//! The wall-clock source is subject to system clock adjustments and can
//! move backward; it exists as a fallback for hosts without a monotonic
//! clock and for exercising the fallback path in tests.

use monoclock_common::{ClockError, ClockResult, SourcePreference};
use tracing::{debug, warn};

/// Seconds per raw tick for the monotonic nanosecond source.
pub const MONOTONIC_RESOLUTION: f64 = 1e-9;

/// Seconds per raw tick for the wall-clock microsecond source.
pub const WALL_CLOCK_RESOLUTION: f64 = 1e-6;

/// A selected raw time source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSource {
    /// Monotonic clock, nanosecond ticks. Never moves backward.
    Monotonic,
    /// Wall clock, microsecond ticks. Moves with system clock adjustments.
    WallClock,
}

impl TickSource {
    /// Select a source according to `preference`.
    ///
    /// `Auto` prefers the monotonic source and falls back to the wall
    /// clock. Forcing a source that the host cannot provide is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Unavailable`] if no usable source answers.
    /// This is a static property of the host; there is no retry path.
    pub fn select(preference: SourcePreference) -> ClockResult<Self> {
        match preference {
            SourcePreference::Auto => {
                if monotonic_available() {
                    debug!("Selected monotonic time source (1ns ticks)");
                    Ok(TickSource::Monotonic)
                } else if wall_clock_available() {
                    warn!(
                        "Monotonic clock unavailable, falling back to wall clock; \
                         elapsed time can move backward if the system clock is adjusted"
                    );
                    Ok(TickSource::WallClock)
                } else {
                    Err(ClockError::Unavailable(
                        "neither the monotonic clock nor the wall clock answered".into(),
                    ))
                }
            }
            SourcePreference::Monotonic => {
                if monotonic_available() {
                    debug!("Selected monotonic time source (forced)");
                    Ok(TickSource::Monotonic)
                } else {
                    Err(ClockError::Unavailable(
                        "monotonic clock required but not available on this host".into(),
                    ))
                }
            }
            SourcePreference::WallClock => {
                if wall_clock_available() {
                    debug!("Selected wall-clock time source (forced)");
                    Ok(TickSource::WallClock)
                } else {
                    Err(ClockError::Unavailable("wall clock did not answer".into()))
                }
            }
        }
    }

    /// Read the current raw tick count from this source.
    ///
    /// Nanoseconds for the monotonic source, microseconds for the wall
    /// clock.
    #[must_use]
    pub fn raw_ticks(self) -> u64 {
        match self {
            TickSource::Monotonic => monotonic_ticks(),
            TickSource::WallClock => wall_clock_ticks(),
        }
    }

    /// Seconds per raw tick.
    #[must_use]
    pub fn resolution(self) -> f64 {
        match self {
            TickSource::Monotonic => MONOTONIC_RESOLUTION,
            TickSource::WallClock => WALL_CLOCK_RESOLUTION,
        }
    }

    /// Whether this source is immune to system clock adjustments.
    #[must_use]
    pub fn is_monotonic(self) -> bool {
        matches!(self, TickSource::Monotonic)
    }

    /// Short name for logs and reports.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TickSource::Monotonic => "monotonic",
            TickSource::WallClock => "wall_clock",
        }
    }
}

/// Probe whether the monotonic clock answers on this host.
#[cfg(unix)]
#[must_use]
pub fn monotonic_available() -> bool {
    nix::time::clock_gettime(nix::time::ClockId::CLOCK_MONOTONIC).is_ok()
}

/// Probe whether the wall clock answers on this host.
#[cfg(unix)]
#[must_use]
pub fn wall_clock_available() -> bool {
    let mut tv = libc::timeval {
        tv_sec: 0,
        tv_usec: 0,
    };
    // SAFETY: gettimeofday writes into the timeval we own; a null timezone
    // is the documented way to ignore it
    let ret = unsafe { libc::gettimeofday(&mut tv, std::ptr::null_mut()) };
    ret == 0
}

/// Monotonic nanosecond ticks.
#[cfg(unix)]
fn monotonic_ticks() -> u64 {
    match nix::time::clock_gettime(nix::time::ClockId::CLOCK_MONOTONIC) {
        Ok(ts) => (ts.tv_sec() as u64) * 1_000_000_000 + ts.tv_nsec() as u64,
        // The source was probed at selection time; a later failure would
        // mean the clock vanished out from under us
        Err(e) => unreachable!("CLOCK_MONOTONIC read failed after successful probe: {e}"),
    }
}

/// Wall-clock microsecond ticks.
#[cfg(unix)]
fn wall_clock_ticks() -> u64 {
    let mut tv = libc::timeval {
        tv_sec: 0,
        tv_usec: 0,
    };
    // SAFETY: gettimeofday writes into the timeval we own
    unsafe {
        libc::gettimeofday(&mut tv, std::ptr::null_mut());
    }
    (tv.tv_sec as u64) * 1_000_000 + tv.tv_usec as u64
}

#[cfg(not(unix))]
mod fallback {
    //! Non-Unix hosts get a process-local monotonic anchor.

    use std::sync::OnceLock;
    use std::time::{Instant, SystemTime, UNIX_EPOCH};

    static ANCHOR: OnceLock<Instant> = OnceLock::new();

    pub fn monotonic_ticks() -> u64 {
        ANCHOR.get_or_init(Instant::now).elapsed().as_nanos() as u64
    }

    pub fn wall_clock_ticks() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_micros() as u64)
    }
}

/// Probe whether the monotonic clock answers on this host.
#[cfg(not(unix))]
#[must_use]
pub fn monotonic_available() -> bool {
    true
}

/// Probe whether the wall clock answers on this host.
#[cfg(not(unix))]
#[must_use]
pub fn wall_clock_available() -> bool {
    true
}

#[cfg(not(unix))]
use fallback::{monotonic_ticks, wall_clock_ticks};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_selects_a_source() {
        let source = TickSource::select(SourcePreference::Auto).unwrap();
        assert!(source.resolution() > 0.0);
    }

    #[test]
    fn test_monotonic_resolution_is_nanoseconds() {
        assert_eq!(TickSource::Monotonic.resolution(), 1e-9);
        assert!(TickSource::Monotonic.is_monotonic());
    }

    #[test]
    fn test_wall_clock_resolution_is_microseconds() {
        assert_eq!(TickSource::WallClock.resolution(), 1e-6);
        assert!(!TickSource::WallClock.is_monotonic());
    }

    #[test]
    fn test_monotonic_ticks_non_decreasing() {
        if !monotonic_available() {
            return;
        }
        let source = TickSource::Monotonic;
        let mut last = source.raw_ticks();
        for _ in 0..1_000 {
            let now = source.raw_ticks();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn test_forced_wall_clock() {
        let source = TickSource::select(SourcePreference::WallClock).unwrap();
        assert_eq!(source, TickSource::WallClock);
        assert!(source.raw_ticks() > 0);
    }

    #[test]
    fn test_source_names() {
        assert_eq!(TickSource::Monotonic.name(), "monotonic");
        assert_eq!(TickSource::WallClock.name(), "wall_clock");
    }
}
