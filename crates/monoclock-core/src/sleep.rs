//! Blocking sleep primitive.
//!
//! Blocks the calling thread only, never the whole process. On Linux the
//! wait is armed as an absolute deadline on `CLOCK_MONOTONIC` via
//! `clock_nanosleep(TIMER_ABSTIME)`, so an interrupted wait re-arms
//! against the same deadline instead of accumulating drift. Elsewhere
//! `std::thread::sleep` already provides per-thread blocking with
//! re-armed spurious wakeups.

use monoclock_common::{ClockError, ClockResult};
use std::time::Duration;

/// Number of nanoseconds in one second.
#[cfg(any(target_os = "linux", test))]
const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Block the calling thread for at least `seconds` seconds, best effort.
///
/// A zero duration yields the processor to other ready threads and
/// returns promptly instead of sleeping.
///
/// # Errors
///
/// Returns [`ClockError::InvalidArgument`] for negative or non-finite
/// durations, before any blocking begins.
pub fn sleep_secs(seconds: f64) -> ClockResult<()> {
    if seconds == 0.0 {
        std::thread::yield_now();
        return Ok(());
    }

    let duration = Duration::try_from_secs_f64(seconds).map_err(|_| {
        ClockError::InvalidArgument(format!(
            "sleep duration must be a finite, non-negative number of seconds, got {seconds}"
        ))
    })?;

    sleep_for(duration);
    Ok(())
}

/// Block the calling thread for at least `duration`, best effort.
///
/// A zero duration yields instead of sleeping.
pub fn sleep_for(duration: Duration) {
    if duration.is_zero() {
        std::thread::yield_now();
        return;
    }

    imp::sleep(duration);
}

/// Add `duration` to a `(sec, nsec)` timestamp, carrying the nanosecond
/// remainder into whole seconds when it overflows one second's worth.
#[cfg(any(target_os = "linux", test))]
fn absolute_deadline(now_sec: i64, now_nsec: i64, duration: Duration) -> (i64, i64) {
    let mut sec = now_sec + duration.as_secs() as i64;
    let mut nsec = now_nsec + i64::from(duration.subsec_nanos());
    if nsec >= NANOS_PER_SEC {
        nsec -= NANOS_PER_SEC;
        sec += 1;
    }
    (sec, nsec)
}

#[cfg(target_os = "linux")]
mod imp {
    use super::absolute_deadline;
    use std::time::Duration;
    use tracing::trace;

    pub fn sleep(duration: Duration) {
        let mut now = libc::timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };
        // SAFETY: clock_gettime writes into the timespec we own
        let ret = unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut now) };
        if ret != 0 {
            // No monotonic clock to arm a deadline against; relative
            // sleep is the best remaining option
            std::thread::sleep(duration);
            return;
        }

        // time_t / c_long widths vary by target; carry in i64 and cast back
        let (sec, nsec) = absolute_deadline(now.tv_sec as i64, now.tv_nsec as i64, duration);
        let deadline = libc::timespec {
            tv_sec: sec as libc::time_t,
            tv_nsec: nsec as libc::c_long,
        };

        trace!(?duration, "Arming absolute-deadline sleep");

        loop {
            // SAFETY: clock_nanosleep reads the deadline we own; the
            // remainder pointer is unused with TIMER_ABSTIME
            let ret = unsafe {
                libc::clock_nanosleep(
                    libc::CLOCK_MONOTONIC,
                    libc::TIMER_ABSTIME,
                    &deadline,
                    std::ptr::null_mut(),
                )
            };
            // EINTR means a signal interrupted the wait; the deadline is
            // absolute, so re-arming it cannot oversleep
            if ret != libc::EINTR {
                break;
            }
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod imp {
    use std::time::Duration;

    pub fn sleep(duration: Duration) {
        std::thread::sleep(duration);
    }
}
