//! Optional real-time elevation for benchmark accuracy.
//!
//! The sleep benchmark measures scheduler-induced overshoot; running it
//! under SCHED_FIFO separates clock behavior from time-sharing noise.
//! Requires privileges (CAP_SYS_NICE or root).

#![allow(unused_imports)] // Platform-specific code may not use all imports

use monoclock_common::RtConfig;
use tracing::{info, warn};

/// Apply SCHED_FIFO elevation if enabled in `config`.
///
/// Returns the applied priority, or `None` if elevation was disabled or
/// the process lacks privileges (EPERM is downgraded to a warning so the
/// benchmark still runs, just unelevated).
///
/// # Errors
///
/// Returns an error for scheduler failures other than missing privileges.
#[cfg(target_os = "linux")]
pub fn elevate(config: &RtConfig) -> std::io::Result<Option<u8>> {
    if !config.enabled {
        return Ok(None);
    }

    let clamped = config.priority.clamp(1, 99);
    if clamped != config.priority {
        warn!(
            original = config.priority,
            clamped, "Scheduler priority clamped to valid range"
        );
    }

    let param = libc::sched_param {
        sched_priority: i32::from(clamped),
    };

    // SAFETY: sched_setscheduler is safe with valid parameters; pid 0
    // targets the calling thread
    let result = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };

    if result == -1 {
        let err = std::io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::EPERM) {
            warn!(
                "sched_setscheduler failed with EPERM - running without RT privileges. \
                 Overshoot figures will include time-sharing noise."
            );
            return Ok(None);
        }
        return Err(err);
    }

    info!(priority = clamped, "Real-time scheduler configured");
    Ok(Some(clamped))
}

/// Real-time elevation is not available on this platform.
#[cfg(not(target_os = "linux"))]
pub fn elevate(config: &RtConfig) -> std::io::Result<Option<u8>> {
    if config.enabled {
        warn!("Real-time scheduling not available on this platform");
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_elevation_is_none() {
        let config = RtConfig {
            enabled: false,
            priority: 90,
        };
        assert!(elevate(&config).unwrap().is_none());
    }
}
