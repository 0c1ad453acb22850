//! Elapsed-time and reset behavior.

use monoclock_common::SourcePreference;
use monoclock_core::{sleep_for, Clock};
use std::time::Duration;

/// A fresh clock reads near zero, then tracks a one-second sleep.
#[test]
fn test_fresh_clock_tracks_sleep() {
    let clock = Clock::new().expect("no usable time source");

    let initial = clock.elapsed_secs();
    assert!(
        (0.0..0.05).contains(&initial),
        "fresh clock read {initial}s"
    );

    sleep_for(Duration::from_secs(1));

    let after = clock.elapsed_secs();
    assert!(
        (after - 1.0).abs() < 0.05,
        "expected ~1.0s elapsed, got {after}s"
    );
}

/// Immediately after a reset, the clock reads the reset value.
#[test]
fn test_set_then_get_within_epsilon() {
    let clock = Clock::new().expect("no usable time source");

    for t in [0.0, 0.25, 5.0, 123.75] {
        clock.set_elapsed_secs(t);
        let read = clock.elapsed_secs();
        assert!(
            (read - t).abs() <= 0.01,
            "set {t}s but read {read}s"
        );
    }
}

/// Reset followed by a sleep accumulates on top of the reset value.
#[test]
fn test_set_sleep_round_trip() {
    let clock = Clock::new().expect("no usable time source");

    clock.set_elapsed_secs(5.0);
    sleep_for(Duration::from_millis(200));

    let read = clock.elapsed_secs();
    assert!(
        (read - 5.2).abs() < 0.05,
        "expected ~5.2s, got {read}s"
    );
}

/// Successive reads never decrease while the monotonic source is active.
#[test]
fn test_monotonic_non_decreasing() {
    let clock = Clock::new().expect("no usable time source");
    if !clock.is_monotonic() {
        eprintln!("Skipping test: host has no monotonic clock");
        return;
    }

    let mut last = clock.elapsed_secs();
    for _ in 0..10_000 {
        let now = clock.elapsed_secs();
        assert!(now >= last, "clock moved backward: {last} -> {now}");
        last = now;
    }
}

/// The process-wide clock initializes once; later calls see the same
/// instance, source, and resolution.
#[test]
fn test_global_initialization_idempotent() {
    let first = Clock::global().expect("no usable time source");
    let resolution = first.resolution();
    let source = first.source();

    let second = Clock::global().expect("no usable time source");
    assert!(std::ptr::eq(first, second));
    assert_eq!(second.resolution(), resolution);
    assert_eq!(second.source(), source);
}

/// Forcing the fallback source yields the documented microsecond
/// resolution and a non-monotonic clock.
#[test]
fn test_forced_wall_clock_source() {
    let clock = Clock::with_preference(SourcePreference::WallClock)
        .expect("wall clock did not answer");

    assert_eq!(clock.resolution(), 1e-6);
    assert!(!clock.is_monotonic());

    // Elapsed arithmetic behaves the same way on the fallback source
    clock.set_elapsed_secs(2.0);
    let read = clock.elapsed_secs();
    assert!((read - 2.0).abs() <= 0.01, "set 2.0s but read {read}s");
}
