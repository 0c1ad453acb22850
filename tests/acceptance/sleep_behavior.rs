//! Sleep timing bounds and input validation.

use monoclock_common::ClockError;
use monoclock_core::{sleep_for, sleep_secs};
use std::time::{Duration, Instant};

/// A sleep returns no earlier than its requested duration (allowing
/// scheduler slack in the assertion, not in the sleep).
#[test]
fn test_sleep_lower_bound() {
    let start = Instant::now();
    sleep_secs(0.05).unwrap();
    let elapsed = start.elapsed();

    assert!(
        elapsed >= Duration::from_millis(45),
        "sleep(0.05) returned after {elapsed:?}"
    );
}

/// A zero-duration sleep yields rather than blocking.
#[test]
fn test_zero_sleep_returns_promptly() {
    let start = Instant::now();
    sleep_secs(0.0).unwrap();
    let elapsed = start.elapsed();

    assert!(
        elapsed < Duration::from_millis(10),
        "sleep(0) took {elapsed:?}"
    );
}

/// Negative durations are rejected synchronously, before any blocking.
#[test]
fn test_negative_sleep_rejected() {
    let start = Instant::now();
    let err = sleep_secs(-1.0).unwrap_err();

    assert!(matches!(err, ClockError::InvalidArgument(_)));
    assert!(start.elapsed() < Duration::from_millis(10));
}

/// A sleeping thread does not suspend the rest of the process.
#[test]
fn test_sleep_blocks_only_calling_thread() {
    let sleeper = std::thread::spawn(|| {
        sleep_secs(0.3).unwrap();
    });

    // This thread stays runnable while the other one sleeps
    let start = Instant::now();
    while start.elapsed() < Duration::from_millis(50) {
        std::hint::spin_loop();
    }

    assert!(
        !sleeper.is_finished(),
        "sleeper finished early; nothing was actually blocked"
    );
    sleeper.join().unwrap();
}

/// Back-to-back short sleeps each honor their own lower bound.
#[test]
fn test_repeated_short_sleeps() {
    for _ in 0..5 {
        let start = Instant::now();
        sleep_for(Duration::from_millis(10));
        assert!(start.elapsed() >= Duration::from_millis(9));
    }
}
