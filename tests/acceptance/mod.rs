//! Integration tests for monoclock acceptance testing.
//!
//! Covers the clock contract (elapsed/reset arithmetic, idempotent
//! initialization, source selection) and the sleep contract (lower
//! bound, zero-duration yield, input validation), plus configuration
//! file handling.

mod clock_behavior;
mod config_behavior;
mod sleep_behavior;
