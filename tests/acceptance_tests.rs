//! Acceptance tests for the monoclock workspace.
//!
//! These tests verify the externally observable clock contract:
//! - Elapsed-time and reset arithmetic
//! - Initialization idempotence
//! - Sleep timing bounds (lower bound, zero-duration yield)
//! - Configuration file handling
//!
//! Timing assertions allow scheduler slack; they are written to pass on
//! loaded CI hosts, not just idle workstations.

mod acceptance;
