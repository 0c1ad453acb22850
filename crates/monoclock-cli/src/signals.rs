//! Interrupt handling for long-running commands.
//!
//! Registers SIGINT/SIGTERM handlers that set a static atomic flag.
//! Signal handlers must be async-signal-safe, so the handlers do nothing
//! but store to the atomic; the `show` and `bench` loops poll it between
//! iterations.

use std::sync::atomic::{AtomicBool, Ordering};

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Register SIGINT and SIGTERM handlers.
///
/// On non-Unix platforms this is a no-op and commands run until their
/// own termination condition.
pub fn install() {
    #[cfg(unix)]
    {
        use std::os::raw::c_int;

        extern "C" fn on_signal(_: c_int) {
            SHUTDOWN.store(true, Ordering::Relaxed);
        }

        // SAFETY: the handler only stores to an atomic, which is
        // async-signal-safe; registration happens before any command loop
        unsafe {
            libc::signal(libc::SIGINT, on_signal as libc::sighandler_t);
            libc::signal(libc::SIGTERM, on_signal as libc::sighandler_t);
        }

        tracing::debug!("Signal handlers registered");
    }
}

/// Check whether an interrupt has been received.
#[inline]
pub fn shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
