//! Watchdog for stuck string states.
//!
//! Entering a DCS/OSC/APC/rename string arms a five-second timer; reaching
//! ground disarms it. Expiry is the only state change not driven by input:
//! the in-flight payload is discarded and the parser drops back to ground.

use std::time::{Duration, Instant};

/// Maximum time a string state may sit without completing.
pub const WATCHDOG_TIMEOUT: Duration = Duration::from_secs(5);

/// Interface for arming the string-state watchdog and checking its expiry.
///
/// The embedding event loop can drive expiry itself through
/// [`crate::Parser::expire_watchdog`]; [`Parser::advance`](crate::Parser::advance)
/// also checks an armed deadline lazily before consuming new input.
pub trait Timeout: Default {
    /// Arm the watchdog for `duration` from now.
    fn set_timeout(&mut self, duration: Duration);
    /// Disarm the watchdog.
    fn clear_timeout(&mut self);
    /// Whether the watchdog is currently armed.
    fn pending_timeout(&self) -> bool;
    /// Whether an armed watchdog has expired.
    fn expired(&self) -> bool;
}

/// Wall-clock watchdog.
#[derive(Default)]
pub struct StdWatchdog {
    deadline: Option<Instant>,
}

impl StdWatchdog {
    /// Deadline of the armed watchdog, for event loops that schedule a
    /// wakeup instead of polling.
    #[inline]
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

impl Timeout for StdWatchdog {
    #[inline]
    fn set_timeout(&mut self, duration: Duration) {
        self.deadline = Some(Instant::now() + duration);
    }

    #[inline]
    fn clear_timeout(&mut self) {
        self.deadline = None;
    }

    #[inline]
    fn pending_timeout(&self) -> bool {
        self.deadline.is_some()
    }

    #[inline]
    fn expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}
