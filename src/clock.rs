//! Wall-clock capability for stamping usage reports.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the timestamps attached to usage reports.
///
/// The reporter takes this as an injected capability so tests can supply a
/// deterministic clock.
pub trait Clock {
    /// Current wall-clock time in nanoseconds since the Unix epoch.
    fn now_nanos(&self) -> i64;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_nanos(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_nanos() as i64,
            // Clock is set before the epoch; surface a negative offset.
            Err(e) => -(e.duration().as_nanos() as i64),
        }
    }
}
