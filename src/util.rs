//! Small helpers shared across metric cell implementations.

use std::time::{SystemTime, UNIX_EPOCH};

/// The current wall-clock time, in milliseconds since the Unix epoch.
///
/// Falls back to `0` if the system clock is set before the epoch, which should never happen in
/// practice but must not panic a metrics hot path.
pub(crate) fn now_millis() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as i64).unwrap_or(0)
}
