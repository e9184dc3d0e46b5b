//! Wall-clock helpers.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

/// Convert an elapsed duration into whole simulation time units.
///
/// A zero-length time unit is treated as one millisecond.
#[must_use]
pub fn to_time_units(elapsed: Duration, time_unit: Duration) -> u64 {
    let unit = time_unit.as_millis().max(1);
    u64::try_from(elapsed.as_millis() / unit).unwrap_or(u64::MAX)
}

/// Duration of `units` simulation time units.
#[must_use]
pub fn units_to_duration(units: u32, time_unit: Duration) -> Duration {
    time_unit.saturating_mul(units)
}
