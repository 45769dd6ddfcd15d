//! Daily on/off window evaluation.

use crate::time::Time;

/// Decide whether the light should be on at `current` for the daily
/// window `[on, off)`.
///
/// - `on == off` is a zero-width window and never activates.
/// - `off > on` is a same-day window: `on <= current < off`.
/// - `off < on` wraps past midnight: `current >= on || current < off`.
///
/// Pure and allocation-free, so both the RTC task and the foreground may
/// call it.
pub fn is_light_active(current: &Time, on: &Time, off: &Time) -> bool {
    let start = on.linear();
    let stop = off.linear();
    let now = current.linear();

    if stop == start {
        false
    } else if stop > start {
        now >= start && now < stop
    } else if stop == 0 {
        // Window ends exactly at midnight. Same result as the wraparound
        // arm below, since nothing is below 00:00:00.
        now >= start
    } else {
        now >= start || now < stop
    }
}
