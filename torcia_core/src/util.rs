//! Common time/period helpers for torcia_core.

/// Countdown resolution of `TimerService` in milliseconds.
pub const TIMER_TICK_MS: u64 = 1_000;
/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Number of ramp ticks needed to cover `duration_s` at `tick_ms`.
/// - Clamps `tick_ms` to at least 1 to avoid division by zero.
/// - Ensures result is at least 1 tick.
#[inline]
pub fn ticks_for(duration_s: u32, tick_ms: u64) -> u64 {
    (u64::from(duration_s) * MILLIS_PER_SEC)
        .div_ceil(tick_ms.max(1))
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_cover_the_whole_duration() {
        assert_eq!(ticks_for(20, 100), 200);
        assert_eq!(ticks_for(1, 300), 4);
        assert_eq!(ticks_for(0, 100), 1);
        assert_eq!(ticks_for(5, 0), 5_000);
    }
}
