//! One-second countdown used by the generator warm-up and the automatic
//! shutdown sequence.
//!
//! Completion is returned as a [`TimerFired`] value instead of invoking a
//! stored callback; the owner dispatches on [`TimerPurpose`]. A cancelled or
//! restarted timer therefore has nothing left that could fire into state that
//! has since been reset.

use crate::util::TIMER_TICK_MS;

/// What a countdown is for; decides how its completion is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerPurpose {
    Warmup,
    Automatic,
}

/// Identifies one `start` of a timer. A new `start` or a `cancel` retires it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub purpose: TimerPurpose,
    pub token: TimerToken,
}

/// Result of a single one-second tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// No countdown in flight.
    Idle,
    Running { remaining_s: u32 },
    Completed(TimerFired),
}

#[derive(Debug, Clone)]
pub struct TimerService {
    purpose: TimerPurpose,
    duration_s: u32,
    remaining_s: u32,
    // Sub-second time carried between `advance` calls
    accum_ms: u64,
    active: Option<TimerToken>,
    issued: u64,
}

impl TimerService {
    pub fn new(purpose: TimerPurpose) -> Self {
        Self {
            purpose,
            duration_s: 0,
            remaining_s: 0,
            accum_ms: 0,
            active: None,
            issued: 0,
        }
    }

    /// Begin a countdown of `duration_s` ticks. A `duration_s` of 0 is run as
    /// a single tick, so [`Self::duration_s`] reports 1 and completion still
    /// arrives on the next tick. Any countdown already running is cancelled
    /// first and will never complete.
    pub fn start(&mut self, duration_s: u32) -> TimerToken {
        if self.cancel() {
            tracing::debug!(purpose = ?self.purpose, "timer restarted; previous countdown cancelled");
        }
        self.issued = self.issued.wrapping_add(1);
        let token = TimerToken(self.issued);
        self.duration_s = duration_s.max(1);
        self.remaining_s = self.duration_s;
        self.accum_ms = 0;
        self.active = Some(token);
        token
    }

    /// Stop early without completion. Returns whether a countdown was running.
    pub fn cancel(&mut self) -> bool {
        self.remaining_s = 0;
        self.accum_ms = 0;
        self.active.take().is_some()
    }

    /// Apply one one-second tick.
    pub fn tick(&mut self) -> TimerTick {
        let Some(token) = self.active else {
            return TimerTick::Idle;
        };
        self.remaining_s = self.remaining_s.saturating_sub(1);
        if self.remaining_s == 0 {
            self.active = None;
            self.accum_ms = 0;
            return TimerTick::Completed(TimerFired {
                purpose: self.purpose,
                token,
            });
        }
        TimerTick::Running {
            remaining_s: self.remaining_s,
        }
    }

    /// Feed elapsed time; whole seconds become ticks. Returns the completion if
    /// it happened within this slice.
    pub fn advance(&mut self, elapsed_ms: u64) -> Option<TimerFired> {
        if self.active.is_none() {
            return None;
        }
        self.accum_ms = self.accum_ms.saturating_add(elapsed_ms);
        while self.accum_ms >= TIMER_TICK_MS {
            self.accum_ms -= TIMER_TICK_MS;
            match self.tick() {
                TimerTick::Completed(fired) => return Some(fired),
                TimerTick::Running { remaining_s } => {
                    tracing::trace!(purpose = ?self.purpose, remaining_s, "timer tick");
                }
                TimerTick::Idle => return None,
            }
        }
        None
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Token of the running countdown, if any.
    pub fn token(&self) -> Option<TimerToken> {
        self.active
    }

    pub fn purpose(&self) -> TimerPurpose {
        self.purpose
    }

    pub fn remaining_s(&self) -> u32 {
        self.remaining_s
    }

    pub fn duration_s(&self) -> u32 {
        self.duration_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_timer_ticks_are_no_ops() {
        let mut t = TimerService::new(TimerPurpose::Warmup);
        assert_eq!(t.tick(), TimerTick::Idle);
        assert_eq!(t.advance(5_000), None);
        assert_eq!(t.remaining_s(), 0);
    }

    #[test]
    fn zero_duration_still_takes_one_tick() {
        let mut t = TimerService::new(TimerPurpose::Automatic);
        t.start(0);
        assert_eq!(t.duration_s(), 1);
        assert!(matches!(t.tick(), TimerTick::Completed(_)));
    }

    #[test]
    fn sub_second_slices_accumulate() {
        let mut t = TimerService::new(TimerPurpose::Warmup);
        t.start(2);
        for _ in 0..9 {
            assert_eq!(t.advance(100), None);
        }
        assert_eq!(t.remaining_s(), 2);
        assert_eq!(t.advance(100), None);
        assert_eq!(t.remaining_s(), 1);
        for _ in 0..9 {
            assert_eq!(t.advance(100), None);
        }
        assert!(t.advance(100).is_some());
        assert!(!t.is_active());
    }
}
