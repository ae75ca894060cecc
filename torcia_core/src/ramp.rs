//! Bounded-step approach toward a target value.
//!
//! Drives the displayed tank and manifold pressures and the pressurization
//! progress (0 → 100 %). Each tick moves the value by at most `max_step`;
//! once the remaining distance fits in one step the value lands exactly on the
//! target, so it never overshoots and never oscillates.

use crate::util::ticks_for;

/// Slack (in value units) absorbed by the final snap so that float error
/// accumulated over many fractional steps cannot cost an extra tick.
pub const SNAP_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampSimulator {
    current: f64,
    target: f64,
    max_step: f64,
}

impl RampSimulator {
    /// Converged ramp resting at `initial`.
    pub fn new(initial: f64, max_step: f64) -> Self {
        Self {
            current: initial,
            target: initial,
            max_step: max_step.abs(),
        }
    }

    /// 0 → 100 % ramp that takes `duration_s` worth of `tick_ms` ticks once
    /// its target is set to 100.
    pub fn progress(duration_s: u32, tick_ms: u64) -> Self {
        Self::new(0.0, Self::step_for(100.0, duration_s, tick_ms))
    }

    /// Per-tick step that covers `span` linearly over `duration_s`.
    pub fn step_for(span: f64, duration_s: u32, tick_ms: u64) -> f64 {
        span.abs() / ticks_for(duration_s, tick_ms) as f64
    }

    /// Retarget the ramp; non-finite targets are ignored.
    pub fn set_target(&mut self, target: f64) {
        if target.is_finite() {
            self.target = target;
        }
    }

    /// Place the value on `value` immediately and stop.
    pub fn jump_to(&mut self, value: f64) {
        if value.is_finite() {
            self.current = value;
            self.target = value;
        }
    }

    /// One tick: `next = current + clamp(target - current, ±max_step)`.
    /// Re-invoking after convergence is a no-op.
    pub fn tick(&mut self) -> f64 {
        let diff = self.target - self.current;
        if diff == 0.0 {
            return self.current;
        }
        if diff.abs() <= self.max_step + SNAP_TOLERANCE {
            self.current = self.target;
        } else {
            self.current += self.max_step.copysign(diff);
        }
        self.current
    }

    pub fn is_active(&self) -> bool {
        self.current != self.target
    }

    pub fn value(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn max_step(&self) -> f64 {
        self.max_step
    }

    /// Upper bound on ticks left before convergence.
    pub fn ticks_remaining(&self) -> u64 {
        let d = (self.target - self.current).abs();
        if d == 0.0 {
            return 0;
        }
        if self.max_step == 0.0 {
            return u64::MAX;
        }
        (d / self.max_step).ceil() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_by_bounded_steps_then_snaps() {
        let mut r = RampSimulator::new(1.0, 0.5);
        r.set_target(2.2);
        assert_eq!(r.tick(), 1.5);
        assert_eq!(r.tick(), 2.0);
        assert_eq!(r.tick(), 2.2);
        assert!(!r.is_active());
        assert_eq!(r.tick(), 2.2);
    }

    #[test]
    fn descends_toward_lower_targets() {
        let mut r = RampSimulator::new(10.0, 4.0);
        r.set_target(0.0);
        assert_eq!(r.tick(), 6.0);
        assert_eq!(r.tick(), 2.0);
        assert_eq!(r.tick(), 0.0);
    }

    #[test]
    fn progress_ramp_takes_the_configured_duration() {
        let mut p = RampSimulator::progress(30, 100);
        p.set_target(100.0);
        let mut ticks = 0;
        while p.is_active() {
            p.tick();
            ticks += 1;
        }
        assert_eq!(ticks, 300);
        assert_eq!(p.value(), 100.0);
    }

    #[test]
    fn non_finite_targets_are_ignored() {
        let mut r = RampSimulator::new(3.0, 1.0);
        r.set_target(f64::NAN);
        assert_eq!(r.target(), 3.0);
        r.jump_to(f64::INFINITY);
        assert_eq!(r.value(), 3.0);
    }
}
