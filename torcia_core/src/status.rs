//! What an operator intent or a slice of elapsed time produced.

use serde::Serialize;

use crate::error::Rejection;

/// Result of an operator intent. An ignored intent left state untouched.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored(Rejection),
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Outcome::Applied)
    }

    pub fn rejection(self) -> Option<Rejection> {
        match self {
            Outcome::Applied => None,
            Outcome::Ignored(why) => Some(why),
        }
    }
}

impl From<Result<(), Rejection>> for Outcome {
    fn from(r: Result<(), Rejection>) -> Self {
        match r {
            Ok(()) => Outcome::Applied,
            Err(why) => Outcome::Ignored(why),
        }
    }
}

/// Completion raised while advancing time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProcessEvent {
    /// Warm-up countdown reached zero; the speed may now be raised.
    WarmupComplete,
    /// Progress ramp reached 100 %.
    PressurizationComplete,
    /// The automatic shutdown countdown reached zero.
    AutomaticComplete,
    /// Displayed tank pressure caught up with its target.
    TankPressureSettled { bar: f64 },
}
