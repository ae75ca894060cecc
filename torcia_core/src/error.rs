use thiserror::Error;

use crate::phase::{Phase, WizardStep};

#[derive(Debug, Error, Clone)]
pub enum TorciaError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("report error: {0}")]
    Report(String),
    #[error("io error: {0}")]
    Io(String),
    /// A driver could not get past a step.
    #[error("procedure blocked at step {step}: {reason}")]
    Blocked { step: WizardStep, reason: String },
    #[error("procedure aborted by operator")]
    Aborted,
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("invalid limit {name}: {reason}")]
    InvalidLimit { name: &'static str, reason: &'static str },
}

/// Why an operator intent was ignored. Ignored intents leave state untouched.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("not available on step {actual} (requires {expected})")]
    WrongStep {
        expected: WizardStep,
        actual: WizardStep,
    },
    #[error("not available in phase {actual}")]
    WrongPhase { actual: Phase },
    #[error("step {0} is not complete")]
    GateClosed(WizardStep),
    #[error("already at the first step")]
    AtFirstStep,
    #[error("generator already started")]
    AlreadyStarted,
    #[error("generator warm-up not complete")]
    WarmupPending,
    #[error("automatic process not complete")]
    AutomaticPending,
    #[error("value outside configured limits")]
    OutOfLimits,
    #[error("bottle index out of range")]
    NoSuchBottle,
    #[error("interlocked while the process is running")]
    Interlocked,
    #[error("process already terminated")]
    Terminated,
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
