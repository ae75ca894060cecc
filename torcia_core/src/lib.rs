#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Orchestration core of the LPG tank pressurization trainer.
//!
//! Everything here is rendering-agnostic: panels and the P&ID schematic read
//! [`ProcessState`] (or a [`ProcessSnapshot`]) and send operator intents to
//! [`ProcessSession`].
//!
//! ## Architecture
//!
//! - **Validation**: pure rules returning errors and warnings (`validation`)
//! - **Step gates**: one predicate per wizard step (`gate`)
//! - **Automaton**: phases, intents and virtual time (`session`)
//! - **Timers and ramps**: one-second countdowns (`timer`) and bounded-step
//!   smoothing on the ramp tick (`ramp`)
//! - **Report**: JSON export of parameters, pressures and the operator log (`report`)
//!
//! ## Time
//!
//! The core never reads a clock for process timing. Callers feed elapsed time
//! through [`ProcessSession::advance`]; tests advance virtual time directly.

pub mod atomic;
pub mod builder;
pub mod config;
pub mod conversions;
pub mod error;
pub mod gate;
pub mod log;
pub mod phase;
pub mod ramp;
pub mod report;
pub mod session;
pub mod state;
pub mod status;
pub mod timer;
pub mod types;
pub mod util;
pub mod validation;

pub use builder::SessionBuilder;
pub use config::{GeneratorCfg, LimitPair, ProcessTiming, SettingsLimits};
pub use error::{BuildError, Rejection, Result, TorciaError};
pub use gate::can_proceed;
pub use log::{LogEntry, LogLevel, OperatorLog};
pub use phase::{Phase, WizardStep};
pub use ramp::RampSimulator;
pub use report::{ProcessReport, report_file_name};
pub use session::ProcessSession;
pub use state::{ProcessSnapshot, ProcessState};
pub use status::{Outcome, ProcessEvent};
pub use timer::{TimerFired, TimerPurpose, TimerService, TimerTick, TimerToken};
pub use types::{
    BOTTLE_COUNT, BottleConfig, Checklist, ChecklistItem, GeneratorState, TankField,
    TankParameters, Utility, UtilityStates, Valve, ValveStates, parse_field,
};
pub use validation::ValidationReport;
