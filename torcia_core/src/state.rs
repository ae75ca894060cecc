//! The aggregate process record.
//!
//! `ProcessState` is owned by `ProcessSession`; rendering collaborators get a
//! shared reference (or a serializable [`ProcessSnapshot`]) and send intents
//! back through the session.

use serde::Serialize;

use crate::config::ProcessTiming;
use crate::log::OperatorLog;
use crate::phase::{Phase, WizardStep};
use crate::ramp::RampSimulator;
use crate::timer::{TimerPurpose, TimerService};
use crate::types::{
    BOTTLE_COUNT, BottleConfig, Checklist, GeneratorState, TankParameters, UtilityStates,
    ValveStates,
};

#[derive(Debug, Clone)]
pub struct ProcessState {
    pub(crate) tank: TankParameters,
    pub(crate) bottles: [BottleConfig; BOTTLE_COUNT],
    pub(crate) valves: ValveStates,
    pub(crate) utilities: UtilityStates,
    pub(crate) generator: GeneratorState,
    pub(crate) phase: Phase,
    pub(crate) step: WizardStep,
    pub(crate) progress: RampSimulator,
    // Displayed pressures (smoothed)
    pub(crate) tank_pressure: RampSimulator,
    pub(crate) manifold_pressure: RampSimulator,
    pub(crate) warmup: TimerService,
    pub(crate) automatic: TimerService,
    pub(crate) automatic_complete: bool,
    pub(crate) generator_shutdown_done: bool,
    pub(crate) checklist: Checklist,
    pub(crate) terminated: bool,
    pub(crate) log: OperatorLog,
}

impl ProcessState {
    pub(crate) fn new(timing: &ProcessTiming) -> Self {
        Self {
            tank: TankParameters::default(),
            bottles: [BottleConfig::default(); BOTTLE_COUNT],
            valves: ValveStates::default(),
            utilities: UtilityStates::default(),
            generator: GeneratorState::default(),
            phase: Phase::Idle,
            step: WizardStep::TankData,
            progress: RampSimulator::progress(timing.pressurization_s, timing.tick_ms),
            tank_pressure: RampSimulator::new(0.0, timing.tank_display_step_bar),
            manifold_pressure: RampSimulator::new(0.0, timing.manifold_display_step_bar),
            warmup: TimerService::new(TimerPurpose::Warmup),
            automatic: TimerService::new(TimerPurpose::Automatic),
            automatic_complete: false,
            generator_shutdown_done: false,
            checklist: Checklist::default(),
            terminated: false,
            log: OperatorLog::default(),
        }
    }

    /// Return every process field to its default. Tank parameters, bottle
    /// configuration and the operator log survive; timers are cancelled.
    pub(crate) fn reset_process(&mut self, timing: &ProcessTiming) {
        self.warmup.cancel();
        self.automatic.cancel();
        self.valves = ValveStates::default();
        self.utilities = UtilityStates::default();
        self.generator = GeneratorState::default();
        self.phase = Phase::Idle;
        self.step = WizardStep::TankData;
        self.progress = RampSimulator::progress(timing.pressurization_s, timing.tick_ms);
        self.tank_pressure = RampSimulator::new(
            self.tank.p0.unwrap_or(0.0),
            timing.tank_display_step_bar,
        );
        self.manifold_pressure = RampSimulator::new(0.0, timing.manifold_display_step_bar);
        self.automatic_complete = false;
        self.generator_shutdown_done = false;
        self.checklist = Checklist::default();
        self.terminated = false;
    }

    /// Pressure the tank is heading to: `P0` before the run, then linear in
    /// the pressurization progress up to `Pfinale`.
    pub(crate) fn tank_pressure_target(&self) -> f64 {
        let p0 = self.tank.p0.unwrap_or(0.0);
        match (self.phase, self.tank.p_finale) {
            (Phase::Idle, _) | (_, None) => p0,
            (_, Some(pf)) => p0 + (pf - p0) * self.progress.value() / 100.0,
        }
    }

    /// Header pressure: the fullest selected bottle while the manifold is open.
    pub(crate) fn manifold_pressure_target(&self) -> f64 {
        if !self.valves.manifold {
            return 0.0;
        }
        self.bottles
            .iter()
            .filter(|b| b.used)
            .map(|b| b.pressure)
            .fold(0.0, f64::max)
    }

    pub fn tank(&self) -> &TankParameters {
        &self.tank
    }

    pub fn bottles(&self) -> &[BottleConfig; BOTTLE_COUNT] {
        &self.bottles
    }

    pub fn valves(&self) -> &ValveStates {
        &self.valves
    }

    pub fn utilities(&self) -> &UtilityStates {
        &self.utilities
    }

    pub fn generator(&self) -> &GeneratorState {
        &self.generator
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    /// Pressurization progress in percent.
    pub fn progress(&self) -> f64 {
        self.progress.value()
    }

    /// Displayed tank pressure (bar).
    pub fn tank_pressure(&self) -> f64 {
        self.tank_pressure.value()
    }

    /// Displayed manifold pressure (bar).
    pub fn manifold_pressure(&self) -> f64 {
        self.manifold_pressure.value()
    }

    pub fn warmup_timer(&self) -> &TimerService {
        &self.warmup
    }

    pub fn automatic_timer(&self) -> &TimerService {
        &self.automatic
    }

    pub fn automatic_complete(&self) -> bool {
        self.automatic_complete
    }

    pub fn generator_shutdown_done(&self) -> bool {
        self.generator_shutdown_done
    }

    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn log(&self) -> &OperatorLog {
        &self.log
    }

    /// True while any periodic task would still change state.
    pub fn has_pending_work(&self) -> bool {
        self.warmup.is_active()
            || self.automatic.is_active()
            || self.progress.is_active()
            || self.tank_pressure.is_active()
            || self.manifold_pressure.is_active()
    }

    pub fn snapshot(&self) -> ProcessSnapshot {
        ProcessSnapshot {
            phase: self.phase,
            step: self.step.index(),
            step_name: self.step.name(),
            progress: self.progress(),
            p_serb: self.tank_pressure(),
            p_bombole: self.manifold_pressure(),
            generator: self.generator,
            valves: self.valves,
            utilities: self.utilities,
            checklist: self.checklist,
            warmup_remaining_s: self.warmup.remaining_s(),
            automatic_remaining_s: self.automatic.remaining_s(),
            automatic_complete: self.automatic_complete,
            generator_shutdown_done: self.generator_shutdown_done,
            terminated: self.terminated,
        }
    }
}

/// Read-only view handed to panels and the schematic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSnapshot {
    pub phase: Phase,
    pub step: usize,
    pub step_name: &'static str,
    pub progress: f64,
    #[serde(rename = "P_serb")]
    pub p_serb: f64,
    #[serde(rename = "P_bombole")]
    pub p_bombole: f64,
    pub generator: GeneratorState,
    pub valves: ValveStates,
    pub utilities: UtilityStates,
    pub checklist: Checklist,
    pub warmup_remaining_s: u32,
    pub automatic_remaining_s: u32,
    pub automatic_complete: bool,
    pub generator_shutdown_done: bool,
    pub terminated: bool,
}
