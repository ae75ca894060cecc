//! Phase automaton and wizard navigation.
//!
//! `ProcessSession` is the single owner of [`ProcessState`]. Operator intents
//! are methods returning an [`Outcome`]; an intent that is not allowed in the
//! current step or phase is ignored and leaves state untouched. Time only
//! moves through [`ProcessSession::advance`], which drives the ramps on the
//! configured tick and feeds the same elapsed time to both countdowns.

use std::path::{Path, PathBuf};
use std::time::Duration;

use torcia_traits::WallClock;

use crate::builder::SessionBuilder;
use crate::config::{GeneratorCfg, ProcessTiming, SettingsLimits};
use crate::error::{Rejection, Result};
use crate::gate;
use crate::log::LogLevel;
use crate::phase::{Phase, WizardStep};
use crate::report::ProcessReport;
use crate::state::{ProcessSnapshot, ProcessState};
use crate::status::{Outcome, ProcessEvent};
use crate::timer::{TimerFired, TimerPurpose};
use crate::types::{BOTTLE_COUNT, BottleConfig, ChecklistItem, TankField, Utility, Valve, parse_field};
use crate::validation::{self, ValidationReport};

pub struct ProcessSession {
    pub(crate) state: ProcessState,
    pub(crate) limits: SettingsLimits,
    pub(crate) timing: ProcessTiming,
    pub(crate) generator_cfg: GeneratorCfg,
    pub(crate) wall: Box<dyn WallClock + Send + Sync>,
    // Elapsed time not yet consumed by a whole ramp tick
    pub(crate) pending_ms: u64,
}

impl core::fmt::Debug for ProcessSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProcessSession")
            .field("step", &self.state.step)
            .field("phase", &self.state.phase)
            .field("progress", &self.state.progress())
            .field("terminated", &self.state.terminated)
            .finish_non_exhaustive()
    }
}

impl ProcessSession {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn state(&self) -> &ProcessState {
        &self.state
    }

    pub fn limits(&self) -> &SettingsLimits {
        &self.limits
    }

    pub fn timing(&self) -> &ProcessTiming {
        &self.timing
    }

    pub fn generator_cfg(&self) -> &GeneratorCfg {
        &self.generator_cfg
    }

    pub fn snapshot(&self) -> ProcessSnapshot {
        self.state.snapshot()
    }

    pub fn can_proceed(&self, step: WizardStep) -> bool {
        gate::can_proceed(step, &self.state, &self.limits)
    }

    pub fn blockers(&self, step: WizardStep) -> Vec<String> {
        gate::blockers(step, &self.state, &self.limits)
    }

    pub fn validate_tank(&self) -> ValidationReport {
        validation::validate_tank(&self.state.tank, &self.limits)
    }

    pub fn validate_pressure_target(&self) -> ValidationReport {
        validation::validate_pressure_target(&self.state.tank, &self.limits)
    }

    pub fn validate_bottles(&self) -> ValidationReport {
        validation::validate_bottles(&self.state.bottles, &self.limits)
    }

    pub fn validate_generator(&self) -> ValidationReport {
        validation::validate_generator_rpm(self.state.generator.rpm, &self.limits)
    }

    pub fn validate_setup(&self) -> ValidationReport {
        validation::validate_setup(&self.state.tank, &self.state.bottles, &self.limits)
    }

    /// Report document for the current state, stamped with the wall clock.
    pub fn report(&self) -> ProcessReport {
        ProcessReport::capture(&self.state, self.wall.now_utc())
    }

    /// Write the report into `dir`; returns the file path.
    pub fn export_report(&mut self, dir: &Path) -> Result<PathBuf> {
        let path = self.report().write_to_dir(dir)?;
        tracing::info!(path = %path.display(), "report exported");
        self.record(
            LogLevel::Success,
            format!("report saved as {}", path.display()),
        );
        Ok(path)
    }

    // ── Intents ──────────────────────────────────────────────────────────────

    /// Store a tank field. `Pfinale` belongs to the target-pressure step, the
    /// other fields to the tank-data step.
    pub fn set_tank_field(&mut self, field: TankField, value: Option<f64>) -> Outcome {
        let r = self.try_set_tank_field(field, value);
        settle("set_tank_field", r)
    }

    /// Keypad entry: blank or unparsable text clears the field.
    pub fn set_tank_text(&mut self, field: TankField, text: &str) -> Outcome {
        self.set_tank_field(field, parse_field(text))
    }

    pub fn set_bottle(&mut self, index: usize, bottle: BottleConfig) -> Outcome {
        let r = self.try_set_bottle(index, bottle);
        settle("set_bottle", r)
    }

    pub fn next_step(&mut self) -> Outcome {
        let r = self.try_next_step();
        settle("next_step", r)
    }

    pub fn previous_step(&mut self) -> Outcome {
        let r = self.try_previous_step();
        settle("previous_step", r)
    }

    pub fn start_generator(&mut self) -> Outcome {
        let r = self.try_start_generator();
        settle("start_generator", r)
    }

    pub fn set_generator_rpm(&mut self, rpm: u32) -> Outcome {
        let r = self.try_set_generator_rpm(rpm);
        settle("set_generator_rpm", r)
    }

    pub fn set_valve(&mut self, valve: Valve, open: bool) -> Outcome {
        let r = self.try_set_valve(valve, open);
        settle("set_valve", r)
    }

    pub fn set_utility(&mut self, utility: Utility, on: bool) -> Outcome {
        let r = self.try_set_utility(utility, on);
        settle("set_utility", r)
    }

    pub fn start_pressurization(&mut self) -> Outcome {
        let r = self.try_start_pressurization();
        settle("start_pressurization", r)
    }

    pub fn start_automatic(&mut self) -> Outcome {
        let r = self.try_start_automatic();
        settle("start_automatic", r)
    }

    pub fn shutdown_generator(&mut self) -> Outcome {
        let r = self.try_shutdown_generator();
        settle("shutdown_generator", r)
    }

    pub fn set_checklist_item(&mut self, item: ChecklistItem, done: bool) -> Outcome {
        let r = self.try_set_checklist_item(item, done);
        settle("set_checklist_item", r)
    }

    /// Cancel every countdown and ramp and return the process to step 0,
    /// phase `Idle`. Tank data and bottle selection are kept.
    pub fn reset_process(&mut self) -> Outcome {
        self.state.reset_process(&self.timing);
        self.pending_ms = 0;
        tracing::info!("process reset");
        self.record(LogLevel::Info, "process reset".to_string());
        Outcome::Applied
    }

    // ── Time ─────────────────────────────────────────────────────────────────

    /// Feed elapsed time. Whole ramp ticks are applied; the remainder carries
    /// over to the next call.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<ProcessEvent> {
        let ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.pending_ms = self.pending_ms.saturating_add(ms);
        let mut events = Vec::new();
        while self.pending_ms >= self.timing.tick_ms {
            self.pending_ms -= self.timing.tick_ms;
            self.tick(&mut events);
        }
        events
    }

    fn tick(&mut self, events: &mut Vec<ProcessEvent>) {
        let tick_ms = self.timing.tick_ms;
        for fired in [
            self.state.warmup.advance(tick_ms),
            self.state.automatic.advance(tick_ms),
        ]
        .into_iter()
        .flatten()
        {
            self.on_timer(fired, events);
        }

        if self.state.progress.is_active() {
            let pct = self.state.progress.tick();
            tracing::trace!(progress = pct, "pressurization tick");
            if !self.state.progress.is_active() {
                tracing::info!("pressurization complete");
                self.record(LogLevel::Success, "pressurization complete".to_string());
                events.push(ProcessEvent::PressurizationComplete);
            }
        }

        // Both targets are read from the same post-progress state.
        let tank_target = self.state.tank_pressure_target();
        let manifold_target = self.state.manifold_pressure_target();
        self.state.tank_pressure.set_target(tank_target);
        self.state.manifold_pressure.set_target(manifold_target);

        if self.state.tank_pressure.is_active() {
            let bar = self.state.tank_pressure.tick();
            if !self.state.tank_pressure.is_active() && self.state.phase != Phase::Idle {
                tracing::debug!(bar, "tank pressure settled");
                events.push(ProcessEvent::TankPressureSettled { bar });
            }
        }
        if self.state.manifold_pressure.is_active() {
            let bar = self.state.manifold_pressure.tick();
            tracing::trace!(bar, "manifold pressure tick");
        }
    }

    fn on_timer(&mut self, fired: TimerFired, events: &mut Vec<ProcessEvent>) {
        tracing::debug!(purpose = ?fired.purpose, token = ?fired.token, "timer completed");
        match fired.purpose {
            TimerPurpose::Warmup => {
                self.state.generator.warmup_complete = true;
                self.record(LogLevel::Success, "generator warm-up complete".to_string());
                events.push(ProcessEvent::WarmupComplete);
            }
            TimerPurpose::Automatic => {
                self.state.automatic_complete = true;
                self.record(LogLevel::Success, "automatic process complete".to_string());
                events.push(ProcessEvent::AutomaticComplete);
            }
        }
    }

    // ── Intent bodies ────────────────────────────────────────────────────────

    fn record(&mut self, level: LogLevel, message: String) {
        let at = self.wall.now_utc();
        self.state.log.push(at, level, message);
    }

    fn ensure_open(&self) -> core::result::Result<(), Rejection> {
        if self.state.terminated {
            return Err(Rejection::Terminated);
        }
        Ok(())
    }

    fn ensure_step(&self, expected: WizardStep) -> core::result::Result<(), Rejection> {
        self.ensure_open()?;
        if self.state.step != expected {
            return Err(Rejection::WrongStep {
                expected,
                actual: self.state.step,
            });
        }
        Ok(())
    }

    fn ensure_phase(&self, expected: Phase) -> core::result::Result<(), Rejection> {
        if self.state.phase != expected {
            return Err(Rejection::WrongPhase {
                actual: self.state.phase,
            });
        }
        Ok(())
    }

    fn try_set_tank_field(
        &mut self,
        field: TankField,
        value: Option<f64>,
    ) -> core::result::Result<(), Rejection> {
        let step = match field {
            TankField::PFinale => WizardStep::TargetPressure,
            _ => WizardStep::TankData,
        };
        self.ensure_step(step)?;
        self.state.tank.set(field, value);
        let stored = self.state.tank.get(field);
        if field == TankField::P0 {
            self.state.tank_pressure.jump_to(stored.unwrap_or(0.0));
        }
        tracing::info!(?field, value = ?stored, "tank field set");
        let message = match stored {
            Some(v) => format!("{field:?} set to {v}"),
            None => format!("{field:?} cleared"),
        };
        self.record(LogLevel::Info, message);
        Ok(())
    }

    fn try_set_bottle(
        &mut self,
        index: usize,
        bottle: BottleConfig,
    ) -> core::result::Result<(), Rejection> {
        self.ensure_step(WizardStep::BottleSelection)?;
        if index >= BOTTLE_COUNT {
            return Err(Rejection::NoSuchBottle);
        }
        if !bottle.pressure.is_finite() || !bottle.volume.is_finite() {
            return Err(Rejection::OutOfLimits);
        }
        self.state.bottles[index] = bottle;
        tracing::info!(
            bottle = index + 1,
            used = bottle.used,
            pressure = bottle.pressure,
            volume = bottle.volume,
            "bottle configured"
        );
        let message = if bottle.used {
            format!(
                "bottle {} selected ({} bar, {} L)",
                index + 1,
                bottle.pressure,
                bottle.volume
            )
        } else {
            format!("bottle {} not used", index + 1)
        };
        self.record(LogLevel::Info, message);
        Ok(())
    }

    fn try_next_step(&mut self) -> core::result::Result<(), Rejection> {
        self.ensure_open()?;
        let step = self.state.step;
        if !self.can_proceed(step) {
            return Err(Rejection::GateClosed(step));
        }
        match step.next() {
            Some(next) => {
                self.state.step = next;
                tracing::info!(from = %step, to = %next, "step advanced");
                self.record(LogLevel::Info, format!("step {next}"));
            }
            None => {
                self.state.terminated = true;
                tracing::info!("procedure terminated");
                self.record(LogLevel::Success, "procedure terminated".to_string());
            }
        }
        Ok(())
    }

    fn try_previous_step(&mut self) -> core::result::Result<(), Rejection> {
        self.ensure_open()?;
        self.ensure_phase(Phase::Idle)?;
        let step = self.state.step;
        let prev = step.previous().ok_or(Rejection::AtFirstStep)?;
        self.state.step = prev;
        tracing::info!(from = %step, to = %prev, "step back");
        self.record(LogLevel::Info, format!("back to step {prev}"));
        Ok(())
    }

    fn try_start_generator(&mut self) -> core::result::Result<(), Rejection> {
        self.ensure_step(WizardStep::Generator)?;
        if self.state.generator.started {
            return Err(Rejection::AlreadyStarted);
        }
        let g = &mut self.state.generator;
        g.started = true;
        g.warmup_complete = false;
        g.operational = false;
        g.rpm = self.generator_cfg.idle_rpm;
        self.state.warmup.start(self.timing.warmup_s);
        tracing::info!(
            rpm = self.generator_cfg.idle_rpm,
            warmup_s = self.timing.warmup_s,
            "generator started"
        );
        self.record(
            LogLevel::Info,
            format!(
                "generator started at {} rpm, warm-up {} s",
                self.generator_cfg.idle_rpm, self.timing.warmup_s
            ),
        );
        Ok(())
    }

    fn try_set_generator_rpm(&mut self, rpm: u32) -> core::result::Result<(), Rejection> {
        self.ensure_step(WizardStep::Generator)?;
        let g = self.state.generator;
        if !g.started || !g.warmup_complete {
            return Err(Rejection::WarmupPending);
        }
        if !self.limits.ge_rpm.contains(f64::from(rpm)) {
            return Err(Rejection::OutOfLimits);
        }
        let operational = rpm >= self.generator_cfg.operating_rpm;
        self.state.generator.rpm = rpm;
        self.state.generator.operational = operational;
        tracing::info!(rpm, operational, "generator speed set");
        self.record(LogLevel::Info, format!("generator speed {rpm} rpm"));
        for w in validation::validate_generator_rpm(rpm, &self.limits).warnings {
            self.record(LogLevel::Warning, w);
        }
        Ok(())
    }

    fn ensure_lines_free(&self) -> core::result::Result<(), Rejection> {
        self.ensure_open()?;
        if self.state.phase.is_running() {
            return Err(Rejection::Interlocked);
        }
        Ok(())
    }

    fn try_set_valve(&mut self, valve: Valve, open: bool) -> core::result::Result<(), Rejection> {
        self.ensure_lines_free()?;
        self.state.valves.set(valve, open);
        tracing::info!(?valve, open, "valve toggled");
        let verb = if open { "opened" } else { "closed" };
        self.record(LogLevel::Info, format!("{valve:?} valve {verb}"));
        Ok(())
    }

    fn try_set_utility(&mut self, utility: Utility, on: bool) -> core::result::Result<(), Rejection> {
        self.ensure_lines_free()?;
        self.state.utilities.set(utility, on);
        tracing::info!(?utility, on, "utility toggled");
        let verb = if on { "on" } else { "off" };
        self.record(LogLevel::Info, format!("{utility:?} {verb}"));
        Ok(())
    }

    fn try_start_pressurization(&mut self) -> core::result::Result<(), Rejection> {
        self.ensure_step(WizardStep::Pressurization)?;
        self.ensure_phase(Phase::Idle)?;
        for step in [WizardStep::Generator, WizardStep::Utilities] {
            if !self.can_proceed(step) {
                return Err(Rejection::GateClosed(step));
            }
        }
        self.state.phase = Phase::Pressurizzazione;
        self.state.progress.set_target(100.0);
        tracing::info!(
            phase = %Phase::Pressurizzazione,
            duration_s = self.timing.pressurization_s,
            "pressurization started"
        );
        self.record(LogLevel::Info, "pressurization started".to_string());
        Ok(())
    }

    fn try_start_automatic(&mut self) -> core::result::Result<(), Rejection> {
        self.ensure_step(WizardStep::AutomaticProcess)?;
        self.ensure_phase(Phase::Pressurizzazione)?;
        if self.state.progress.value() < 100.0 {
            return Err(Rejection::GateClosed(WizardStep::Pressurization));
        }
        self.state.phase = Phase::Stasi;
        self.state.automatic.start(self.timing.automatic_s);
        tracing::info!(
            phase = %Phase::Stasi,
            duration_s = self.timing.automatic_s,
            "automatic process started"
        );
        self.record(
            LogLevel::Info,
            format!("automatic process started ({} s)", self.timing.automatic_s),
        );
        Ok(())
    }

    fn try_shutdown_generator(&mut self) -> core::result::Result<(), Rejection> {
        self.ensure_open()?;
        if !self.state.automatic_complete {
            return Err(Rejection::AutomaticPending);
        }
        self.ensure_phase(Phase::Stasi)?;
        let g = &mut self.state.generator;
        g.rpm = 0;
        g.started = false;
        g.warmup_complete = false;
        g.operational = false;
        self.state.generator_shutdown_done = true;
        self.state.phase = Phase::Checklist;
        tracing::info!(phase = %Phase::Checklist, "generator shut down");
        self.record(LogLevel::Info, "generator shut down".to_string());
        Ok(())
    }

    fn try_set_checklist_item(
        &mut self,
        item: ChecklistItem,
        done: bool,
    ) -> core::result::Result<(), Rejection> {
        self.ensure_open()?;
        self.ensure_phase(Phase::Checklist)?;
        self.state.checklist.set(item, done);
        tracing::info!(?item, done, "checklist item set");
        let mark = if done { "done" } else { "pending" };
        self.record(LogLevel::Info, format!("checklist {item:?} {mark}"));
        Ok(())
    }
}

fn settle(intent: &'static str, r: core::result::Result<(), Rejection>) -> Outcome {
    if let Err(why) = r {
        tracing::warn!(intent, rejection = %why, "intent ignored");
    }
    Outcome::from(r)
}
