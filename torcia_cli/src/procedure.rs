//! Drives a `ProcessSession` through the nine steps the way an operator would.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde_json::json;
use torcia_config::Scenario;
use torcia_core::{
    BottleConfig, ChecklistItem, Outcome, ProcessSession, ProcessSnapshot, TankField, TorciaError,
    Utility, Valve, WizardStep,
};
use torcia_traits::Clock;

/// Extra virtual time granted on top of a countdown before giving up.
const WAIT_SLACK: Duration = Duration::from_secs(30);

/// One progress line, printed after each completed step.
pub struct StepLine {
    pub step: WizardStep,
    pub elapsed_ms: u64,
    pub snapshot: ProcessSnapshot,
}

fn blocked(step: WizardStep, reason: impl Into<String>) -> eyre::Report {
    eyre::Report::new(TorciaError::Blocked {
        step,
        reason: reason.into(),
    })
}

pub struct Driver<'a, C: Clock> {
    session: &'a mut ProcessSession,
    clock: &'a C,
    shutdown: &'a AtomicBool,
    epoch: std::time::Instant,
}

impl<'a, C: Clock> Driver<'a, C> {
    pub fn new(session: &'a mut ProcessSession, clock: &'a C, shutdown: &'a AtomicBool) -> Self {
        let epoch = clock.now();
        Self {
            session,
            clock,
            shutdown,
            epoch,
        }
    }

    fn apply(&mut self, intent: impl FnOnce(&mut ProcessSession) -> Outcome) -> eyre::Result<()> {
        let outcome = intent(&mut *self.session);
        self.require(outcome)
    }

    fn require(&self, outcome: Outcome) -> eyre::Result<()> {
        match outcome {
            Outcome::Applied => Ok(()),
            Outcome::Ignored(why) => {
                let step = self.session.state().current_step();
                let mut reason = why.to_string();
                let detail = self.session.blockers(step);
                if !detail.is_empty() {
                    reason = format!("{reason} ({})", detail.join("; "));
                }
                Err(blocked(step, reason))
            }
        }
    }

    /// Advance time on the ramp tick until `done` holds or `budget` runs out.
    fn wait_until(
        &mut self,
        what: &str,
        budget: Duration,
        done: impl Fn(&ProcessSession) -> bool,
    ) -> eyre::Result<()> {
        let tick = Duration::from_millis(self.session.timing().tick_ms);
        let start = self.clock.now();
        while !done(&*self.session) {
            if self.shutdown.load(Ordering::Relaxed) {
                return Err(eyre::Report::new(TorciaError::Aborted));
            }
            if self.clock.now().saturating_duration_since(start) > budget {
                let step = self.session.state().current_step();
                return Err(blocked(step, format!("timed out waiting for {what}")));
            }
            let before = self.clock.now();
            self.clock.sleep(tick);
            let elapsed = self.clock.now().saturating_duration_since(before);
            for event in self.session.advance(elapsed) {
                tracing::debug!(?event, "process event");
            }
        }
        Ok(())
    }

    fn next(&mut self, emit: &mut dyn FnMut(StepLine)) -> eyre::Result<()> {
        let step = self.session.state().current_step();
        self.apply(|s| s.next_step())?;
        emit(StepLine {
            step,
            elapsed_ms: self.clock.ms_since(self.epoch),
            snapshot: self.session.snapshot(),
        });
        Ok(())
    }

    /// Run steps 0 to 8; the session ends terminated on success.
    pub fn run(&mut self, scenario: &Scenario, emit: &mut dyn FnMut(StepLine)) -> eyre::Result<()> {
        self.enter_data(scenario, WizardStep::Checks, emit)?;
        self.next(emit)?;

        // Generator
        self.apply(|s| s.start_generator())?;
        let warmup = Duration::from_secs(u64::from(self.session.timing().warmup_s));
        self.wait_until("generator warm-up", warmup + WAIT_SLACK, |s| {
            s.state().generator().warmup_complete
        })?;
        let rpm = self.session.generator_cfg().operating_rpm;
        self.apply(|s| s.set_generator_rpm(rpm))?;
        self.next(emit)?;

        // Utilities
        for u in [Utility::Compressor, Utility::Torch, Utility::Instrumentation] {
            self.apply(|s| s.set_utility(u, true))?;
        }
        for v in [Valve::Manifold, Valve::TankInlet] {
            self.apply(|s| s.set_valve(v, true))?;
        }
        self.next(emit)?;

        // Pressurization
        self.apply(|s| s.start_pressurization())?;
        let ramp = Duration::from_secs(u64::from(self.session.timing().pressurization_s));
        self.wait_until("pressurization", ramp + WAIT_SLACK, |s| {
            s.can_proceed(WizardStep::Pressurization) && !s.state().has_pending_work()
        })?;
        self.next(emit)?;

        // Automatic process
        self.apply(|s| s.start_automatic())?;
        let auto = Duration::from_secs(u64::from(self.session.timing().automatic_s));
        self.wait_until("automatic process", auto + WAIT_SLACK, |s| {
            s.state().automatic_complete()
        })?;
        self.apply(|s| s.shutdown_generator())?;
        self.next(emit)?;

        // Save
        for item in ChecklistItem::ALL {
            self.apply(|s| s.set_checklist_item(item, true))?;
        }
        self.next(emit)
    }

    /// Enter scenario data and advance through the data-entry steps, stopping
    /// on `last` (its gate is left to the caller).
    pub fn enter_data(
        &mut self,
        scenario: &Scenario,
        last: WizardStep,
        emit: &mut dyn FnMut(StepLine),
    ) -> eyre::Result<()> {
        let t = &scenario.tank;
        for (field, value) in [
            (TankField::P0, t.p0),
            (TankField::VolumeProdotto, t.volume_prodotto),
            (TankField::Temperatura, t.temperatura),
            (TankField::RiempPerc, t.riemp_perc),
        ] {
            self.apply(|s| s.set_tank_field(field, value))?;
        }
        if last == WizardStep::TankData {
            return Ok(());
        }
        self.next(emit)?;

        self.apply(|s| s.set_tank_field(TankField::PFinale, t.p_finale))?;
        if last == WizardStep::TargetPressure {
            return Ok(());
        }
        self.next(emit)?;

        let slots = scenario.bottle_slots();
        for (i, b) in slots.iter().enumerate() {
            self.apply(|s| s.set_bottle(i, BottleConfig::from(b)))?;
        }
        if last == WizardStep::BottleSelection {
            return Ok(());
        }
        self.next(emit)
    }
}

/// Render a step line as text or JSON.
pub fn format_step(line: &StepLine, as_json: bool) -> String {
    let snap = &line.snapshot;
    if as_json {
        json!({
            "step": line.step.index(),
            "name": line.step.name(),
            "phase": snap.phase,
            "progress": snap.progress,
            "P_serb": snap.p_serb,
            "P_bombole": snap.p_bombole,
            "elapsed_ms": line.elapsed_ms,
        })
        .to_string()
    } else {
        format!(
            "step {} done  phase={} progress={:.0}% P_serb={:.2} bar P_bombole={:.1} bar  t={:.1}s",
            line.step,
            snap.phase,
            snap.progress,
            snap.p_serb,
            snap.p_bombole,
            line.elapsed_ms as f64 / 1000.0
        )
    }
}
