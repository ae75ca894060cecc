//! Per-step completion predicates gating forward navigation.
//!
//! One table row per wizard step; each predicate is pure and can be tested
//! without a session.

use crate::config::SettingsLimits;
use crate::phase::WizardStep;
use crate::state::ProcessState;
use crate::validation::{
    validate_bottles, validate_pressure_target, validate_setup, validate_tank,
};

pub type GateFn = fn(&ProcessState, &SettingsLimits) -> bool;

#[derive(Clone, Copy)]
pub struct StepGate {
    pub step: WizardStep,
    pub predicate: GateFn,
}

pub const STEP_GATES: [StepGate; WizardStep::COUNT] = [
    StepGate {
        step: WizardStep::TankData,
        predicate: tank_data_entered,
    },
    StepGate {
        step: WizardStep::TargetPressure,
        predicate: target_above_initial,
    },
    StepGate {
        step: WizardStep::BottleSelection,
        predicate: bottle_selected,
    },
    StepGate {
        step: WizardStep::Checks,
        predicate: setup_valid,
    },
    StepGate {
        step: WizardStep::Generator,
        predicate: generator_operational,
    },
    StepGate {
        step: WizardStep::Utilities,
        predicate: utilities_ready,
    },
    StepGate {
        step: WizardStep::Pressurization,
        predicate: pressurization_done,
    },
    StepGate {
        step: WizardStep::AutomaticProcess,
        predicate: automatic_done,
    },
    StepGate {
        step: WizardStep::Save,
        predicate: checklist_done,
    },
];

/// Whether the operator may continue past `step`. No side effects.
pub fn can_proceed(step: WizardStep, state: &ProcessState, limits: &SettingsLimits) -> bool {
    (STEP_GATES[step.index()].predicate)(state, limits)
}

fn positive(v: Option<f64>) -> bool {
    v.is_some_and(|v| v > 0.0)
}

fn tank_data_entered(s: &ProcessState, _: &SettingsLimits) -> bool {
    positive(s.tank.p0)
        && positive(s.tank.volume_prodotto)
        && s.tank.temperatura.is_some()
        && positive(s.tank.riemp_perc)
}

fn target_above_initial(s: &ProcessState, _: &SettingsLimits) -> bool {
    matches!((s.tank.p_finale, s.tank.p0), (Some(pf), Some(p0)) if pf > p0)
}

fn bottle_selected(s: &ProcessState, _: &SettingsLimits) -> bool {
    s.bottles.iter().any(|b| b.used)
}

fn setup_valid(s: &ProcessState, limits: &SettingsLimits) -> bool {
    validate_setup(&s.tank, &s.bottles, limits).is_valid
}

fn generator_operational(s: &ProcessState, _: &SettingsLimits) -> bool {
    let g = &s.generator;
    g.started && g.warmup_complete && g.operational
}

fn utilities_ready(s: &ProcessState, _: &SettingsLimits) -> bool {
    s.utilities.all_on() && s.valves.all_open()
}

fn pressurization_done(s: &ProcessState, _: &SettingsLimits) -> bool {
    s.progress.value() >= 100.0
}

fn automatic_done(s: &ProcessState, _: &SettingsLimits) -> bool {
    s.automatic_complete && s.generator_shutdown_done
}

fn checklist_done(s: &ProcessState, _: &SettingsLimits) -> bool {
    s.checklist.is_complete()
}

/// Human-readable reasons why `step` is still closed; empty when it is open.
pub fn blockers(step: WizardStep, state: &ProcessState, limits: &SettingsLimits) -> Vec<String> {
    if can_proceed(step, state, limits) {
        return Vec::new();
    }
    let mut out = match step {
        WizardStep::TankData => validate_tank(&state.tank, limits).errors,
        WizardStep::TargetPressure => validate_pressure_target(&state.tank, limits).errors,
        WizardStep::BottleSelection => validate_bottles(&state.bottles, limits).errors,
        WizardStep::Checks => validate_setup(&state.tank, &state.bottles, limits).errors,
        WizardStep::Generator => {
            let g = &state.generator;
            let mut out = Vec::new();
            if !g.started {
                out.push("generator not started".to_string());
            } else if !g.warmup_complete {
                out.push(format!(
                    "generator warming up ({} s left)",
                    state.warmup.remaining_s()
                ));
            } else if !g.operational {
                out.push("generator not at operating speed".to_string());
            }
            out
        }
        WizardStep::Utilities => {
            let mut out = Vec::new();
            if !state.utilities.all_on() {
                out.push("switch on every utility".to_string());
            }
            if !state.valves.all_open() {
                out.push("open the manifold and tank inlet valves".to_string());
            }
            out
        }
        WizardStep::Pressurization => {
            vec![format!("pressurization at {:.0}%", state.progress.value())]
        }
        WizardStep::AutomaticProcess => {
            if state.automatic_complete {
                vec!["shut down the generator".to_string()]
            } else {
                vec!["automatic process still running".to_string()]
            }
        }
        WizardStep::Save => vec!["complete the checklist".to_string()],
    };
    if out.is_empty() {
        out.push(format!("step {step} is not complete"));
    }
    out
}
