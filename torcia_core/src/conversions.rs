//! `From` implementations bridging `torcia_config` types to `torcia_core` types.

use crate::config::{GeneratorCfg, LimitPair, ProcessTiming, SettingsLimits};
use crate::types::BottleConfig;

// ── Limits ───────────────────────────────────────────────────────────────────

impl From<torcia_config::Limit> for LimitPair {
    fn from(l: torcia_config::Limit) -> Self {
        Self::new(l.min, l.max)
    }
}

impl From<&torcia_config::Limits> for SettingsLimits {
    fn from(c: &torcia_config::Limits) -> Self {
        Self {
            p0: c.p0.into(),
            p_finale: c.p_finale.into(),
            volume_prodotto: c.volume_prodotto.into(),
            temperatura: c.temperatura.into(),
            riemp_perc: c.riemp_perc.into(),
            ge_rpm: c.ge_rpm.into(),
            warmup_time: c.warmup_time.into(),
            timer_stasi: c.timer_stasi.into(),
            timer_dep: c.timer_dep.into(),
            p_bombole: c.p_bombole.into(),
        }
    }
}

// ── ProcessTiming ────────────────────────────────────────────────────────────

impl From<&torcia_config::ProcessCfg> for ProcessTiming {
    fn from(c: &torcia_config::ProcessCfg) -> Self {
        Self {
            tick_ms: c.tick_ms,
            warmup_s: c.warmup_s,
            automatic_s: c.automatic_s,
            pressurization_s: c.pressurization_s,
            tank_display_step_bar: c.tank_display_step_bar,
            manifold_display_step_bar: c.manifold_display_step_bar,
        }
    }
}

// ── GeneratorCfg ─────────────────────────────────────────────────────────────

impl From<&torcia_config::GeneratorCfg> for GeneratorCfg {
    fn from(c: &torcia_config::GeneratorCfg) -> Self {
        Self {
            idle_rpm: c.idle_rpm,
            operating_rpm: c.operating_rpm,
        }
    }
}

// ── Scenario inputs ──────────────────────────────────────────────────────────

impl From<&torcia_config::BottleInput> for BottleConfig {
    fn from(b: &torcia_config::BottleInput) -> Self {
        Self {
            used: b.used,
            pressure: b.pressure,
            volume: b.volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_defaults_follow_config_defaults() {
        let limits = SettingsLimits::default();
        assert_eq!(limits.p0, LimitPair::new(0.1, 10.0));
        assert_eq!(limits.ge_rpm, LimitPair::new(0.0, 3600.0));
        assert_eq!(limits.p_bombole, LimitPair::new(10.0, 300.0));
        let config_keys = torcia_config::Limits::default()
            .named()
            .map(|(k, l)| (k, l.min, l.max));
        let core_keys = limits.named().map(|(k, l)| (k, l.min, l.max));
        assert_eq!(core_keys, config_keys);

        let timing = ProcessTiming::default();
        assert_eq!(timing.tick_ms, 100);
        assert_eq!(timing.warmup_s, 30);
        assert_eq!(timing.pressurization_s, 20);
        assert_eq!(
            GeneratorCfg::default(),
            GeneratorCfg {
                idle_rpm: 1500,
                operating_rpm: 3000,
            }
        );
    }
}
