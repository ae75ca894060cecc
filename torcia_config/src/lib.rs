#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config and scenario schemas for the pressurization trainer.
//!
//! - `Config` and its tables are deserialized from TOML and validated.
//! - `Scenario` carries the operator inputs (tank data, bottles) used by the
//!   headless console; its values are checked by the core validation rules,
//!   not here.
use serde::Deserialize;

/// Inclusive `{ min, max }` pair for one tunable parameter.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Limit {
    pub min: f64,
    pub max: f64,
}

impl Limit {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// The fixed set of named limits edited through the settings panel.
///
/// Keys keep the names used by the panel and by the exported report.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Limits {
    #[serde(rename = "P0")]
    pub p0: Limit,
    #[serde(rename = "Pfinale")]
    pub p_finale: Limit,
    #[serde(rename = "volumeProdotto")]
    pub volume_prodotto: Limit,
    pub temperatura: Limit,
    #[serde(rename = "riempPerc")]
    pub riemp_perc: Limit,
    #[serde(rename = "geRpm")]
    pub ge_rpm: Limit,
    #[serde(rename = "warmupTime")]
    pub warmup_time: Limit,
    #[serde(rename = "timerStasi")]
    pub timer_stasi: Limit,
    #[serde(rename = "timerDep")]
    pub timer_dep: Limit,
    #[serde(rename = "P_bombole")]
    pub p_bombole: Limit,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            p0: Limit::new(0.1, 10.0),
            p_finale: Limit::new(1.0, 25.0),
            volume_prodotto: Limit::new(1.0, 100_000.0),
            temperatura: Limit::new(-30.0, 60.0),
            riemp_perc: Limit::new(0.0, 100.0),
            ge_rpm: Limit::new(0.0, 3600.0),
            warmup_time: Limit::new(5.0, 600.0),
            timer_stasi: Limit::new(5.0, 600.0),
            timer_dep: Limit::new(5.0, 600.0),
            p_bombole: Limit::new(10.0, 300.0),
        }
    }
}

impl Limits {
    /// All pairs with their TOML key, in declaration order.
    pub fn named(&self) -> [(&'static str, Limit); 10] {
        [
            ("P0", self.p0),
            ("Pfinale", self.p_finale),
            ("volumeProdotto", self.volume_prodotto),
            ("temperatura", self.temperatura),
            ("riempPerc", self.riemp_perc),
            ("geRpm", self.ge_rpm),
            ("warmupTime", self.warmup_time),
            ("timerStasi", self.timer_stasi),
            ("timerDep", self.timer_dep),
            ("P_bombole", self.p_bombole),
        ]
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProcessCfg {
    /// Ramp tick period in milliseconds
    pub tick_ms: u64,
    /// Generator warm-up countdown (s); must lie inside `limits.warmupTime`
    pub warmup_s: u32,
    /// Single countdown covering the whole automatic shutdown sequence (s)
    pub automatic_s: u32,
    /// Time for the pressurization progress to go from 0 to 100 % (s)
    pub pressurization_s: u32,
    /// Max change of the displayed tank pressure per tick (bar)
    pub tank_display_step_bar: f64,
    /// Max change of the displayed manifold pressure per tick (bar)
    pub manifold_display_step_bar: f64,
}

impl Default for ProcessCfg {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            warmup_s: 30,
            automatic_s: 30,
            pressurization_s: 20,
            tank_display_step_bar: 0.5,
            manifold_display_step_bar: 10.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeneratorCfg {
    pub idle_rpm: u32,
    pub operating_rpm: u32,
}

impl Default for GeneratorCfg {
    fn default() -> Self {
        Self {
            idle_rpm: 1500,
            operating_rpm: 3000,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub limits: Limits,
    pub process: ProcessCfg,
    pub generator: GeneratorCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Limits
        for (name, l) in self.limits.named() {
            if !l.min.is_finite() || !l.max.is_finite() {
                eyre::bail!("limits.{name} bounds must be finite");
            }
            if l.min > l.max {
                eyre::bail!("limits.{name}.min must be <= limits.{name}.max");
            }
        }

        // Process
        if self.process.tick_ms == 0 {
            eyre::bail!("process.tick_ms must be >= 1");
        }
        if self.process.tick_ms > 1000 {
            eyre::bail!("process.tick_ms must be <= 1000");
        }
        if self.process.warmup_s == 0 {
            eyre::bail!("process.warmup_s must be >= 1");
        }
        let warmup = f64::from(self.process.warmup_s);
        if warmup < self.limits.warmup_time.min || warmup > self.limits.warmup_time.max {
            eyre::bail!("process.warmup_s must lie inside limits.warmupTime");
        }
        if self.process.automatic_s == 0 {
            eyre::bail!("process.automatic_s must be >= 1");
        }
        if self.process.pressurization_s == 0 {
            eyre::bail!("process.pressurization_s must be >= 1");
        }
        if !(self.process.tank_display_step_bar > 0.0) {
            eyre::bail!("process.tank_display_step_bar must be > 0");
        }
        if !(self.process.manifold_display_step_bar > 0.0) {
            eyre::bail!("process.manifold_display_step_bar must be > 0");
        }

        // Generator
        if self.generator.idle_rpm >= self.generator.operating_rpm {
            eyre::bail!("generator.idle_rpm must be < generator.operating_rpm");
        }
        let op = f64::from(self.generator.operating_rpm);
        if op < self.limits.ge_rpm.min || op > self.limits.ge_rpm.max {
            eyre::bail!("generator.operating_rpm must lie inside limits.geRpm");
        }

        // Logging
        if let Some(r) = self.logging.rotation.as_deref()
            && !matches!(r, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}

/// Tank data as typed by the operator; absent keys stay unset.
#[derive(Debug, Deserialize, Default, Clone, Copy)]
#[serde(default)]
pub struct TankInput {
    #[serde(rename = "P0")]
    pub p0: Option<f64>,
    #[serde(rename = "Pfinale")]
    pub p_finale: Option<f64>,
    #[serde(rename = "volumeProdotto")]
    pub volume_prodotto: Option<f64>,
    pub temperatura: Option<f64>,
    #[serde(rename = "riempPerc")]
    pub riemp_perc: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct BottleInput {
    pub used: bool,
    /// bar
    pub pressure: f64,
    /// litres
    pub volume: f64,
}

impl Default for BottleInput {
    fn default() -> Self {
        Self {
            used: false,
            pressure: 200.0,
            volume: 50.0,
        }
    }
}

/// Maximum number of bottles in the pack.
pub const BOTTLE_SLOTS: usize = 3;

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Scenario {
    pub tank: TankInput,
    pub bottles: Vec<BottleInput>,
}

pub fn load_scenario_toml(s: &str) -> Result<Scenario, toml::de::Error> {
    toml::from_str::<Scenario>(s)
}

impl Scenario {
    pub fn validate(&self) -> eyre::Result<()> {
        if self.bottles.len() > BOTTLE_SLOTS {
            eyre::bail!(
                "scenario lists {} bottles, the pack holds {BOTTLE_SLOTS}",
                self.bottles.len()
            );
        }
        Ok(())
    }

    /// Bottles padded to the pack size with unused defaults.
    pub fn bottle_slots(&self) -> [BottleInput; BOTTLE_SLOTS] {
        let mut out = [BottleInput::default(); BOTTLE_SLOTS];
        for (slot, b) in out.iter_mut().zip(self.bottles.iter()) {
            *slot = *b;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_valid_defaults() {
        let cfg = load_toml("").expect("parse empty TOML");
        cfg.validate().expect("defaults must validate");
        assert_eq!(cfg.process.tick_ms, 100);
        assert_eq!(cfg.generator.operating_rpm, 3000);
    }

    #[test]
    fn short_bottle_list_is_padded_with_unused_slots() {
        let sc = Scenario {
            bottles: vec![BottleInput {
                used: true,
                pressure: 180.0,
                volume: 50.0,
            }],
            ..Scenario::default()
        };
        let slots = sc.bottle_slots();
        assert!(slots[0].used);
        assert!(!slots[1].used && !slots[2].used);
    }
}
