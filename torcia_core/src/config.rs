//! Configuration types for the process session.
//!
//! These are the runtime configuration structs used by `ProcessSession`.
//! They are separate from the TOML-deserialized config in `torcia_config`,
//! but take their defaults from it through the `From` impls in `conversions`.

/// Inclusive `{min, max}` bounds for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitPair {
    pub min: f64,
    pub max: f64,
}

impl LimitPair {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        v.is_finite() && v >= self.min && v <= self.max
    }
}

/// Externally supplied limits, read-only to the validation rules.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsLimits {
    pub p0: LimitPair,
    pub p_finale: LimitPair,
    pub volume_prodotto: LimitPair,
    pub temperatura: LimitPair,
    pub riemp_perc: LimitPair,
    pub ge_rpm: LimitPair,
    pub warmup_time: LimitPair,
    pub timer_stasi: LimitPair,
    pub timer_dep: LimitPair,
    pub p_bombole: LimitPair,
}

impl Default for SettingsLimits {
    fn default() -> Self {
        (&torcia_config::Limits::default()).into()
    }
}

impl SettingsLimits {
    pub fn named(&self) -> [(&'static str, LimitPair); 10] {
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

/// Durations and ramp rates of the simulated process.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessTiming {
    /// Ramp tick period (ms). Default: 100.
    pub tick_ms: u64,
    /// Generator warm-up countdown (s).
    pub warmup_s: u32,
    /// The automatic shutdown sequence runs as one countdown of this length (s).
    pub automatic_s: u32,
    /// Progress 0 → 100 % takes this long (s).
    pub pressurization_s: u32,
    /// Max displayed tank pressure change per tick (bar).
    pub tank_display_step_bar: f64,
    /// Max displayed manifold pressure change per tick (bar).
    pub manifold_display_step_bar: f64,
}

impl Default for ProcessTiming {
    fn default() -> Self {
        (&torcia_config::ProcessCfg::default()).into()
    }
}

/// Generator speed set-points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorCfg {
    /// Speed set on start, held during warm-up.
    pub idle_rpm: u32,
    /// At or above this speed the generator counts as operational.
    pub operating_rpm: u32,
}

impl Default for GeneratorCfg {
    fn default() -> Self {
        (&torcia_config::GeneratorCfg::default()).into()
    }
}
