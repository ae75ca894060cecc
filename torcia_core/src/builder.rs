//! Builder for `ProcessSession`.
//!
//! Every setting has a default; `build()` validates the combination and
//! returns `BuildError` wrapped in an `eyre::Report` when it is unusable.

use torcia_traits::{SystemWallClock, WallClock};

use crate::config::{GeneratorCfg, ProcessTiming, SettingsLimits};
use crate::error::{BuildError, Result};
use crate::session::ProcessSession;
use crate::state::ProcessState;
use crate::util::MILLIS_PER_SEC;

#[derive(Default)]
pub struct SessionBuilder {
    limits: Option<SettingsLimits>,
    timing: Option<ProcessTiming>,
    generator: Option<GeneratorCfg>,
    wall: Option<Box<dyn WallClock + Send + Sync>>,
}

impl core::fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("limits", &self.limits)
            .field("timing", &self.timing)
            .field("generator", &self.generator)
            .field("wall", &self.wall.as_ref().map(|_| "custom"))
            .finish()
    }
}

impl SessionBuilder {
    pub fn with_limits(mut self, limits: SettingsLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn with_timing(mut self, timing: ProcessTiming) -> Self {
        self.timing = Some(timing);
        self
    }

    pub fn with_generator(mut self, generator: GeneratorCfg) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Inject the clock used to stamp log entries and reports.
    pub fn with_wall_clock(mut self, wall: impl WallClock + Send + Sync + 'static) -> Self {
        self.wall = Some(Box::new(wall));
        self
    }

    /// Take limits, timing and generator set-points from a loaded config.
    pub fn apply_config(self, cfg: &torcia_config::Config) -> Self {
        self.with_limits((&cfg.limits).into())
            .with_timing((&cfg.process).into())
            .with_generator((&cfg.generator).into())
    }

    pub fn build(self) -> Result<ProcessSession> {
        let limits = self.limits.unwrap_or_default();
        let timing = self.timing.unwrap_or_default();
        let generator_cfg = self.generator.unwrap_or_default();

        validate(&limits, &timing, &generator_cfg).map_err(eyre::Report::new)?;

        let state = ProcessState::new(&timing);
        Ok(ProcessSession {
            state,
            limits,
            timing,
            generator_cfg,
            wall: self.wall.unwrap_or_else(|| Box::new(SystemWallClock)),
            pending_ms: 0,
        })
    }
}

fn validate(
    limits: &SettingsLimits,
    timing: &ProcessTiming,
    generator: &GeneratorCfg,
) -> core::result::Result<(), BuildError> {
    for (name, pair) in limits.named() {
        if !pair.min.is_finite() || !pair.max.is_finite() {
            return Err(BuildError::InvalidLimit {
                name,
                reason: "bounds must be finite",
            });
        }
        if pair.min > pair.max {
            return Err(BuildError::InvalidLimit {
                name,
                reason: "min must be <= max",
            });
        }
    }

    if timing.tick_ms == 0 || timing.tick_ms > MILLIS_PER_SEC {
        return Err(BuildError::InvalidConfig("tick_ms must be in 1..=1000"));
    }
    if timing.warmup_s == 0 || timing.automatic_s == 0 || timing.pressurization_s == 0 {
        return Err(BuildError::InvalidConfig("durations must be >= 1 s"));
    }
    if !limits.warmup_time.contains(f64::from(timing.warmup_s)) {
        return Err(BuildError::InvalidConfig(
            "warmup_s must lie inside the warmupTime limits",
        ));
    }
    for step in [timing.tank_display_step_bar, timing.manifold_display_step_bar] {
        if !step.is_finite() || step <= 0.0 {
            return Err(BuildError::InvalidConfig("display steps must be > 0"));
        }
    }

    if generator.idle_rpm >= generator.operating_rpm {
        return Err(BuildError::InvalidConfig(
            "idle_rpm must be below operating_rpm",
        ));
    }
    if !limits.ge_rpm.contains(f64::from(generator.operating_rpm)) {
        return Err(BuildError::InvalidConfig(
            "operating_rpm must lie inside the geRpm limits",
        ));
    }
    Ok(())
}
