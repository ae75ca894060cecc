//! Parameter validation rules.
//!
//! Pure functions from (values, limits) to a [`ValidationReport`]. Rules never
//! fail: blocking problems go to `errors`, advisory ones to `warnings`.

use serde::Serialize;

use crate::config::{LimitPair, SettingsLimits};
use crate::types::{BottleConfig, TankParameters};

/// Fill levels outside this band only raise a warning (%).
pub const FILL_ADVISORY_BAND: (f64, f64) = (20.0, 85.0);
/// A pressure rise `Pfinale - P0` outside this band only raises a warning (bar).
pub const DELTA_ADVISORY_BAND: (f64, f64) = (2.0, 20.0);
/// Bottles below this pressure are flagged (bar).
pub const BOTTLE_LOW_PRESSURE_BAR: f64 = 150.0;
/// Bottles below this volume are flagged (L).
pub const BOTTLE_LOW_VOLUME_L: f64 = 30.0;
/// Generator speeds outside this band are flagged (rpm).
pub const RPM_ADVISORY_BAND: (f64, f64) = (1500.0, 3200.0);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl ValidationReport {
    fn error(&mut self, msg: String) {
        self.is_valid = false;
        self.errors.push(msg);
    }

    fn warn(&mut self, msg: String) {
        self.warnings.push(msg);
    }

    /// Fold another report into this one.
    pub fn merge(mut self, other: ValidationReport) -> Self {
        self.is_valid &= other.is_valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self
    }

    /// Range check for an optional field; unset counts as a blocking error.
    fn require_in(&mut self, label: &str, value: Option<f64>, limits: LimitPair, unit: &str) {
        match value {
            None => self.error(format!("{label} is required")),
            Some(v) if !limits.contains(v) => self.error(format!(
                "{label} must be between {} and {} {unit}",
                limits.min, limits.max
            )),
            Some(_) => {}
        }
    }
}

pub fn validate_tank(tank: &TankParameters, limits: &SettingsLimits) -> ValidationReport {
    let mut r = ValidationReport::default();

    match tank.p0 {
        Some(p0) if p0 <= 0.0 => r.error("P0 must be greater than 0 bar".to_string()),
        p0 => r.require_in("P0", p0, limits.p0, "bar"),
    }
    r.require_in("volumeProdotto", tank.volume_prodotto, limits.volume_prodotto, "L");
    r.require_in("temperatura", tank.temperatura, limits.temperatura, "°C");
    r.require_in("riempPerc", tank.riemp_perc, limits.riemp_perc, "%");

    if let Some(fill) = tank.riemp_perc {
        let (low, high) = FILL_ADVISORY_BAND;
        if fill < low {
            r.warn(format!("fill level {fill}% is below {low}%"));
        } else if fill > high {
            r.warn(format!("fill level {fill}% is above {high}%"));
        }
    }
    r
}

pub fn validate_pressure_target(
    tank: &TankParameters,
    limits: &SettingsLimits,
) -> ValidationReport {
    let mut r = ValidationReport::default();

    let Some(p_finale) = tank.p_finale else {
        r.error("Pfinale is required".to_string());
        return r;
    };
    match tank.p0 {
        None => r.error("P0 must be set before the target pressure".to_string()),
        Some(p0) if p_finale <= p0 => {
            r.error(format!("Pfinale must be greater than P0 ({p0} bar)"));
        }
        Some(p0) => {
            let delta = p_finale - p0;
            let (low, high) = DELTA_ADVISORY_BAND;
            if delta < low || delta > high {
                r.warn(format!(
                    "pressure rise of {delta} bar is outside the usual {low}-{high} bar"
                ));
            }
        }
    }
    r.require_in("Pfinale", Some(p_finale), limits.p_finale, "bar");
    r
}

pub fn validate_bottles(bottles: &[BottleConfig], limits: &SettingsLimits) -> ValidationReport {
    let mut r = ValidationReport::default();

    if !bottles.iter().any(|b| b.used) {
        r.error("select at least one bottle".to_string());
        return r;
    }
    for (i, b) in bottles.iter().enumerate().filter(|(_, b)| b.used) {
        let n = i + 1;
        r.require_in(
            &format!("bottle {n} pressure"),
            Some(b.pressure),
            limits.p_bombole,
            "bar",
        );
        if !(b.volume.is_finite() && b.volume > 0.0) {
            r.error(format!("bottle {n} volume must be greater than 0 L"));
        }
        if b.pressure < BOTTLE_LOW_PRESSURE_BAR {
            r.warn(format!(
                "bottle {n} pressure {} bar is below {BOTTLE_LOW_PRESSURE_BAR} bar",
                b.pressure
            ));
        }
        if b.volume < BOTTLE_LOW_VOLUME_L {
            r.warn(format!(
                "bottle {n} volume {} L is below {BOTTLE_LOW_VOLUME_L} L",
                b.volume
            ));
        }
    }
    r
}

pub fn validate_generator_rpm(rpm: u32, limits: &SettingsLimits) -> ValidationReport {
    let mut r = ValidationReport::default();
    let rpm = f64::from(rpm);
    r.require_in("generator speed", Some(rpm), limits.ge_rpm, "rpm");
    let (low, high) = RPM_ADVISORY_BAND;
    if rpm < low || rpm > high {
        r.warn(format!("generator speed {rpm} rpm is outside {low}-{high} rpm"));
    }
    r
}

/// Everything the Checks step reviews before the generator may start.
pub fn validate_setup(
    tank: &TankParameters,
    bottles: &[BottleConfig],
    limits: &SettingsLimits,
) -> ValidationReport {
    validate_tank(tank, limits)
        .merge(validate_pressure_target(tank, limits))
        .merge(validate_bottles(bottles, limits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tank(p0: f64, p_finale: f64, fill: f64) -> TankParameters {
        TankParameters {
            p0: Some(p0),
            p_finale: Some(p_finale),
            volume_prodotto: Some(500.0),
            temperatura: Some(20.0),
            riemp_perc: Some(fill),
        }
    }

    fn bottle(pressure: f64, volume: f64) -> BottleConfig {
        BottleConfig {
            used: true,
            pressure,
            volume,
        }
    }

    #[track_caller]
    fn assert_report(r: &ValidationReport, error: Option<&str>, warning: Option<&str>) {
        assert_eq!(r.is_valid, error.is_none(), "{r:?}");
        match error {
            Some(needle) => assert!(r.errors.iter().any(|e| e.contains(needle)), "{r:?}"),
            None => assert!(r.errors.is_empty(), "{r:?}"),
        }
        match warning {
            Some(needle) => assert!(r.warnings.iter().any(|w| w.contains(needle)), "{r:?}"),
            None => assert!(r.warnings.is_empty(), "{r:?}"),
        }
    }

    #[rstest]
    #[case::nominal(60.0, None, None)]
    #[case::low_fill(10.0, None, Some("below 20%"))]
    #[case::high_fill(90.0, None, Some("above 85%"))]
    #[case::band_edges_are_quiet(20.0, None, None)]
    #[case::over_limit(150.0, Some("riempPerc must be between 0 and 100 %"), Some("above 85%"))]
    #[case::under_limit(-1.0, Some("riempPerc must be between"), Some("below 20%"))]
    fn tank_fill_rules(
        #[case] fill: f64,
        #[case] error: Option<&str>,
        #[case] warning: Option<&str>,
    ) {
        let r = validate_tank(&tank(1.0, 12.0, fill), &SettingsLimits::default());
        assert_report(&r, error, warning);
    }

    #[rstest]
    #[case::zero_p0(0.0, Some("P0 must be greater than 0 bar"))]
    #[case::negative_p0(-2.0, Some("P0 must be greater than 0 bar"))]
    #[case::p0_over_limit(11.0, Some("P0 must be between 0.1 and 10 bar"))]
    #[case::p0_in_range(1.0, None)]
    fn tank_p0_rules(#[case] p0: f64, #[case] error: Option<&str>) {
        let r = validate_tank(&tank(p0, 12.0, 60.0), &SettingsLimits::default());
        assert_report(&r, error, None);
    }

    #[test]
    fn unset_tank_fields_are_required() {
        let r = validate_tank(&TankParameters::default(), &SettingsLimits::default());
        assert!(!r.is_valid);
        for label in ["P0", "volumeProdotto", "temperatura", "riempPerc"] {
            let msg = format!("{label} is required");
            assert!(r.errors.contains(&msg), "missing {msg:?} in {r:?}");
        }
        assert!(r.warnings.is_empty());
    }

    #[rstest]
    #[case::nominal(1.0, 12.0, None, None)]
    #[case::small_rise(1.0, 1.5, None, Some("pressure rise of 0.5 bar"))]
    #[case::large_rise(1.0, 22.0, None, Some("pressure rise of 21 bar"))]
    #[case::not_above_p0(5.0, 5.0, Some("Pfinale must be greater than P0 (5 bar)"), None)]
    #[case::over_limit(5.0, 30.0, Some("Pfinale must be between 1 and 25 bar"), Some("pressure rise of 25 bar"))]
    fn pressure_target_rules(
        #[case] p0: f64,
        #[case] p_finale: f64,
        #[case] error: Option<&str>,
        #[case] warning: Option<&str>,
    ) {
        let r = validate_pressure_target(&tank(p0, p_finale, 60.0), &SettingsLimits::default());
        assert_report(&r, error, warning);
    }

    #[test]
    fn pressure_target_needs_both_pressures() {
        let limits = SettingsLimits::default();
        let mut t = tank(1.0, 12.0, 60.0);
        t.p_finale = None;
        assert_report(
            &validate_pressure_target(&t, &limits),
            Some("Pfinale is required"),
            None,
        );
        let mut t = tank(1.0, 12.0, 60.0);
        t.p0 = None;
        assert_report(
            &validate_pressure_target(&t, &limits),
            Some("P0 must be set before the target pressure"),
            None,
        );
    }

    #[rstest]
    #[case::nominal(180.0, 50.0, None, None)]
    #[case::low_pressure(100.0, 50.0, None, Some("bottle 1 pressure 100 bar is below 150 bar"))]
    #[case::low_volume(180.0, 20.0, None, Some("bottle 1 volume 20 L is below 30 L"))]
    #[case::over_limit(400.0, 50.0, Some("bottle 1 pressure must be between 10 and 300 bar"), None)]
    #[case::empty_volume(180.0, 0.0, Some("bottle 1 volume must be greater than 0 L"), Some("below 30 L"))]
    fn bottle_rules(
        #[case] pressure: f64,
        #[case] volume: f64,
        #[case] error: Option<&str>,
        #[case] warning: Option<&str>,
    ) {
        let bottles = [bottle(pressure, volume), BottleConfig::default()];
        let r = validate_bottles(&bottles, &SettingsLimits::default());
        assert_report(&r, error, warning);
    }

    #[test]
    fn unused_bottles_are_not_checked() {
        let idle = BottleConfig {
            used: false,
            pressure: 1.0,
            volume: 0.0,
        };
        let limits = SettingsLimits::default();
        assert_report(
            &validate_bottles(&[idle, idle], &limits),
            Some("select at least one bottle"),
            None,
        );
        let r = validate_bottles(&[idle, bottle(180.0, 50.0)], &limits);
        assert_report(&r, None, None);
    }

    #[rstest]
    #[case::operating(3000, None, None)]
    #[case::slow(1000, None, Some("generator speed 1000 rpm is outside 1500-3200 rpm"))]
    #[case::fast(3400, None, Some("outside 1500-3200 rpm"))]
    #[case::over_limit(4000, Some("generator speed must be between 0 and 3600 rpm"), Some("outside"))]
    fn generator_rpm_rules(
        #[case] rpm: u32,
        #[case] error: Option<&str>,
        #[case] warning: Option<&str>,
    ) {
        let r = validate_generator_rpm(rpm, &SettingsLimits::default());
        assert_report(&r, error, warning);
    }

    #[test]
    fn setup_merges_every_report() {
        let limits = SettingsLimits::default();
        let ok = validate_setup(&tank(1.0, 12.0, 60.0), &[bottle(180.0, 50.0)], &limits);
        assert_report(&ok, None, None);

        let r = validate_setup(&tank(1.0, 12.0, 10.0), &[bottle(400.0, 20.0)], &limits);
        assert!(!r.is_valid);
        assert_eq!(r.errors.len(), 1, "{r:?}");
        assert_eq!(r.warnings.len(), 2, "{r:?}");
    }
}
