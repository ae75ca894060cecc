#![allow(dead_code)]

use std::time::Duration;

use chrono::{DateTime, Utc};
use torcia_core::{
    BottleConfig, ChecklistItem, Outcome, ProcessSession, TankField, Utility, Valve, WizardStep,
};
use torcia_traits::FixedWallClock;

pub fn noon() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-05-04T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn session() -> ProcessSession {
    ProcessSession::builder()
        .with_wall_clock(FixedWallClock(noon()))
        .build()
        .unwrap()
}

#[track_caller]
pub fn applied(o: Outcome) {
    assert_eq!(o, Outcome::Applied);
}

/// P0=1, Pfinale=12, 500 L, 20 °C, 60 %, one bottle at 180 bar / 50 L.
pub fn enter_reference_data(s: &mut ProcessSession) {
    applied(s.set_tank_field(TankField::P0, Some(1.0)));
    applied(s.set_tank_field(TankField::VolumeProdotto, Some(500.0)));
    applied(s.set_tank_field(TankField::Temperatura, Some(20.0)));
    applied(s.set_tank_field(TankField::RiempPerc, Some(60.0)));
    assert!(s.can_proceed(WizardStep::TankData));
    applied(s.next_step());
    applied(s.set_tank_field(TankField::PFinale, Some(12.0)));
    assert!(s.can_proceed(WizardStep::TargetPressure));
    applied(s.next_step());
    applied(s.set_bottle(
        0,
        BottleConfig {
            used: true,
            pressure: 180.0,
            volume: 50.0,
        },
    ));
    assert!(s.can_proceed(WizardStep::BottleSelection));
    applied(s.next_step());
    applied(s.next_step());
    assert_eq!(s.state().current_step(), WizardStep::Generator);
}

pub fn run_generator(s: &mut ProcessSession) {
    applied(s.start_generator());
    let warmup = u64::from(s.timing().warmup_s);
    let _ = s.advance(Duration::from_secs(warmup));
    applied(s.set_generator_rpm(3000));
    applied(s.next_step());
}

pub fn enable_lines(s: &mut ProcessSession) {
    for u in [Utility::Compressor, Utility::Torch, Utility::Instrumentation] {
        applied(s.set_utility(u, true));
    }
    for v in [Valve::Manifold, Valve::TankInlet] {
        applied(s.set_valve(v, true));
    }
    applied(s.next_step());
}

/// Walks to step 6 and runs pressurization to 100 %.
pub fn pressurize(s: &mut ProcessSession) {
    enter_reference_data(s);
    run_generator(s);
    enable_lines(s);
    applied(s.start_pressurization());
    let secs = u64::from(s.timing().pressurization_s);
    let _ = s.advance(Duration::from_secs(secs));
}

/// Runs the whole procedure up to a terminated run.
pub fn complete_run(s: &mut ProcessSession) {
    pressurize(s);
    // let the displayed pressure settle
    let _ = s.advance(Duration::from_secs(10));
    applied(s.next_step());
    applied(s.start_automatic());
    let _ = s.advance(Duration::from_secs(u64::from(s.timing().automatic_s)));
    applied(s.shutdown_generator());
    applied(s.next_step());
    for item in ChecklistItem::ALL {
        applied(s.set_checklist_item(item, true));
    }
    applied(s.next_step());
}
