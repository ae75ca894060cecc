mod common;

use std::time::Duration;

use common::*;
use torcia_core::{Phase, ProcessEvent, WizardStep};

#[test]
fn reference_run_reaches_full_progress() {
    let mut s = session();
    enter_reference_data(&mut s);

    applied(s.start_generator());
    let g = *s.state().generator();
    assert!(g.started);
    assert_eq!(g.rpm, 1500);
    assert!(!s.can_proceed(WizardStep::Generator));

    let events = s.advance(Duration::from_secs(u64::from(s.timing().warmup_s)));
    assert_eq!(events, vec![ProcessEvent::WarmupComplete]);
    assert!(s.state().generator().warmup_complete);

    applied(s.set_generator_rpm(3000));
    assert_eq!(s.state().generator().rpm, 3000);
    assert!(s.state().generator().operational);
    assert!(s.can_proceed(WizardStep::Generator));
    applied(s.next_step());

    enable_lines(&mut s);
    assert_eq!(s.state().current_step(), WizardStep::Pressurization);
    applied(s.start_pressurization());
    assert_eq!(s.state().phase(), Phase::Pressurizzazione);
    assert!(!s.can_proceed(WizardStep::Pressurization));

    let half = Duration::from_secs(u64::from(s.timing().pressurization_s) / 2);
    let _ = s.advance(half);
    assert!((s.state().progress() - 50.0).abs() < 1e-6);

    let events = s.advance(half);
    assert!(events.contains(&ProcessEvent::PressurizationComplete));
    assert_eq!(s.state().progress(), 100.0);
    assert!(s.can_proceed(WizardStep::Pressurization));
}

#[test]
fn tank_pressure_tracks_progress_and_settles_at_target() {
    let mut s = session();
    pressurize(&mut s);
    let _ = s.advance(Duration::from_secs(5));
    assert!((s.state().tank_pressure() - 12.0).abs() < 1e-9);
    assert_eq!(s.state().manifold_pressure(), 180.0);
}

#[test]
fn automatic_sequence_is_one_countdown_in_stasi() {
    let mut s = session();
    pressurize(&mut s);
    applied(s.next_step());
    applied(s.start_automatic());
    assert_eq!(s.state().phase(), Phase::Stasi);

    let total = u64::from(s.timing().automatic_s);
    let events = s.advance(Duration::from_secs(total - 1));
    assert!(!events.contains(&ProcessEvent::AutomaticComplete));
    assert_eq!(s.state().phase(), Phase::Stasi);
    assert_eq!(s.state().automatic_timer().remaining_s(), 1);

    let events = s.advance(Duration::from_secs(1));
    assert_eq!(
        events
            .iter()
            .filter(|e| **e == ProcessEvent::AutomaticComplete)
            .count(),
        1
    );
    assert!(s.state().automatic_complete());
    assert_eq!(s.state().phase(), Phase::Stasi);
    assert!(!s.can_proceed(WizardStep::AutomaticProcess));

    applied(s.shutdown_generator());
    let g = *s.state().generator();
    assert_eq!(g.rpm, 0);
    assert!(!g.started);
    assert!(s.state().generator_shutdown_done());
    assert_eq!(s.state().phase(), Phase::Checklist);
    assert!(s.can_proceed(WizardStep::AutomaticProcess));
}

#[test]
fn full_run_terminates_and_reports() {
    let mut s = session();
    complete_run(&mut s);
    assert!(s.state().is_terminated());
    assert_eq!(s.state().current_step(), WizardStep::Save);

    let report = serde_json::to_value(s.report()).unwrap();
    assert_eq!(report["parameters"]["Pfinale"], 12.0);
    assert_eq!(report["parameters"]["P0"], 1.0);
    let p_serb = report["pressioni"]["P_serb"].as_f64().unwrap();
    assert!((p_serb - 12.0).abs() < 1e-9);
    assert_eq!(report["currentStep"], 8);
    assert_eq!(report["totalSteps"], 9);
    assert_eq!(report["fase"], "Checklist");
    assert_eq!(report["timestamp"], "2026-05-04T12:00:00Z");
}

#[test]
fn export_writes_dated_file() {
    let mut s = session();
    complete_run(&mut s);
    let dir = tempfile::tempdir().unwrap();
    let path = s.export_report(dir.path()).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "torcia_report_2026-05-04.json"
    );
    let body: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let keys: Vec<_> = body.as_object().unwrap().keys().cloned().collect();
    for k in [
        "timestamp",
        "parameters",
        "currentStep",
        "totalSteps",
        "fase",
        "pressioni",
        "log",
    ] {
        assert!(keys.iter().any(|x| x == k), "missing {k}");
    }
    assert_eq!(keys.len(), 7);
    let log = body["log"].as_array().unwrap();
    assert!(!log.is_empty() && log.len() <= 50);
    let entry = log[0].as_object().unwrap();
    assert!(entry.contains_key("timestamp"));
    assert!(entry.contains_key("level"));
    assert!(entry.contains_key("message"));
}
