use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

const REFERENCE: &str = r#"
[tank]
P0 = 1.0
Pfinale = 12.0
volumeProdotto = 500.0
temperatura = 20.0
riempPerc = 60.0

[[bottles]]
used = true
pressure = 180.0
volume = 50.0
"#;

// Target below the initial pressure
const INVERTED: &str = r#"
[tank]
P0 = 5.0
Pfinale = 3.0
volumeProdotto = 500.0
temperatura = 20.0
riempPerc = 60.0

[[bottles]]
used = true
"#;

const TOO_MANY_BOTTLES: &str = r#"
[tank]
P0 = 1.0
[[bottles]]
[[bottles]]
[[bottles]]
[[bottles]]
"#;

fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

// Short countdowns keep the virtual run small
fn write_fast_config(dir: &tempfile::TempDir) -> PathBuf {
    write(
        dir,
        "cfg.toml",
        r#"
[process]
warmup_s = 5
automatic_s = 5
pressurization_s = 4
"#,
    )
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["run"], 2, "--scenario", "stderr")]
#[case(&["check", "--scenario", "{reference}"], 0, "step 3 (Checks): ok", "stdout")]
#[case(&["check", "--scenario", "{inverted}"], 3, "Pfinale must be greater than P0", "stdout")]
#[case(&["check", "--scenario", "{too_many}"], 4, "holds 3", "stderr")]
#[case(&["run", "--scenario", "{inverted}", "--out", "{out}"], 3, "could not get past step 1", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_fast_config(&dir);
    let reference = write(&dir, "reference.toml", REFERENCE);
    let inverted = write(&dir, "inverted.toml", INVERTED);
    let too_many = write(&dir, "too_many.toml", TOO_MANY_BOTTLES);

    let mut cmd = Command::cargo_bin("torcia").unwrap();
    cmd.arg("--config").arg(&cfg);
    for a in args {
        let a = match *a {
            "{reference}" => reference.to_string_lossy().into_owned(),
            "{inverted}" => inverted.to_string_lossy().into_owned(),
            "{too_many}" => too_many.to_string_lossy().into_owned(),
            "{out}" => dir.path().to_string_lossy().into_owned(),
            other => other.to_string(),
        };
        cmd.arg(a);
    }

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[test]
fn run_writes_report() {
    let dir = tempdir().unwrap();
    let cfg = write_fast_config(&dir);
    let scenario = write(&dir, "scenario.toml", REFERENCE);
    let out = dir.path().join("reports");

    Command::cargo_bin("torcia")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("run")
        .arg("--scenario")
        .arg(&scenario)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("step 8 (Save) done"))
        .stdout(predicate::str::contains("report written to"));

    let reports: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].starts_with("torcia_report_"));
    assert!(reports[0].ends_with(".json"));
}

#[test]
fn invalid_config_exits_4() {
    let dir = tempdir().unwrap();
    let cfg = write(&dir, "cfg.toml", "[process]\ntick_ms = 0\n");
    let scenario = write(&dir, "scenario.toml", REFERENCE);
    Command::cargo_bin("torcia")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("check")
        .arg("--scenario")
        .arg(&scenario)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("tick_ms"));
}

#[test]
fn missing_scenario_file_is_generic_error() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("torcia")
        .unwrap()
        .arg("check")
        .arg("--scenario")
        .arg(dir.path().join("nope.toml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("reading scenario"));
}
