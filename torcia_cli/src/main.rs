mod cli;
mod error_fmt;
mod procedure;

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::{Result, WrapErr};
use serde_json::json;
use torcia_config::{Config, Scenario};
use torcia_core::{ProcessSession, TorciaError, ValidationReport, WizardStep};
use torcia_traits::{Clock, ManualClock, MonotonicClock};

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};
use crate::procedure::{Driver, StepLine, format_step};

fn main() {
    // clap prints usage errors and exits with 2
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    let _ = color_eyre::install();

    if let Err(e) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        tracing::debug!(error = ?e, "exiting with error");
        std::process::exit(exit_code_for_error(&e));
    }
}

fn real_main(cli: Cli) -> Result<()> {
    let cfg = load_config(cli.config.as_deref())?;
    init_tracing(cli.json, cli.log_level.as_deref(), &cfg.logging)?;
    tracing::info!(config = ?cli.config, "configuration loaded");

    match cli.cmd {
        Commands::Run {
            scenario,
            out,
            realtime,
        } => cmd_run(&cfg, &scenario, &out, realtime, cli.json),
        Commands::Check { scenario } => cmd_check(&cfg, &scenario, cli.json),
    }
}

fn invalid(e: &eyre::Report, path: &Path) -> eyre::Report {
    eyre::Report::new(TorciaError::Config(format!("{}: {e}", path.display())))
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("reading config {}", path.display()))?;
    let cfg = torcia_config::load_toml(&text)?;
    cfg.validate().map_err(|e| invalid(&e, path))?;
    Ok(cfg)
}

fn load_scenario(path: &Path) -> Result<Scenario> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("reading scenario {}", path.display()))?;
    let scenario = torcia_config::load_scenario_toml(&text)?;
    scenario.validate().map_err(|e| invalid(&e, path))?;
    Ok(scenario)
}

fn init_tracing(json: bool, level: Option<&str>, logging: &torcia_config::Logging) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    // --log-level wins over [logging].level; RUST_LOG wins over both
    let level = level.or(logging.level.as_deref()).unwrap_or("warn");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .wrap_err_with(|| format!("invalid log level {level:?}"))?;

    let file_layer = match logging.file.as_deref() {
        Some(file) => {
            let path = Path::new(file);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file {file:?} has no file name"))?;
            let appender = match logging.rotation.as_deref() {
                Some("daily") => tracing_appender::rolling::daily(dir, name),
                Some("hourly") => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(fmt::layer().json().with_ansi(false).with_writer(writer))
        }
        None => None,
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()?;
    }
    Ok(())
}

fn build_session(cfg: &Config) -> Result<ProcessSession> {
    ProcessSession::builder().apply_config(cfg).build()
}

fn cmd_run(cfg: &Config, scenario: &Path, out: &Path, realtime: bool, json: bool) -> Result<()> {
    let scenario = load_scenario(scenario)?;
    let mut session = build_session(cfg)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&shutdown);
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
            .wrap_err("installing Ctrl-C handler")?;
    }

    let mut print = |line: StepLine| println!("{}", format_step(&line, json));
    if realtime {
        drive(&mut session, &MonotonicClock::new(), &shutdown, &scenario, &mut print)?;
    } else {
        drive(&mut session, &ManualClock::new(), &shutdown, &scenario, &mut print)?;
    }

    fs::create_dir_all(out).wrap_err_with(|| format!("creating {}", out.display()))?;
    let path = session.export_report(out)?;
    if json {
        println!("{}", json!({ "report": path.display().to_string() }));
    } else {
        println!("procedure complete, report written to {}", path.display());
    }
    Ok(())
}

fn drive<C: Clock>(
    session: &mut ProcessSession,
    clock: &C,
    shutdown: &AtomicBool,
    scenario: &Scenario,
    emit: &mut dyn FnMut(StepLine),
) -> Result<()> {
    Driver::new(session, clock, shutdown).run(scenario, emit)
}

fn cmd_check(cfg: &Config, scenario: &Path, json: bool) -> Result<()> {
    let scenario = load_scenario(scenario)?;
    let mut session = build_session(cfg)?;
    let never = AtomicBool::new(false);
    let clock = ManualClock::new();
    let entered = Driver::new(&mut session, &clock, &never).enter_data(
        &scenario,
        WizardStep::Checks,
        &mut |_| {},
    );

    let rows: [(WizardStep, ValidationReport); 4] = [
        (WizardStep::TankData, session.validate_tank()),
        (WizardStep::TargetPressure, session.validate_pressure_target()),
        (WizardStep::BottleSelection, session.validate_bottles()),
        (WizardStep::Checks, session.validate_setup()),
    ];
    for (step, report) in &rows {
        let open = session.can_proceed(*step);
        if json {
            println!(
                "{}",
                json!({
                    "step": step.index(),
                    "name": step.name(),
                    "canProceed": open,
                    "isValid": report.is_valid,
                    "errors": report.errors,
                    "warnings": report.warnings,
                })
            );
        } else {
            println!("step {step}: {}", if open { "ok" } else { "blocked" });
            for e in &report.errors {
                println!("  error: {e}");
            }
            for w in &report.warnings {
                println!("  warning: {w}");
            }
        }
    }

    entered?;
    if !session.can_proceed(WizardStep::Checks) {
        return Err(eyre::Report::new(TorciaError::Blocked {
            step: WizardStep::Checks,
            reason: session.blockers(WizardStep::Checks).join("; "),
        }));
    }
    Ok(())
}
