//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(
    name = "torcia",
    version,
    about = "Headless operator console for the LPG tank pressurization trainer"
)]
pub struct Cli {
    /// Path to config TOML (limits, timing, logging); built-in defaults when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print JSON lines instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); defaults to [logging].level, then warn
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Walk the whole procedure for a scenario and export the report
    Run {
        /// Scenario TOML ([tank] and up to three [[bottles]])
        #[arg(long, value_name = "FILE")]
        scenario: PathBuf,
        /// Directory receiving torcia_report_<date>.json
        #[arg(long, value_name = "DIR", default_value = ".")]
        out: PathBuf,
        /// Pace the run with the real clock instead of virtual time
        #[arg(long, action = ArgAction::SetTrue)]
        realtime: bool,
    },
    /// Validate a scenario and show the gates of the data-entry steps
    Check {
        /// Scenario TOML
        #[arg(long, value_name = "FILE")]
        scenario: PathBuf,
    },
}
