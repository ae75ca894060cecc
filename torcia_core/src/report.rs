//! Exported process report.
//!
//! The JSON layout is consumed by existing tools; key names are fixed:
//!
//! ```json
//! {
//!   "timestamp": "2026-05-04T10:00:00Z",
//!   "parameters": { "P0": 1.0, "Pfinale": 12.0, "volumeProdotto": 500.0,
//!                   "temperatura": 20.0, "riempPerc": 60.0 },
//!   "currentStep": 8,
//!   "totalSteps": 9,
//!   "fase": "Checklist",
//!   "pressioni": { "P_serb": 12.0, "P_bombole": 180.0 },
//!   "log": [ { "timestamp": "...", "level": "info", "message": "..." } ]
//! }
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::atomic::write_atomic;
use crate::error::{Result, TorciaError};
use crate::log::LogEntry;
use crate::phase::{Phase, WizardStep};
use crate::state::ProcessState;
use crate::types::TankParameters;

/// Log entries carried by a report (the most recent ones).
pub const REPORT_LOG_ENTRIES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pressures {
    #[serde(rename = "P_serb")]
    pub p_serb: f64,
    #[serde(rename = "P_bombole")]
    pub p_bombole: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReport {
    pub timestamp: DateTime<Utc>,
    pub parameters: TankParameters,
    pub current_step: usize,
    pub total_steps: usize,
    pub fase: Phase,
    pub pressioni: Pressures,
    pub log: Vec<LogEntry>,
}

/// `torcia_report_<YYYY-MM-DD>.json`
pub fn report_file_name(date: NaiveDate) -> String {
    format!("torcia_report_{}.json", date.format("%Y-%m-%d"))
}

impl ProcessReport {
    pub fn capture(state: &ProcessState, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            parameters: *state.tank(),
            current_step: state.current_step().index(),
            total_steps: WizardStep::COUNT,
            fase: state.phase(),
            pressioni: Pressures {
                p_serb: state.tank_pressure(),
                p_bombole: state.manifold_pressure(),
            },
            log: state.log().tail(REPORT_LOG_ENTRIES),
        }
    }

    pub fn file_name(&self) -> String {
        report_file_name(self.timestamp.date_naive())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| eyre::Report::new(TorciaError::Report(e.to_string())))
    }

    /// Write into `dir` under [`ProcessReport::file_name`]; an existing report
    /// of the same day is replaced.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        let body = self.to_json_pretty()?;
        write_atomic(&path, body.as_bytes())
            .map_err(|e| {
                eyre::Report::new(TorciaError::Io(format!("{}: {e}", path.display())))
            })?;
        Ok(path)
    }
}
