//! Human-readable error descriptions and structured JSON error formatting.

use torcia_core::{BuildError, TorciaError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in [process] or [generator].\nHow to fix: Edit the config file, then rerun."
            ),
            BuildError::InvalidLimit { name, reason } => format!(
                "What happened: Limit pair {name} is unusable ({reason}).\nLikely causes: min and max swapped or left empty in [limits].\nHow to fix: Set limits.{name} = {{ min = ..., max = ... }} with min <= max."
            ),
        };
    }

    if let Some(te) = err.downcast_ref::<TorciaError>() {
        return match te {
            TorciaError::Blocked { step, reason } => format!(
                "What happened: The procedure could not get past step {step}: {reason}.\nLikely causes: Scenario values missing or outside the configured limits.\nHow to fix: Run `torcia check --scenario <FILE>` and correct the reported fields."
            ),
            TorciaError::Aborted => {
                "What happened: The run was interrupted.\nLikely causes: Ctrl-C was pressed.\nHow to fix: Start a new run; no report was written.".to_string()
            }
            TorciaError::Config(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: A value in the TOML breaks a documented rule.\nHow to fix: Edit the file named in the message and rerun."
            ),
            TorciaError::Io(msg) | TorciaError::Report(msg) => format!(
                "What happened: The report could not be written ({msg}).\nLikely causes: Output directory missing or not writable.\nHow to fix: Pass a writable directory with --out."
            ),
        };
    }

    if let Some(te) = err.downcast_ref::<toml::de::Error>() {
        return format!(
            "What happened: The TOML file could not be parsed.\nLikely causes: Syntax error or a value of the wrong type.\nHow to fix: {}",
            te.message()
        );
    }

    // Generic fallback
    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 procedure blocked, 4 invalid config or scenario, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() || err.downcast_ref::<toml::de::Error>().is_some()
    {
        return 4;
    }
    match err.downcast_ref::<TorciaError>() {
        Some(TorciaError::Blocked { .. }) => 3,
        Some(TorciaError::Config(_)) => 4,
        _ => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if err.downcast_ref::<BuildError>().is_some() {
        return "InvalidConfig";
    }
    if err.downcast_ref::<toml::de::Error>().is_some() {
        return "ParseError";
    }
    match err.downcast_ref::<TorciaError>() {
        Some(TorciaError::Blocked { .. }) => "Blocked",
        Some(TorciaError::Aborted) => "Aborted",
        Some(TorciaError::Config(_)) => "InvalidConfig",
        Some(TorciaError::Io(_) | TorciaError::Report(_)) => "ReportError",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let msg = humanize(err);
    if let Some(TorciaError::Blocked { step, reason }) = err.downcast_ref::<TorciaError>() {
        return json!({
            "reason": reason_name(err),
            "details": { "step": step.index(), "name": step.name(), "cause": reason },
            "message": msg,
        })
        .to_string();
    }
    json!({ "reason": reason_name(err), "message": msg }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use torcia_core::WizardStep;

    #[test]
    fn blocked_maps_to_exit_3() {
        let e = eyre::Report::new(TorciaError::Blocked {
            step: WizardStep::TankData,
            reason: "P0 is required".into(),
        });
        assert_eq!(exit_code_for_error(&e), 3);
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&e)).unwrap();
        assert_eq!(v["reason"], "Blocked");
        assert_eq!(v["details"]["step"], 0);
        assert!(humanize(&e).contains("What happened"));
    }

    #[test]
    fn parse_error_maps_to_exit_4() {
        let e: eyre::Report = torcia_config::load_toml("[process]\ntick_ms = \"fast\"")
            .unwrap_err()
            .into();
        assert_eq!(exit_code_for_error(&e), 4);
        assert!(humanize(&e).starts_with("What happened: The TOML file"));
    }

    #[test]
    fn unknown_errors_are_generic() {
        let e = eyre::eyre!("boom");
        assert_eq!(exit_code_for_error(&e), 1);
        assert!(format_error_json(&e).contains("\"reason\":\"Error\""));
    }
}
