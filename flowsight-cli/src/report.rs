//! Human-readable output for the report and validate commands

use colored::Colorize;
use flowsight::{resolve_handler, UnifiedState, WorkflowDefinition};
use is_terminal::IsTerminal;

/// Generate the execution report for merged states
///
/// One line per state in definition order: a status glyph, the duration
/// when the state ran, the switch branch taken, and the error handler that
/// fired. Unexecuted states are listed too, so the report shows the whole
/// declared graph.
pub fn execution_report(definition: &WorkflowDefinition, states: &[UnifiedState]) -> String {
    let mut report = String::new();

    let title = definition
        .name
        .as_deref()
        .or(definition.id.as_deref())
        .unwrap_or("workflow");
    report.push_str(&format!("# Execution Report: {}\n\n", title));

    let executed = states.iter().filter(|s| s.was_executed).count();
    let failed = states.iter().filter(|s| s.has_error).count();
    report.push_str(&format!(
        "**States:** {} defined, {} executed, {} failed\n\n",
        states.len(),
        executed,
        failed
    ));

    for (i, state) in states.iter().enumerate() {
        let glyph = if !state.was_executed {
            "·"
        } else if state.has_error {
            "✗"
        } else {
            "✓"
        };

        let timing = if state.was_executed {
            format!(" ({:.2}s)", state.duration_ms as f64 / 1000.0)
        } else {
            String::new()
        };

        report.push_str(&format!(
            "{}. {} {} [{}]{}\n",
            i + 1,
            glyph,
            state.name,
            state.kind.as_str(),
            timing
        ));

        if let Some(branch) = state.matched_condition() {
            report.push_str(&format!("   Branch taken: {}\n", branch));
        }

        if state.has_error {
            if let Some(message) = flowsight::effective_error(state) {
                report.push_str(&format!("   Error: {}\n", message));
            }
            match resolve_handler(state) {
                Some(resolved) => report.push_str(&format!(
                    "   Handled by: {} -> {}\n",
                    resolved.handler.error_ref, resolved.next_state
                )),
                None => report.push_str("   Unhandled error\n"),
            }
        }
    }

    report
}

/// Print validation findings, colored when attached to a terminal
pub fn print_validation(path: &std::path::Path, findings: &[String], quiet: bool) {
    let use_color = std::io::stdout().is_terminal();

    if findings.is_empty() {
        if !quiet {
            let label = if use_color {
                "OK".green().to_string()
            } else {
                "OK".to_string()
            };
            println!("{} {}", label, path.display());
        }
        return;
    }

    let label = if use_color {
        "ERROR".red().bold().to_string()
    } else {
        "ERROR".to_string()
    };
    println!("{} {}", label, path.display());
    for finding in findings {
        println!("  - {}", finding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use flowsight::{
        merge, DefinitionState, ExecutionRecord, ExecutionTrace, StateKind, StateName,
        TransitionRef,
    };

    fn sample_definition() -> WorkflowDefinition {
        WorkflowDefinition {
            id: Some("sample".to_string()),
            version: None,
            spec_version: None,
            name: Some("Sample".to_string()),
            description: None,
            start: StateName::new("Fetch"),
            states: vec![
                DefinitionState {
                    name: StateName::new("Fetch"),
                    kind: StateKind::Operation,
                    actions: Vec::new(),
                    transition: Some(TransitionRef::from("Store")),
                    data_conditions: Vec::new(),
                    default_condition: None,
                    on_errors: Vec::new(),
                    end: false,
                    metadata: Default::default(),
                },
                DefinitionState {
                    name: StateName::new("Store"),
                    kind: StateKind::Operation,
                    actions: Vec::new(),
                    transition: None,
                    data_conditions: Vec::new(),
                    default_condition: None,
                    on_errors: Vec::new(),
                    end: true,
                    metadata: Default::default(),
                },
            ],
        }
    }

    fn sample_record(name: &str, error: Option<&str>) -> ExecutionRecord {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        ExecutionRecord {
            name: StateName::new(name),
            start_time: start,
            end_time: start + Duration::milliseconds(1500),
            input: None,
            output: None,
            actions: Vec::new(),
            error: error.map(str::to_string),
            matched_condition: None,
        }
    }

    #[test]
    fn test_report_lists_every_state() {
        let definition = sample_definition();
        let trace = ExecutionTrace {
            states: vec![sample_record("Fetch", None)],
        };
        let unified = merge(&definition, Some(&trace));

        let report = execution_report(&definition, &unified);
        assert!(report.contains("# Execution Report: Sample"));
        assert!(report.contains("✓ Fetch"));
        assert!(report.contains("(1.50s)"));
        assert!(report.contains("· Store"));
    }

    #[test]
    fn test_report_marks_unhandled_errors() {
        let definition = sample_definition();
        let trace = ExecutionTrace {
            states: vec![sample_record("Fetch", Some("TimeoutError: slow"))],
        };
        let unified = merge(&definition, Some(&trace));

        let report = execution_report(&definition, &unified);
        assert!(report.contains("✗ Fetch"));
        assert!(report.contains("Error: TimeoutError: slow"));
        assert!(report.contains("Unhandled error"));
    }
}
