//! Test helper functions for the flowsight core
//!
//! Common constructors for definitions, traces, and records to reduce
//! duplication across module tests.

#![cfg(test)]

use crate::definition::{
    ActionDef, DataCondition, DefaultCondition, DefinitionState, ErrorHandler, FunctionRef,
    StateKind, StateName, TransitionRef, WorkflowDefinition,
};
use crate::handler::DEFAULT_ERROR_REF;
use crate::trace::{ActionRecord, ExecutionRecord, ExecutionTrace};
use chrono::{Duration, TimeZone, Utc};

/// An operation state; terminal when no transition target is given
pub fn operation_state(name: &str, next: Option<&str>) -> DefinitionState {
    DefinitionState {
        name: StateName::new(name),
        kind: StateKind::Operation,
        actions: vec![ActionDef {
            name: None,
            function_ref: FunctionRef {
                ref_name: format!("{}Fn", name.to_lowercase()),
                arguments: None,
            },
        }],
        transition: next.map(TransitionRef::from),
        data_conditions: Vec::new(),
        default_condition: None,
        on_errors: Vec::new(),
        end: next.is_none(),
        metadata: Default::default(),
    }
}

/// A switch state with named branch conditions and an optional default
pub fn switch_state(
    name: &str,
    conditions: &[(&str, &str)],
    default: Option<&str>,
) -> DefinitionState {
    DefinitionState {
        name: StateName::new(name),
        kind: StateKind::Switch,
        actions: Vec::new(),
        transition: None,
        data_conditions: conditions
            .iter()
            .map(|(condition_name, target)| DataCondition {
                name: condition_name.to_string(),
                condition: None,
                transition: TransitionRef::from(*target),
            })
            .collect(),
        default_condition: default.map(|target| DefaultCondition {
            transition: TransitionRef::from(target),
        }),
        on_errors: Vec::new(),
        end: false,
        metadata: Default::default(),
    }
}

/// An error handler declaration
pub fn error_handler(error_ref: &str, target: &str) -> ErrorHandler {
    ErrorHandler {
        error_ref: error_ref.to_string(),
        transition: TransitionRef::from(target),
    }
}

/// A definition chaining the given states in order, last state terminal
pub fn linear_definition(names: &[&str]) -> WorkflowDefinition {
    let states = names
        .iter()
        .enumerate()
        .map(|(i, name)| operation_state(name, names.get(i + 1).copied()))
        .collect();

    WorkflowDefinition {
        id: None,
        version: None,
        spec_version: None,
        name: None,
        description: None,
        start: StateName::new(names[0]),
        states,
    }
}

/// The worked example: a switch branching to an approval or a rejection
pub fn branching_definition() -> WorkflowDefinition {
    WorkflowDefinition {
        id: Some("applicantrequest".to_string()),
        version: Some("1.0".to_string()),
        spec_version: Some("0.8".to_string()),
        name: Some("Applicant Request Decision".to_string()),
        description: None,
        start: StateName::new("CheckApplication"),
        states: vec![
            switch_state(
                "CheckApplication",
                &[("big", "StartApplication")],
                Some("RejectApplication"),
            ),
            operation_state("StartApplication", None),
            operation_state("RejectApplication", None),
        ],
    }
}

/// An operation with a normal continuation and two declared error handlers
pub fn definition_with_handlers() -> WorkflowDefinition {
    let mut fetch = operation_state("Fetch", Some("Store"));
    fetch.on_errors = vec![
        error_handler("TimeoutError", "HandleTimeout"),
        error_handler(DEFAULT_ERROR_REF, "HandleFailure"),
    ];

    WorkflowDefinition {
        id: None,
        version: None,
        spec_version: None,
        name: None,
        description: None,
        start: StateName::new("Fetch"),
        states: vec![
            fetch,
            operation_state("Store", None),
            operation_state("HandleTimeout", None),
            operation_state("HandleFailure", None),
        ],
    }
}

/// A diamond: both branches of a switch converge on one state
pub fn diamond_definition() -> WorkflowDefinition {
    WorkflowDefinition {
        id: None,
        version: None,
        spec_version: None,
        name: None,
        description: None,
        start: StateName::new("Check"),
        states: vec![
            switch_state("Check", &[("ok", "Approve")], Some("Reject")),
            operation_state("Approve", Some("Notify")),
            operation_state("Reject", Some("Notify")),
            operation_state("Notify", None),
        ],
    }
}

/// Two switch branches that each fan out again
pub fn double_fanout_definition() -> WorkflowDefinition {
    WorkflowDefinition {
        id: None,
        version: None,
        spec_version: None,
        name: None,
        description: None,
        start: StateName::new("Root"),
        states: vec![
            switch_state("Root", &[("left", "A"), ("right", "B")], None),
            switch_state("A", &[("a1", "A1"), ("a2", "A2")], None),
            switch_state("B", &[("b1", "B1"), ("b2", "B2")], None),
            operation_state("A1", None),
            operation_state("A2", None),
            operation_state("B1", None),
            operation_state("B2", None),
        ],
    }
}

/// A clean execution record lasting `duration_ms` milliseconds
pub fn record(name: &str, duration_ms: i64) -> ExecutionRecord {
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    ExecutionRecord {
        name: StateName::new(name),
        start_time: start,
        end_time: start + Duration::milliseconds(duration_ms),
        input: None,
        output: None,
        actions: Vec::new(),
        error: None,
        matched_condition: None,
    }
}

/// An action record, optionally failed with the given error message
pub fn action_record(activity: &str, error: Option<&str>) -> ActionRecord {
    ActionRecord {
        activity_name: activity.to_string(),
        arguments: None,
        start_time: None,
        end_time: None,
        output: None,
        error: error.map(str::to_string),
    }
}

/// A trace wrapping the given records
pub fn trace_with(states: Vec<ExecutionRecord>) -> ExecutionTrace {
    ExecutionTrace { states }
}
