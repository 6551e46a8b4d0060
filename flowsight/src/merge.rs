//! State merger
//!
//! Combines a workflow definition with an optional execution trace into one
//! unified record per defined state. This is the single place where "defined
//! but not executed", "executed successfully", and "executed with error"
//! collapse into one entity consumed by layout and edge classification.

use crate::definition::{DefinitionState, StateKind, StateName, WorkflowDefinition};
use crate::trace::{ExecutionRecord, ExecutionTrace};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The merge of one definition state with its optional matching trace record
///
/// Created once per merge call and immutable thereafter; the layout engine,
/// edge classifier, and rendering layer only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedState {
    /// State name, shared by the definition and any trace record
    pub name: StateName,
    /// State kind copied from the definition
    pub kind: StateKind,
    /// The declared state
    pub definition: DefinitionState,
    /// The matching trace record, present iff the state ran
    pub execution: Option<ExecutionRecord>,
    /// Whether a trace record matched this state
    pub was_executed: bool,
    /// Whether the matched record carries a state- or action-level error
    pub has_error: bool,
    /// Execution duration in milliseconds, 0 when the state never ran;
    /// `duration` on the wire
    #[serde(rename = "duration")]
    pub duration_ms: i64,
}

impl UnifiedState {
    fn new(definition: DefinitionState, execution: Option<ExecutionRecord>) -> Self {
        let was_executed = execution.is_some();
        let has_error = execution.as_ref().map(ExecutionRecord::has_error).unwrap_or(false);
        let duration_ms = execution.as_ref().map(ExecutionRecord::duration_ms).unwrap_or(0);

        Self {
            name: definition.name.clone(),
            kind: definition.kind.clone(),
            definition,
            execution,
            was_executed,
            has_error,
            duration_ms,
        }
    }

    /// The switch branch the execution actually took, if recorded
    pub fn matched_condition(&self) -> Option<&str> {
        self.execution
            .as_ref()
            .and_then(|e| e.matched_condition.as_deref())
    }
}

/// Merge a definition with an optional trace into unified state records
///
/// Produces exactly one `UnifiedState` per definition state, in declaration
/// order. A definition state with no trace record is "not executed", never
/// an error. Trace records naming unknown states cannot be laid out and are
/// dropped with a warning. When a trace records the same state twice (loop
/// re-entry), the last record wins.
pub fn merge(definition: &WorkflowDefinition, trace: Option<&ExecutionTrace>) -> Vec<UnifiedState> {
    let mut by_name: HashMap<&StateName, &ExecutionRecord> = HashMap::new();
    if let Some(trace) = trace {
        for record in &trace.states {
            if by_name.insert(&record.name, record).is_some() {
                tracing::warn!(
                    state = %record.name,
                    "trace records state more than once, keeping the last record"
                );
            }
        }

        for record in &trace.states {
            if definition.state(&record.name).is_none() {
                tracing::warn!(
                    state = %record.name,
                    "trace references a state absent from the definition, ignoring it"
                );
            }
        }
    }

    definition
        .states
        .iter()
        .map(|state| {
            let execution = by_name.get(&state.name).map(|r| (*r).clone());
            UnifiedState::new(state.clone(), execution)
        })
        .collect()
}
