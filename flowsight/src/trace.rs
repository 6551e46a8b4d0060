//! Execution trace model
//!
//! Types for a recorded execution of a workflow instance: one record per
//! state that actually ran, with timing, payloads, per-action results, and
//! optional errors. Traces arrive as camelCase JSON from an external
//! loader; the core only reads them.

use crate::definition::StateName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded execution of a workflow instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionTrace {
    /// Executed states in execution order
    #[serde(default)]
    pub states: Vec<ExecutionRecord>,
}

/// One executed state from a trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    /// Name of the executed state; matches a definition state to be mergeable
    pub name: StateName,
    /// When execution of this state started
    pub start_time: DateTime<Utc>,
    /// When execution of this state ended
    pub end_time: DateTime<Utc>,
    /// Input payload, opaque to the core
    #[serde(default)]
    pub input: Option<serde_json::Value>,
    /// Output payload, opaque to the core
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    /// Per-action execution records, in declaration order
    #[serde(default)]
    pub actions: Vec<ActionRecord>,
    /// State-level error message, present when the state failed
    #[serde(default)]
    pub error: Option<String>,
    /// Name of the switch branch actually taken; absent means the default
    /// branch (or a non-switch state)
    #[serde(default)]
    pub matched_condition: Option<String>,
}

impl ExecutionRecord {
    /// Wall-clock duration of this state's execution in milliseconds
    pub fn duration_ms(&self) -> i64 {
        (self.end_time - self.start_time).num_milliseconds()
    }

    /// Whether this record carries an error at the state or action level
    pub fn has_error(&self) -> bool {
        self.error.is_some() || self.actions.iter().any(|a| a.error.is_some())
    }
}

/// One executed action within a state record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    /// Name of the executed activity
    pub activity_name: String,
    /// Arguments the activity was invoked with, opaque to the core
    #[serde(default)]
    pub arguments: Option<serde_json::Value>,
    /// When the action started
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// When the action ended
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Action output payload, opaque to the core
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    /// Action-level error message, present when the action failed
    #[serde(default)]
    pub error: Option<String>,
}
