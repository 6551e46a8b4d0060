//! Workflow definition model
//!
//! Types for the static declaration of a workflow: its states, transitions,
//! switch conditions, and error handlers. These mirror the wire format of
//! serverless-style workflow documents (camelCase JSON), decoded by an
//! external loader before the core ever sees them.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors that can occur when creating definition-related types
#[derive(Debug, Error)]
pub enum StateNameError {
    /// State name cannot be empty or whitespace only
    #[error("State name cannot be empty or whitespace only")]
    EmptyStateName,
}

/// Result type for state-name operations
pub type StateNameResult<T> = Result<T, StateNameError>;

/// Unique identifier for workflow states
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateName(String);

impl StateName {
    /// Create a new state name
    ///
    /// # Panics
    /// Panics if the name is empty or whitespace only. For non-panicking
    /// creation, use `try_new` instead.
    pub fn new(name: impl Into<String>) -> Self {
        Self::try_new(name).expect("State name cannot be empty or whitespace only")
    }

    /// Create a new state name, returning an error for invalid input
    pub fn try_new(name: impl Into<String>) -> StateNameResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StateNameError::EmptyStateName);
        }
        Ok(Self(name))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for StateName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for StateName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for StateName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of a workflow state
///
/// Workflow documents carry a free-text `type` field. The two kinds the
/// layout and classification algorithms branch on are modeled explicitly;
/// everything else is preserved verbatim in `Other` and treated like an
/// operation state with no switch semantics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StateKind {
    /// State that runs a sequence of actions and takes one transition
    Operation,
    /// State whose outgoing transition is chosen among declared conditions
    Switch,
    /// Any other state type, raw type string preserved
    Other(String),
}

impl StateKind {
    /// Get the string representation of the state kind
    pub fn as_str(&self) -> &str {
        match self {
            StateKind::Operation => "operation",
            StateKind::Switch => "switch",
            StateKind::Other(raw) => raw.as_str(),
        }
    }

    /// Whether this kind carries switch semantics
    pub fn is_switch(&self) -> bool {
        matches!(self, StateKind::Switch)
    }
}

impl Default for StateKind {
    fn default() -> Self {
        StateKind::Operation
    }
}

impl From<String> for StateKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "operation" => StateKind::Operation,
            "switch" => StateKind::Switch,
            _ => StateKind::Other(raw),
        }
    }
}

impl From<StateKind> for String {
    fn from(kind: StateKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A transition to another state
///
/// Workflow documents write transitions either as a bare state name or as
/// an object carrying `nextState`; both forms resolve to the same target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransitionRef {
    /// Bare next-state name
    Name(StateName),
    /// Object form carrying the next-state name
    Detailed {
        /// Target state of the transition
        #[serde(rename = "nextState")]
        next_state: StateName,
    },
}

impl TransitionRef {
    /// Target state name of this transition
    pub fn next_state(&self) -> &StateName {
        match self {
            TransitionRef::Name(name) => name,
            TransitionRef::Detailed { next_state } => next_state,
        }
    }
}

impl From<&str> for TransitionRef {
    fn from(s: &str) -> Self {
        TransitionRef::Name(StateName::from(s))
    }
}

/// Reference to the function an action invokes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionRef {
    /// Name of the referenced function
    pub ref_name: String,
    /// Static arguments passed to the function, opaque to the core
    #[serde(default)]
    pub arguments: Option<serde_json::Value>,
}

/// One declared action within a state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDef {
    /// Optional action name
    #[serde(default)]
    pub name: Option<String>,
    /// Function invoked by this action
    pub function_ref: FunctionRef,
}

/// One branch condition of a switch state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCondition {
    /// Condition name, also the branch label
    pub name: String,
    /// Condition expression, opaque to the core
    #[serde(default)]
    pub condition: Option<String>,
    /// Transition taken when this condition matches
    pub transition: TransitionRef,
}

/// Fallback branch of a switch state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultCondition {
    /// Transition taken when no data condition matches
    pub transition: TransitionRef,
}

/// A declared error handler: where control goes when a named error occurs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorHandler {
    /// Name of the error this handler catches, or the default sentinel
    pub error_ref: String,
    /// Transition taken when this handler fires
    pub transition: TransitionRef,
}

/// One declared state in a workflow definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionState {
    /// Unique name of the state within the definition
    pub name: StateName,
    /// State kind, `type` on the wire
    #[serde(rename = "type", default)]
    pub kind: StateKind,
    /// Ordered actions this state performs
    #[serde(default)]
    pub actions: Vec<ActionDef>,
    /// Normal outgoing transition
    #[serde(default)]
    pub transition: Option<TransitionRef>,
    /// Ordered switch branch conditions
    #[serde(default)]
    pub data_conditions: Vec<DataCondition>,
    /// Fallback switch branch
    #[serde(default)]
    pub default_condition: Option<DefaultCondition>,
    /// Ordered declared error handlers
    #[serde(default)]
    pub on_errors: Vec<ErrorHandler>,
    /// Whether this state terminates the workflow
    #[serde(default)]
    pub end: bool,
    /// Metadata for debugging and monitoring
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl DefinitionState {
    /// Target of the normal transition, if any
    ///
    /// Returns `None` for terminal states and states without a declared
    /// transition. Switch branches and error handlers are not considered.
    pub fn next_state(&self) -> Option<&StateName> {
        if self.end {
            return None;
        }
        self.transition.as_ref().map(TransitionRef::next_state)
    }

    /// Whether this state has no outgoing structural transitions at all
    pub fn is_leaf(&self) -> bool {
        self.next_state().is_none()
            && self.data_conditions.is_empty()
            && self.default_condition.is_none()
            && self.on_errors.is_empty()
    }
}

/// Main workflow definition representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    /// Workflow identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Workflow version
    #[serde(default)]
    pub version: Option<String>,
    /// Specification version the document targets
    #[serde(default)]
    pub spec_version: Option<String>,
    /// Workflow name
    #[serde(default)]
    pub name: Option<String>,
    /// Workflow description
    #[serde(default)]
    pub description: Option<String>,
    /// Name of the start state
    pub start: StateName,
    /// All states, in declaration order
    pub states: Vec<DefinitionState>,
}

impl WorkflowDefinition {
    /// Look up a state by name
    pub fn state(&self, name: &StateName) -> Option<&DefinitionState> {
        self.states.iter().find(|s| &s.name == name)
    }

    /// Validate the structural consistency of the definition
    ///
    /// Checks that the start state exists, that state names are unique, and
    /// that every transition, switch branch, and error handler targets a
    /// declared state. Returns all findings at once; the core lays out what
    /// it can regardless, so these are reporting, not gating.
    pub fn validate_structure(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let names: HashSet<&StateName> = self.states.iter().map(|s| &s.name).collect();

        if !names.contains(&self.start) {
            errors.push(format!(
                "Start state '{}' not found in workflow states. Available states: {:?}",
                self.start,
                self.states.iter().map(|s| s.name.as_str()).collect::<Vec<_>>()
            ));
        }

        let mut seen: HashSet<&StateName> = HashSet::new();
        for state in &self.states {
            if !seen.insert(&state.name) {
                errors.push(format!("Duplicate state name: '{}'", state.name));
            }
        }

        for state in &self.states {
            let mut check = |target: &StateName, kind: &str| {
                if !names.contains(target) {
                    errors.push(format!(
                        "State '{}' has a {} targeting non-existent state: '{}'",
                        state.name, kind, target
                    ));
                }
            };

            if let Some(target) = state.next_state() {
                check(target, "transition");
            }
            for condition in &state.data_conditions {
                check(condition.transition.next_state(), "data condition");
            }
            if let Some(default) = &state.default_condition {
                check(default.transition.next_state(), "default condition");
            }
            for handler in &state.on_errors {
                check(handler.transition.next_state(), "error handler");
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
