//! Edge classification
//!
//! Emits one rendering-ready edge per structural transition declared in
//! the definition (switch branches, default branches, normal transitions,
//! and error handlers), each annotated with whether the recorded execution
//! actually travelled it.

use crate::definition::StateName;
use crate::handler::resolve_handler;
use crate::merge::UnifiedState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How an edge relates to the recorded execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeClassification {
    /// The execution travelled this edge
    Executed,
    /// A declared alternative the execution did not take
    UnexecutedAlternative,
    /// The error handler that fired
    ErrorTriggered,
    /// A declared error handler that did not fire
    ErrorUntriggered,
}

/// Which declared transition of a state an edge represents
///
/// Several edges can share a source state, so the source name alone is not
/// an identity; the discriminator makes each structural transition unique
/// even when multiple transitions target the same state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdgeDiscriminator {
    /// The normal transition of an operation or other state
    Next,
    /// A switch branch, by condition name
    Condition(String),
    /// The default switch branch
    Default,
    /// An error handler, by error reference
    Error(String),
}

impl fmt::Display for EdgeDiscriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeDiscriminator::Next => write!(f, "next"),
            EdgeDiscriminator::Condition(name) => write!(f, "{name}"),
            EdgeDiscriminator::Default => write!(f, "default"),
            EdgeDiscriminator::Error(error_ref) => write!(f, "error-{error_ref}"),
        }
    }
}

/// A type-safe identity for one structural transition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    /// The source state of the transition
    pub source: StateName,
    /// Which of the source's declared transitions this is
    pub discriminator: EdgeDiscriminator,
}

impl EdgeKey {
    /// Creates a new edge key
    pub fn new(source: StateName, discriminator: EdgeDiscriminator) -> Self {
        Self { source, discriminator }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.discriminator)
    }
}

/// One rendering-ready edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    /// Unique edge identity, the [`EdgeKey`] rendered as a string
    pub id: String,
    /// Source state name
    pub source: StateName,
    /// Target state name
    pub target: StateName,
    /// Branch label: condition name, "default", or the error reference
    #[serde(default)]
    pub label: Option<String>,
    /// Whether the execution travelled this edge
    pub classification: EdgeClassification,
}

impl RenderEdge {
    fn new(
        key: EdgeKey,
        target: StateName,
        label: Option<String>,
        classification: EdgeClassification,
    ) -> Self {
        Self {
            id: key.to_string(),
            source: key.source,
            target,
            label,
            classification,
        }
    }
}

/// Classify every structural transition of the merged states
///
/// Switch states emit one edge per data condition plus one for a declared
/// default. The default branch counts as taken iff the state executed and
/// its record carries no `matchedCondition` at all; a record naming the
/// literal string "default" names a condition that does not exist and does
/// not light the default edge.
///
/// All other states emit one edge for the normal transition when one
/// exists, marked executed only for a clean run, plus one edge per
/// declared error handler, with the resolved handler (if any) marked as
/// triggered.
pub fn classify_edges(states: &[UnifiedState]) -> Vec<RenderEdge> {
    let mut edges = Vec::new();
    for state in states {
        if state.kind.is_switch() {
            classify_switch(state, &mut edges);
        } else {
            classify_operation(state, &mut edges);
        }
    }
    edges
}

fn classify_switch(state: &UnifiedState, edges: &mut Vec<RenderEdge>) {
    let matched = state.matched_condition();

    for condition in &state.definition.data_conditions {
        let taken = state.was_executed && matched == Some(condition.name.as_str());
        edges.push(RenderEdge::new(
            EdgeKey::new(
                state.name.clone(),
                EdgeDiscriminator::Condition(condition.name.clone()),
            ),
            condition.transition.next_state().clone(),
            Some(condition.name.clone()),
            if taken {
                EdgeClassification::Executed
            } else {
                EdgeClassification::UnexecutedAlternative
            },
        ));
    }

    if let Some(default) = &state.definition.default_condition {
        let taken = state.was_executed && matched.is_none();
        edges.push(RenderEdge::new(
            EdgeKey::new(state.name.clone(), EdgeDiscriminator::Default),
            default.transition.next_state().clone(),
            Some("default".to_string()),
            if taken {
                EdgeClassification::Executed
            } else {
                EdgeClassification::UnexecutedAlternative
            },
        ));
    }
}

fn classify_operation(state: &UnifiedState, edges: &mut Vec<RenderEdge>) {
    if let Some(next) = state.definition.next_state() {
        let taken = state.was_executed && !state.has_error;
        edges.push(RenderEdge::new(
            EdgeKey::new(state.name.clone(), EdgeDiscriminator::Next),
            next.clone(),
            None,
            if taken {
                EdgeClassification::Executed
            } else {
                EdgeClassification::UnexecutedAlternative
            },
        ));
    }

    let fired = resolve_handler(state);
    for handler in &state.definition.on_errors {
        let triggered = fired
            .as_ref()
            .map(|r| std::ptr::eq(r.handler, handler))
            .unwrap_or(false);
        edges.push(RenderEdge::new(
            EdgeKey::new(
                state.name.clone(),
                EdgeDiscriminator::Error(handler.error_ref.clone()),
            ),
            handler.transition.next_state().clone(),
            Some(handler.error_ref.clone()),
            if triggered {
                EdgeClassification::ErrorTriggered
            } else {
                EdgeClassification::ErrorUntriggered
            },
        ));
    }
}
