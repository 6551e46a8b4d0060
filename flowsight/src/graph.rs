//! Graph assembly
//!
//! The single entry point a rendering frontend consumes: merge the
//! definition with the trace, lay the merged states out, classify every
//! structural edge, and package the result as a `{nodes, edges}` document.

use crate::definition::WorkflowDefinition;
use crate::edges::{classify_edges, RenderEdge};
use crate::layout::{layout, LayoutResult, Position};
use crate::merge::{merge, UnifiedState};
use crate::trace::ExecutionTrace;
use serde::{Deserialize, Serialize};

/// Presentation view of one unified state, exposed on each node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    /// Display label, the state name
    pub label: String,
    /// The full unified state for detail panels
    pub state: UnifiedState,
    /// Execution duration in milliseconds, 0 when never run; `duration` on
    /// the wire
    #[serde(rename = "duration")]
    pub duration_ms: i64,
    /// Whether the state executed with an error
    pub has_error: bool,
    /// Whether the state executed at all
    pub was_executed: bool,
}

/// One positioned node of the rendered graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Node identity, the state name
    pub id: String,
    /// Layout position
    pub position: Position,
    /// Presentation data
    pub data: NodeData,
}

/// The complete rendered graph handed to the rendering collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    /// One node per definition state, in declaration order
    pub nodes: Vec<GraphNode>,
    /// One edge per structural transition
    pub edges: Vec<RenderEdge>,
}

/// Build the rendered graph for a definition and an optional trace
///
/// Runs merge, layout, and edge classification in one pass. Either a
/// complete graph is produced for every definition state, or the layout's
/// one explicit failure (a missing start state) is surfaced to the caller;
/// the state list is never silently truncated.
pub fn build_graph(
    definition: &WorkflowDefinition,
    trace: Option<&ExecutionTrace>,
) -> LayoutResult<FlowGraph> {
    let unified = merge(definition, trace);
    let positions = layout(&unified, &definition.start)?;
    let edges = classify_edges(&unified);

    let nodes = unified
        .into_iter()
        .map(|state| {
            let position = positions[&state.name];
            GraphNode {
                id: state.name.to_string(),
                position,
                data: NodeData {
                    label: state.name.to_string(),
                    duration_ms: state.duration_ms,
                    has_error: state.has_error,
                    was_executed: state.was_executed,
                    state,
                },
            }
        })
        .collect();

    Ok(FlowGraph { nodes, edges })
}
