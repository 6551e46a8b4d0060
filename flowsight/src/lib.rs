//! # Flowsight
//!
//! A merge-and-layout engine for visualizing serverless-style workflow
//! definitions together with an optional execution trace.
//!
//! ## Features
//!
//! - **State merging**: unify "defined but not executed", "executed
//!   successfully", and "executed with error" into one record per state
//! - **Error-handler resolution**: determine which declared handler fired
//!   for an erroring state
//! - **Deterministic layout**: definition-driven traversal assigning every
//!   state a unique position, safe on cycles and diamonds
//! - **Edge classification**: one annotated edge per structural transition,
//!   ready for a rendering frontend
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowsight::{build_graph, ExecutionTrace, WorkflowDefinition};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let definition: WorkflowDefinition =
//!     serde_json::from_str(&std::fs::read_to_string("workflow.json")?)?;
//! let trace: ExecutionTrace =
//!     serde_json::from_str(&std::fs::read_to_string("trace.json")?)?;
//!
//! let graph = build_graph(&definition, Some(&trace))?;
//! println!("{}", serde_json::to_string_pretty(&graph)?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Workflow definition model
pub mod definition;

/// Execution trace model
pub mod trace;

/// State merger combining definition and trace
pub mod merge;

/// Error-handler resolution
pub mod handler;

/// Graph layout engine
pub mod layout;

/// Edge classification
pub mod edges;

/// Graph assembly for the rendering collaborator
pub mod graph;

// Re-export core types
pub use definition::{
    ActionDef, DataCondition, DefaultCondition, DefinitionState, ErrorHandler, FunctionRef,
    StateKind, StateName, StateNameError, StateNameResult, TransitionRef, WorkflowDefinition,
};
pub use edges::{classify_edges, EdgeClassification, EdgeDiscriminator, EdgeKey, RenderEdge};
pub use graph::{build_graph, FlowGraph, GraphNode, NodeData};
pub use handler::{effective_error, resolve_handler, ResolvedHandler, DEFAULT_ERROR_REF};
pub use layout::{layout, LayoutError, LayoutResult, Position, LANE_SPACING, LEVEL_SPACING};
pub use merge::{merge, UnifiedState};
pub use trace::{ActionRecord, ExecutionRecord, ExecutionTrace};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Test utilities shared across module tests
#[cfg(test)]
mod test_helpers;
