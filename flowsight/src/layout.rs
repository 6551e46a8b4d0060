//! Graph layout engine
//!
//! Assigns every state a deterministic 2-D position by depth-first
//! traversal of the definition graph from the declared start state. The
//! traversal follows declarations, never the trace, so unexecuted branches
//! are laid out exactly like executed ones. Execution flows left to right
//! (depth becomes the horizontal level); sibling branches stack vertically
//! in lanes.

use crate::definition::{DefinitionState, StateName};
use crate::merge::UnifiedState;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Horizontal distance between traversal levels
pub const LEVEL_SPACING: f64 = 400.0;

/// Vertical distance between sibling lanes
pub const LANE_SPACING: f64 = 250.0;

/// Result type for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Errors that can occur during layout
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The declared start state does not exist, so there is no traversal origin
    #[error("Start state not found in merged states: {0}")]
    MissingStartState(StateName),
}

/// A 2-D position assigned to one state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate, level × [`LEVEL_SPACING`]
    pub x: f64,
    /// Vertical coordinate, lane × [`LANE_SPACING`]
    pub y: f64,
}

impl Position {
    fn at(level: usize, lane: i64) -> Self {
        Self {
            x: level as f64 * LEVEL_SPACING,
            y: lane as f64 * LANE_SPACING,
        }
    }
}

/// Compute positions for every merged state
///
/// Traverses the definition graph depth-first from `start`. Every state
/// reachable from the start receives a unique position; cycles and
/// diamond-shaped merges terminate because a state is positioned only on
/// its first visit. States unreachable from the start still receive a
/// fallback position (their merge-order index as the level, lane 0) so
/// they are not dropped from the view, and are logged as a data-quality
/// signal.
///
/// Fails only when `start` names no merged state at all.
pub fn layout(
    states: &[UnifiedState],
    start: &StateName,
) -> LayoutResult<HashMap<StateName, Position>> {
    let by_name: HashMap<&StateName, &DefinitionState> =
        states.iter().map(|s| (&s.name, &s.definition)).collect();

    if !by_name.contains_key(start) {
        return Err(LayoutError::MissingStartState(start.clone()));
    }

    let mut pass = LayoutPass {
        by_name: &by_name,
        positions: HashMap::new(),
        visited: HashSet::new(),
        next_free_lane: HashMap::new(),
    };
    pass.place(start, 0, 0);

    let mut positions = pass.positions;
    for (index, state) in states.iter().enumerate() {
        if !positions.contains_key(&state.name) {
            tracing::warn!(
                state = %state.name,
                "state is unreachable from start, assigning fallback position"
            );
            positions.insert(state.name.clone(), Position::at(index, 0));
        }
    }

    Ok(positions)
}

/// One traversal over the definition graph
///
/// Carries the visited set and the per-level lane ledger explicitly, so
/// concurrent layouts of independent graphs never share state.
struct LayoutPass<'a> {
    by_name: &'a HashMap<&'a StateName, &'a DefinitionState>,
    positions: HashMap<StateName, Position>,
    visited: HashSet<StateName>,
    next_free_lane: HashMap<usize, i64>,
}

impl LayoutPass<'_> {
    /// Position `name` and recurse into its children
    ///
    /// Returns true when this call actually placed the state, false when it
    /// was already visited or names no known state. The requested lane is
    /// bumped to the level's next free lane when an earlier subtree already
    /// claimed it, which keeps every (level, lane) pair unique.
    fn place(&mut self, name: &StateName, level: usize, requested_lane: i64) -> bool {
        if self.visited.contains(name) {
            return false;
        }
        let Some(definition) = self.by_name.get(name).copied() else {
            tracing::warn!(
                state = %name,
                "transition targets a state absent from the definition, skipping it"
            );
            return false;
        };

        self.visited.insert(name.clone());

        let free = self.next_free_lane.entry(level).or_insert(0);
        let lane = requested_lane.max(*free);
        *free = lane + 1;

        tracing::debug!(state = %name, level, lane, "placing state");
        self.positions.insert(name.clone(), Position::at(level, lane));

        // Own position is fixed before any child is laid out.
        let mut child_lane = lane;
        for child in children(definition) {
            if self.place(child, level + 1, child_lane) {
                child_lane += 1;
            }
        }
        true
    }
}

/// Structural children of a state, in traversal order
///
/// Switch states fan out over their data conditions and then the default
/// condition. Every other state follows its normal transition and then its
/// declared error-handler targets, so error branches stack below the
/// normal continuation.
fn children(definition: &DefinitionState) -> Vec<&StateName> {
    let mut targets = Vec::new();
    if definition.kind.is_switch() {
        for condition in &definition.data_conditions {
            targets.push(condition.transition.next_state());
        }
        if let Some(default) = &definition.default_condition {
            targets.push(default.transition.next_state());
        }
    } else {
        if let Some(next) = definition.next_state() {
            targets.push(next);
        }
        for handler in &definition.on_errors {
            targets.push(handler.transition.next_state());
        }
    }
    targets
}
