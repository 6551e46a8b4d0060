//! Error-handler resolution
//!
//! Given a unified state that executed with an error, determines which of
//! its declared error handlers actually fired. Workflow error taxonomies
//! are free text, so matching is a case-insensitive substring scan over the
//! declared handlers in order, with a declared default as the fallback.

use crate::definition::{ErrorHandler, StateName};
use crate::merge::UnifiedState;

/// Sentinel `errorRef` marking a declared handler as the default fallback
pub const DEFAULT_ERROR_REF: &str = "DefaultErrorRef";

/// A resolved error handler: the declaration that fired and its target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedHandler<'a> {
    /// The declared handler that fired
    pub handler: &'a ErrorHandler,
    /// The state control transferred to
    pub next_state: &'a StateName,
}

/// The error message that drives handler matching
///
/// The state-level error wins; otherwise the first action-level error in
/// declaration order. `None` when the state ran clean or never ran.
pub fn effective_error(state: &UnifiedState) -> Option<&str> {
    let execution = state.execution.as_ref()?;
    if let Some(error) = execution.error.as_deref() {
        return Some(error);
    }
    execution.actions.iter().find_map(|a| a.error.as_deref())
}

/// Determine which declared error handler fired for an erroring state
///
/// Returns `None` when the state has no error, declares no handlers, or no
/// handler can be attributed. The last case is a legitimate terminal
/// classification ("unhandled"), not a fault.
///
/// Matching order: specific handlers first, in declaration order, matching
/// when the effective error message contains the handler's `errorRef` as a
/// case-insensitive substring; then a declared [`DEFAULT_ERROR_REF`]
/// handler as the fallback.
pub fn resolve_handler(state: &UnifiedState) -> Option<ResolvedHandler<'_>> {
    if !state.has_error || state.definition.on_errors.is_empty() {
        return None;
    }
    let message = effective_error(state)?.to_lowercase();

    let specific = state
        .definition
        .on_errors
        .iter()
        .filter(|h| h.error_ref != DEFAULT_ERROR_REF)
        .find(|h| message.contains(&h.error_ref.to_lowercase()));

    let fired = specific.or_else(|| {
        state
            .definition
            .on_errors
            .iter()
            .find(|h| h.error_ref == DEFAULT_ERROR_REF)
    })?;

    Some(ResolvedHandler {
        handler: fired,
        next_state: fired.transition.next_state(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge;
    use crate::test_helpers::*;

    fn unified_with_error(
        handlers: Vec<ErrorHandler>,
        state_error: Option<&str>,
        action_error: Option<&str>,
    ) -> UnifiedState {
        let mut definition = branching_definition();
        definition.states[1].on_errors = handlers;

        let mut failed = record("StartApplication", 30);
        failed.error = state_error.map(str::to_string);
        if let Some(error) = action_error {
            failed.actions.push(action_record("persist", Some(error)));
        }

        let unified = merge(&definition, Some(&trace_with(vec![failed])));
        unified
            .into_iter()
            .find(|s| s.name.as_str() == "StartApplication")
            .expect("merged state")
    }

    #[test]
    fn test_no_error_resolves_nothing() {
        let definition = branching_definition();
        let unified = merge(&definition, Some(&trace_with(vec![record("StartApplication", 5)])));
        let start = unified.iter().find(|s| s.name.as_str() == "StartApplication").unwrap();

        assert!(resolve_handler(start).is_none());
    }

    #[test]
    fn test_no_handlers_resolves_nothing() {
        let state = unified_with_error(vec![], Some("TimeoutError: slow upstream"), None);
        assert!(resolve_handler(&state).is_none());
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let state = unified_with_error(
            vec![error_handler("timeouterror", "HandleTimeout")],
            Some("TimeoutError: no response after 30s"),
            None,
        );

        let resolved = resolve_handler(&state).expect("handler should fire");
        assert_eq!(resolved.next_state.as_str(), "HandleTimeout");
    }

    #[test]
    fn test_declaration_order_breaks_ties() {
        let state = unified_with_error(
            vec![
                error_handler("Error", "HandleGeneric"),
                error_handler("TimeoutError", "HandleTimeout"),
            ],
            Some("TimeoutError: no response"),
            None,
        );

        // Both refs substring-match; the earlier declaration wins.
        let resolved = resolve_handler(&state).expect("handler should fire");
        assert_eq!(resolved.next_state.as_str(), "HandleGeneric");
    }

    #[test]
    fn test_default_handler_is_fallback_not_first_choice() {
        let state = unified_with_error(
            vec![
                error_handler(DEFAULT_ERROR_REF, "HandleAnything"),
                error_handler("TimeoutError", "HandleTimeout"),
            ],
            Some("TimeoutError: no response"),
            None,
        );

        let resolved = resolve_handler(&state).expect("handler should fire");
        assert_eq!(resolved.next_state.as_str(), "HandleTimeout");
    }

    #[test]
    fn test_default_handler_catches_unmatched_errors() {
        let state = unified_with_error(
            vec![
                error_handler("TimeoutError", "HandleTimeout"),
                error_handler(DEFAULT_ERROR_REF, "HandleAnything"),
            ],
            Some("DiskFull: cannot persist"),
            None,
        );

        let resolved = resolve_handler(&state).expect("default should fire");
        assert_eq!(resolved.next_state.as_str(), "HandleAnything");
    }

    #[test]
    fn test_unmatched_error_without_default_is_unhandled() {
        let state = unified_with_error(
            vec![error_handler("TimeoutError", "HandleTimeout")],
            Some("DiskFull: cannot persist"),
            None,
        );

        assert!(resolve_handler(&state).is_none());
    }

    #[test]
    fn test_action_error_drives_matching_when_state_error_absent() {
        let state = unified_with_error(
            vec![error_handler("ConnectionRefused", "HandleConnection")],
            None,
            Some("ConnectionRefused: db unreachable"),
        );

        let resolved = resolve_handler(&state).expect("handler should fire");
        assert_eq!(resolved.next_state.as_str(), "HandleConnection");
    }

    #[test]
    fn test_state_error_wins_over_action_error() {
        let state = unified_with_error(
            vec![
                error_handler("ConnectionRefused", "HandleConnection"),
                error_handler("TimeoutError", "HandleTimeout"),
            ],
            Some("TimeoutError: overall deadline"),
            Some("ConnectionRefused: db unreachable"),
        );

        let resolved = resolve_handler(&state).expect("handler should fire");
        assert_eq!(resolved.next_state.as_str(), "HandleTimeout");
    }
}
